//! Scene-level state shared by all blocks: the view observer list the editor
//! mode is broadcast into, and the checkpoint history recording meaningful
//! edits.

use crate::types::{Mode, ViewId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of checkpoints to keep in scene history
const MAX_CHECKPOINT_HISTORY: usize = 100;

/// One view observing the scene.
///
/// Views mirror the interaction mode of whichever editor is live so that
/// cursor shape and input routing stay consistent across every view of the
/// same scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewObserver {
    /// Unique identifier of this view
    pub id: ViewId,
    /// Interaction mode last broadcast to this view
    pub mode: Mode,
}

/// A single labeled undo-snapshot entry in scene history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Human-readable description of the edit
    pub label: String,
}

/// Scene-level checkpoint log.
///
/// Code editors trigger a checkpoint when a block's source is committed on
/// focus loss; the host application restores scene snapshots from these
/// entries (snapshot payloads are the host's concern, only the log lives
/// here).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneHistory {
    #[serde(skip)]
    checkpoints: Vec<Checkpoint>,
    #[serde(skip)]
    modified: bool,
}

impl SceneHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a labeled checkpoint, optionally marking the scene modified.
    pub fn checkpoint(&mut self, label: &str, set_modified: bool) {
        log::debug!("scene checkpoint: {label}");
        self.checkpoints.push(Checkpoint {
            label: label.to_string(),
        });
        if self.checkpoints.len() > MAX_CHECKPOINT_HISTORY {
            self.checkpoints.remove(0);
        }
        if set_modified {
            self.modified = true;
        }
    }

    /// Number of recorded checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// True if no checkpoint has been recorded.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Label of the most recent checkpoint, if any.
    pub fn last_label(&self) -> Option<&str> {
        self.checkpoints.last().map(|c| c.label.as_str())
    }

    /// Whether the scene has unsaved modifications.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Sets or clears the modified flag (e.g. after a save).
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}

/// A scene groups blocks with the views showing them.
///
/// The scene owns the explicit observer list mode changes are broadcast to;
/// editors never enumerate windows themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Views currently showing this scene
    pub views: Vec<ViewObserver>,
    /// Checkpoint log for meaningful edits
    pub history: SceneHistory,
}

impl Scene {
    /// Creates a scene with no views.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new view and returns its id.
    pub fn add_view(&mut self) -> ViewId {
        let id = Uuid::new_v4();
        self.views.push(ViewObserver {
            id,
            mode: Mode::Noop,
        });
        id
    }

    /// Removes a view from the observer list.
    ///
    /// Returns `true` if the view was present.
    pub fn remove_view(&mut self, id: ViewId) -> bool {
        let before = self.views.len();
        self.views.retain(|view| view.id != id);
        self.views.len() != before
    }

    /// Writes `mode` into every registered view.
    pub fn broadcast_mode(&mut self, mode: Mode) {
        for view in &mut self.views {
            view.mode = mode;
        }
    }

    /// Mode of a specific view, if registered.
    pub fn view_mode(&self, id: ViewId) -> Option<Mode> {
        self.views.iter().find(|view| view.id == id).map(|v| v.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_reaches_every_view() {
        let mut scene = Scene::new();
        let a = scene.add_view();
        let b = scene.add_view();

        scene.broadcast_mode(Mode::Editing);

        assert_eq!(scene.view_mode(a), Some(Mode::Editing));
        assert_eq!(scene.view_mode(b), Some(Mode::Editing));
    }

    #[test]
    fn test_removed_view_no_longer_observed() {
        let mut scene = Scene::new();
        let a = scene.add_view();
        assert!(scene.remove_view(a));
        assert!(!scene.remove_view(a));
        assert_eq!(scene.view_mode(a), None);
    }

    #[test]
    fn test_checkpoint_records_label_and_modified() {
        let mut history = SceneHistory::new();
        assert!(!history.is_modified());

        history.checkpoint("A code block source was updated", true);

        assert_eq!(history.len(), 1);
        assert_eq!(history.last_label(), Some("A code block source was updated"));
        assert!(history.is_modified());
    }

    #[test]
    fn test_checkpoint_without_modified_flag() {
        let mut history = SceneHistory::new();
        history.checkpoint("view layout changed", false);
        assert!(!history.is_modified());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_checkpoint_history_is_capped() {
        let mut history = SceneHistory::new();
        for i in 0..(MAX_CHECKPOINT_HISTORY + 10) {
            history.checkpoint(&format!("edit {i}"), true);
        }
        assert_eq!(history.len(), MAX_CHECKPOINT_HISTORY);
        assert_eq!(history.last_label(), Some("edit 109"));
    }
}
