//! In-block code editor: a text buffer with sequence-grouped undo history and
//! a two-state interaction mode broadcast to every view of the owning scene.
//!
//! The editor is headless; the host maps raw input (pointer presses, key
//! presses, scroll deltas) onto the handlers here and renders the buffer with
//! whatever text widget it likes. The widget's own undo must stay disabled,
//! [`history::EditorHistory`] is the only undo authority.

pub mod buffer;
pub mod history;


use crate::scene::Scene;
use crate::theme::{SubscriptionId, Theme, ThemeRegistry};
use crate::types::Mode;
use self::buffer::TextBuffer;
use self::history::EditorHistory;
use serde::{Deserialize, Serialize};

/// A key press as seen by the editor.
///
/// Any key without special meaning maps to `Char`; the handler is total over
/// this alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPress {
    /// The control modifier key itself
    Control,
    /// Return / Enter
    Return,
    /// Backspace
    Backspace,
    /// An ordinary character key
    Char(char),
}

/// Text-editing surface for one block's source code.
#[derive(Debug)]
pub struct CodeEditor {
    mode: Mode,
    /// Latched while the control key is held, cleared by any ordinary key
    pressing_control: bool,
    buffer: TextBuffer,
    history: EditorHistory,
    style: Theme,
    theme_subscription: Option<SubscriptionId>,
}

impl CodeEditor {
    /// Creates an editor seeded with `source`, subscribed to theme changes.
    pub fn new(source: &str, themes: &mut ThemeRegistry) -> Self {
        let mut editor = Self {
            mode: Mode::Noop,
            pressing_control: false,
            buffer: TextBuffer::new(source),
            history: EditorHistory::new(),
            style: themes.current().clone(),
            theme_subscription: Some(themes.subscribe()),
        };
        // Consume the initial notification so the next poll only fires on a
        // real change
        editor.refresh_theme(themes);
        editor
    }

    /// Drops the theme subscription. Must be called before the registry
    /// outlives the editor, otherwise the registry keeps dead subscriber
    /// state around.
    pub fn teardown(&mut self, themes: &mut ThemeRegistry) {
        if let Some(id) = self.theme_subscription.take() {
            themes.unsubscribe(id);
        }
    }

    /// Re-applies font and colors if the theme changed since the last poll.
    pub fn refresh_theme(&mut self, themes: &mut ThemeRegistry) {
        if let Some(id) = self.theme_subscription {
            if let Some(theme) = themes.poll(id) {
                self.style = theme;
            }
        }
    }

    /// Current interaction mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Styling currently applied to the editor.
    pub fn style(&self) -> &Theme {
        &self.style
    }

    /// Current buffer contents.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// The underlying text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The editor's undo history.
    pub fn history(&self) -> &EditorHistory {
        &self.history
    }

    /// Overwrites the buffer contents (used when the block's `source`
    /// property is set from outside).
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    fn set_mode(&mut self, mode: Mode, scene: &mut Scene) {
        self.mode = mode;
        scene.broadcast_mode(mode);
    }

    /// Handles a pointer-button press inside the editor.
    ///
    /// A primary press switches the editor into [`Mode::Editing`], places the
    /// caret where the host hit-tested the click (`caret`, char index), and
    /// closes the current undo sequence so the click boundary never merges
    /// into an in-progress typing sequence. Other buttons only place the
    /// caret.
    pub fn mouse_press(
        &mut self,
        button: egui::PointerButton,
        caret: Option<usize>,
        scene: &mut Scene,
    ) {
        if button == egui::PointerButton::Primary {
            self.set_mode(Mode::Editing, scene);
        }
        if let Some(cursor) = caret {
            self.buffer.set_cursor(cursor);
        }
        self.history.end_sequence(&self.buffer);
    }

    /// Handles a key press.
    ///
    /// Ctrl+Z closes the running sequence, opens a fresh one and undoes one
    /// unit; Ctrl+Y redoes. Every ordinary key clears the control latch,
    /// opens a sequence if none is running and applies its edit. Return
    /// additionally closes the sequence, so each line break ends an undo
    /// unit.
    pub fn key_press(&mut self, key: KeyPress) {
        if self.pressing_control && matches!(key, KeyPress::Char('z' | 'Z')) {
            self.history.end_sequence(&self.buffer);
            self.history.start_sequence(&self.buffer);
            self.history.undo(&mut self.buffer);
        } else if self.pressing_control && matches!(key, KeyPress::Char('y' | 'Y')) {
            self.history.redo(&mut self.buffer);
        } else if key == KeyPress::Control {
            self.pressing_control = true;
        } else {
            self.pressing_control = false;
            self.history.start_sequence(&self.buffer);
            match key {
                KeyPress::Char(ch) => self.buffer.insert_char(ch),
                KeyPress::Backspace => self.buffer.backspace(),
                KeyPress::Return => self.buffer.insert_char('\n'),
                KeyPress::Control => {}
            }
        }

        if key == KeyPress::Return {
            self.history.end_sequence(&self.buffer);
        }
    }

    /// Decides whether a scroll event belongs to the editor.
    ///
    /// Returns `true` only while editing and the scroll is purely vertical;
    /// the host forwards consumed events to the text widget and leaves the
    /// rest to the canvas for panning and zooming.
    pub fn wheel(&self, delta: egui::Vec2) -> bool {
        self.mode == Mode::Editing && delta.x == 0.0
    }

    /// Handles loss of keyboard focus: closes the undo sequence and drops
    /// back to [`Mode::Noop`].
    ///
    /// The owning block wraps this with the source write-back and the scene
    /// checkpoint (see [`crate::block::Block::sync_on_focus_out`]); the order
    /// of those steps is part of the undo-granularity contract.
    pub fn focus_out(&mut self, scene: &mut Scene) {
        self.history.end_sequence(&self.buffer);
        self.set_mode(Mode::Noop, scene);
    }
}
