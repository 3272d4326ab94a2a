//! Sequence-grouped undo/redo for one code editor.
//!
//! Consecutive keystrokes are grouped into "sequences", each undone as a
//! single unit. The editor drives the grouping externally (start on the first
//! ordinary keystroke, end on line breaks, clicks and focus changes); the
//! history itself only stores buffer snapshots, the native undo of whatever
//! widget hosts the buffer is never involved.

use super::buffer::{BufferSnapshot, TextBuffer};
use serde::{Deserialize, Serialize};

/// Maximum number of undo units to keep in history
const MAX_UNDO_HISTORY: usize = 100;

/// Undo/redo log of editing sequences, owned by exactly one editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorHistory {
    /// Snapshot taken when the open sequence started
    #[serde(skip)]
    anchor: Option<BufferSnapshot>,
    /// Units that can be undone (each entry is the state before a sequence)
    #[serde(skip)]
    undo_stack: Vec<BufferSnapshot>,
    /// Units that can be re-applied
    #[serde(skip)]
    redo_stack: Vec<BufferSnapshot>,
}

impl EditorHistory {
    /// Creates an empty history with no open sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a sequence is currently being grouped.
    pub fn sequence_open(&self) -> bool {
        self.anchor.is_some()
    }

    /// Opens a sequence anchored at the buffer's current state.
    ///
    /// No-op if a sequence is already open.
    pub fn start_sequence(&mut self, buffer: &TextBuffer) {
        if self.anchor.is_none() {
            self.anchor = Some(buffer.snapshot());
        }
    }

    /// Closes the open sequence, finalizing one undo unit.
    ///
    /// The anchor becomes an undo entry only if the buffer actually changed
    /// since the sequence started; an empty sequence leaves history
    /// untouched. No-op if no sequence is open.
    pub fn end_sequence(&mut self, buffer: &TextBuffer) {
        let Some(anchor) = self.anchor.take() else {
            return;
        };
        if anchor != buffer.snapshot() {
            self.undo_stack.push(anchor);
            self.redo_stack.clear();
            if self.undo_stack.len() > MAX_UNDO_HISTORY {
                self.undo_stack.remove(0);
            }
        }
    }

    /// Reverts the most recently closed unit.
    ///
    /// Any open sequence is ended first, so in-flight keystrokes become a
    /// unit of their own instead of merging with the undo itself.
    pub fn undo(&mut self, buffer: &mut TextBuffer) {
        self.end_sequence(buffer);
        if let Some(snapshot) = self.undo_stack.pop() {
            self.redo_stack.push(buffer.snapshot());
            buffer.restore(&snapshot);
        }
    }

    /// Re-applies the most recently undone unit.
    pub fn redo(&mut self, buffer: &mut TextBuffer) {
        if let Some(snapshot) = self.redo_stack.pop() {
            self.undo_stack.push(buffer.snapshot());
            buffer.restore(&snapshot);
        }
    }

    /// Returns true if there are units that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are units that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drops all recorded units and closes any open sequence.
    pub fn clear(&mut self) {
        self.anchor = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(buffer: &mut TextBuffer, history: &mut EditorHistory, s: &str) {
        history.start_sequence(buffer);
        buffer.insert_str(s);
    }

    #[test]
    fn test_start_sequence_is_idempotent() {
        let mut buffer = TextBuffer::default();
        let mut history = EditorHistory::new();

        history.start_sequence(&buffer);
        buffer.insert_char('a');
        // A second start while open must not move the anchor
        history.start_sequence(&buffer);
        buffer.insert_char('b');
        history.end_sequence(&buffer);

        history.undo(&mut buffer);
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_end_sequence_without_open_is_noop() {
        let mut buffer = TextBuffer::new("abc");
        let mut history = EditorHistory::new();

        history.end_sequence(&buffer);

        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(!history.sequence_open());
    }

    #[test]
    fn test_empty_sequence_records_nothing() {
        let mut buffer = TextBuffer::new("abc");
        let mut history = EditorHistory::new();

        history.start_sequence(&buffer);
        history.end_sequence(&buffer);

        assert!(!history.can_undo());
    }

    #[test]
    fn test_sequence_undone_as_one_unit() {
        let mut buffer = TextBuffer::default();
        let mut history = EditorHistory::new();

        history.start_sequence(&buffer);
        buffer.insert_char('a');
        buffer.insert_char('b');
        buffer.insert_char('c');
        history.end_sequence(&buffer);

        history.undo(&mut buffer);
        assert_eq!(buffer.text(), "");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_undo_ends_open_sequence_first() {
        let mut buffer = TextBuffer::default();
        let mut history = EditorHistory::new();

        type_str(&mut buffer, &mut history, "abc");
        // Sequence still open; undo must close it and revert it
        history.undo(&mut buffer);

        assert_eq!(buffer.text(), "");
        assert!(!history.sequence_open());
    }

    #[test]
    fn test_redo_restores_undone_unit() {
        let mut buffer = TextBuffer::default();
        let mut history = EditorHistory::new();

        type_str(&mut buffer, &mut history, "hello");
        history.end_sequence(&buffer);

        history.undo(&mut buffer);
        assert_eq!(buffer.text(), "");

        history.redo(&mut buffer);
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.cursor(), 5);
    }

    #[test]
    fn test_new_unit_clears_redo() {
        let mut buffer = TextBuffer::default();
        let mut history = EditorHistory::new();

        type_str(&mut buffer, &mut history, "one");
        history.end_sequence(&buffer);
        history.undo(&mut buffer);
        assert!(history.can_redo());

        type_str(&mut buffer, &mut history, "two");
        history.end_sequence(&buffer);

        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_on_empty_history_are_noops() {
        let mut buffer = TextBuffer::new("keep");
        let mut history = EditorHistory::new();

        history.undo(&mut buffer);
        history.redo(&mut buffer);

        assert_eq!(buffer.text(), "keep");
    }

    #[test]
    fn test_history_depth_is_capped() {
        let mut buffer = TextBuffer::default();
        let mut history = EditorHistory::new();

        for i in 0..(MAX_UNDO_HISTORY + 5) {
            type_str(&mut buffer, &mut history, &format!("{i},"));
            history.end_sequence(&buffer);
        }

        let mut undos = 0;
        while history.can_undo() {
            history.undo(&mut buffer);
            undos += 1;
        }
        assert_eq!(undos, MAX_UNDO_HISTORY);
        // The oldest units fell off the front, so the first ones remain
        assert!(buffer.text().starts_with("0,"));
    }
}
