//! Plain text-editing capability used by the code editor.
//!
//! The buffer is a string plus a caret expressed as a char index. Wrapping it
//! in [`super::history::EditorHistory`] replaces the usual approach of
//! inheriting a text widget and fighting its built-in undo stack.

use serde::{Deserialize, Serialize};

/// Point-in-time copy of a buffer, the unit of undo/redo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferSnapshot {
    /// Full buffer contents
    pub text: String,
    /// Caret position as a char index
    pub cursor: usize,
}

/// Editable text plus caret.
///
/// All operations are total: edits at buffer boundaries that cannot apply
/// (backspace at position 0, delete at the end) are no-ops, and the caret is
/// always clamped to `0..=char_len`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    /// Creates a buffer seeded with `text`, caret at the end.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    /// Current buffer contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position as a char index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of chars in the buffer.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Replaces the entire contents, clamping the caret.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.cursor.min(self.char_len());
    }

    /// Moves the caret, clamping to the buffer bounds.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.char_len());
    }

    /// Inserts a char at the caret and advances past it.
    pub fn insert_char(&mut self, ch: char) {
        let at = char_to_byte_idx(&self.text, self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Inserts a string at the caret and advances past it.
    pub fn insert_str(&mut self, s: &str) {
        let at = char_to_byte_idx(&self.text, self.cursor);
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Removes the char before the caret, if any.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = char_to_byte_idx(&self.text, self.cursor - 1);
        let end = char_to_byte_idx(&self.text, self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    /// Removes the char after the caret, if any.
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let start = char_to_byte_idx(&self.text, self.cursor);
        let end = char_to_byte_idx(&self.text, self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    /// Captures the current state for the undo history.
    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            text: self.text.clone(),
            cursor: self.cursor,
        }
    }

    /// Restores a previously captured state.
    pub fn restore(&mut self, snapshot: &BufferSnapshot) {
        self.text = snapshot.text.clone();
        self.cursor = snapshot.cursor.min(snapshot.text.chars().count());
    }
}

fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _ch)) in s.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut buffer = TextBuffer::default();
        buffer.insert_char('a');
        buffer.insert_char('b');
        assert_eq!(buffer.text(), "ab");
        assert_eq!(buffer.cursor(), 2);

        buffer.backspace();
        assert_eq!(buffer.text(), "a");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buffer = TextBuffer::new("xy");
        buffer.set_cursor(0);
        buffer.backspace();
        assert_eq!(buffer.text(), "xy");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buffer = TextBuffer::new("xy");
        buffer.delete_forward();
        assert_eq!(buffer.text(), "xy");
    }

    #[test]
    fn test_insert_mid_buffer_multibyte() {
        let mut buffer = TextBuffer::new("héllo");
        buffer.set_cursor(2);
        buffer.insert_char('—');
        assert_eq!(buffer.text(), "hé—llo");
        assert_eq!(buffer.cursor(), 3);

        buffer.backspace();
        assert_eq!(buffer.text(), "héllo");
    }

    #[test]
    fn test_set_text_clamps_cursor() {
        let mut buffer = TextBuffer::new("abcdef");
        assert_eq!(buffer.cursor(), 6);
        buffer.set_text("ab");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut buffer = TextBuffer::new("line one\n");
        let snapshot = buffer.snapshot();

        buffer.insert_str("line two");
        assert_ne!(buffer.snapshot(), snapshot);

        buffer.restore(&snapshot);
        assert_eq!(buffer.text(), "line one\n");
        assert_eq!(buffer.cursor(), 9);
    }
}
