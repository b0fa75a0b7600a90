//! Input buffer for not-yet-submitted text.

/// Editable text with a cursor and per-session submit history.
///
/// The cursor is a character index, not a byte offset, so multi-byte input
/// edits cleanly.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
    history: Vec<String>,
    /// Position while browsing history; `None` means editing fresh input.
    history_index: Option<usize>,
    /// Fresh input stashed while browsing history.
    saved_input: String,
}

impl InputBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// True when the content is empty after trimming whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor (paste).
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_offset(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Clear the content without touching history.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Record the current content in history and clear it.
    pub fn accept(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.commit(&content);
        content
    }

    /// Clear the content and record `entry` in history.
    ///
    /// Called when a submission is accepted, with the text actually sent.
    pub fn commit(&mut self, entry: &str) {
        self.clear();
        let entry = entry.trim();
        if !entry.is_empty() && self.history.last().map(String::as_str) != Some(entry) {
            self.history.push(entry.to_string());
        }
        self.history_index = None;
        self.saved_input.clear();
    }

    /// Previously accepted entries, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Step back to an older history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = match self.history_index {
            None => {
                self.saved_input = self.content.clone();
                0
            }
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(_) => return,
        };
        self.history_index = Some(next);
        self.content = self.history[self.history.len() - 1 - next].clone();
        self.move_end();
    }

    /// Step forward to a newer entry, ending at the stashed fresh input.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.history_index = None;
                self.content = std::mem::take(&mut self.saved_input);
                self.move_end();
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.content = self.history[self.history.len() - i].clone();
                self.move_end();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_editing() {
        let mut input = InputBuffer::new();
        assert!(input.is_empty());

        input.insert('H');
        input.insert('i');
        assert_eq!(input.content(), "Hi");
        assert_eq!(input.cursor(), 2);

        input.backspace();
        assert_eq!(input.content(), "H");

        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_cursor_movement() {
        let mut input = InputBuffer::new();
        input.insert_str("Hello");

        input.move_left();
        input.move_left();
        assert_eq!(input.cursor(), 3);

        input.insert('X');
        assert_eq!(input.content(), "HelXlo");

        input.move_home();
        input.move_left();
        assert_eq!(input.cursor(), 0);
        input.delete();
        assert_eq!(input.content(), "elXlo");

        input.move_end();
        input.move_right();
        assert_eq!(input.cursor(), 5);
        input.delete();
        assert_eq!(input.content(), "elXlo");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = InputBuffer::new();
        input.insert_str("héllo ✓");
        assert_eq!(input.cursor(), 7);

        input.backspace();
        input.move_left();
        input.move_left();
        input.insert('ü');
        assert_eq!(input.content(), "héllüo ");
    }

    #[test]
    fn test_blank_detection() {
        let mut input = InputBuffer::new();
        assert!(input.is_blank());
        input.insert_str(" \n\t");
        assert!(input.is_blank());
        assert!(!input.is_empty());
        input.insert('x');
        assert!(!input.is_blank());
    }

    #[test]
    fn test_accept_clears_and_records_history() {
        let mut input = InputBuffer::new();
        input.insert_str("  first  ");
        assert_eq!(input.accept(), "  first  ");
        assert!(input.is_empty());
        assert_eq!(input.history(), ["first".to_string()]);

        input.insert_str("first");
        input.accept();
        assert_eq!(input.history().len(), 1);
    }

    #[test]
    fn test_commit_records_given_entry() {
        let mut input = InputBuffer::new();
        input.insert_str("stale");
        input.commit(" sent ");
        assert!(input.is_empty());
        assert_eq!(input.history(), ["sent".to_string()]);

        input.commit("   ");
        assert_eq!(input.history().len(), 1);
    }

    #[test]
    fn test_history_navigation() {
        let mut input = InputBuffer::new();
        input.insert_str("first");
        input.accept();
        input.insert_str("second");
        input.accept();

        input.insert_str("draft");
        input.history_prev();
        assert_eq!(input.content(), "second");
        input.history_prev();
        assert_eq!(input.content(), "first");
        input.history_prev();
        assert_eq!(input.content(), "first");

        input.history_next();
        assert_eq!(input.content(), "second");
        input.history_next();
        assert_eq!(input.content(), "draft");
        assert_eq!(input.cursor(), 5);

        input.history_next();
        assert_eq!(input.content(), "draft");
    }
}
