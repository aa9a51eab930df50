//! Text state of an autocomplete field.

/// Text, cursor, and inline type-ahead suggestion of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    /// Current field value.
    text: String,
    /// Cursor position (character index).
    cursor: usize,
    /// Suffix offered by type-ahead, shown after the text.
    suggestion: Option<String>,
}

impl InputField {
    /// Creates an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Replaces the value and moves the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.text = value.into();
        self.cursor = self.char_len();
        self.suggestion = None;
    }

    /// Sets the inline suggestion. An empty suffix clears it.
    pub fn set_suggestion(&mut self, suffix: Option<String>) {
        self.suggestion = suffix.filter(|s| !s.is_empty());
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        self.suggestion = None;
    }

    /// Deletes the character before the cursor. Returns true if the text changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        self.suggestion = None;
        true
    }

    /// Deletes the character at the cursor. Returns true if the text changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        self.suggestion = None;
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Clears the value and any suggestion.
    pub fn clear(&mut self) {
        self.set_value(String::new());
    }

    /// Number of characters in the value.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut input = InputField::new();
        input.insert('a');
        input.insert('b');
        assert_eq!(input.text(), "ab");
        assert_eq!(input.cursor(), 2);

        assert!(input.backspace());
        assert_eq!(input.text(), "a");
        input.move_home();
        assert!(!input.backspace());
    }

    #[test]
    fn test_insert_in_middle_with_multibyte_text() {
        let mut input = InputField::new();
        input.set_value("héllo");
        input.move_home();
        input.move_right();
        input.move_right();
        input.insert('X');
        assert_eq!(input.text(), "héXllo");
        assert!(input.delete());
        assert_eq!(input.text(), "héXlo");
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut input = InputField::new();
        input.set_value("ab");
        assert!(!input.delete());
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = InputField::new();
        input.set_value("ab");
        input.move_right();
        assert_eq!(input.cursor(), 2);
        input.move_left();
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor(), 0);
        input.move_end();
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_edits_clear_suggestion() {
        let mut input = InputField::new();
        input.set_value("ap");
        input.set_suggestion(Some("ple".into()));
        assert_eq!(input.suggestion(), Some("ple"));
        input.insert('p');
        assert_eq!(input.suggestion(), None);
    }

    #[test]
    fn test_empty_suggestion_is_none() {
        let mut input = InputField::new();
        input.set_suggestion(Some(String::new()));
        assert_eq!(input.suggestion(), None);
    }
}
