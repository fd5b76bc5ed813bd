//! Single-line search input with cursor editing
//!
//! Cursor position is tracked in characters; edits translate to byte
//! offsets at the boundary so multi-byte input behaves.

#[derive(Debug, Default)]
pub struct InputField {
    text: String,
    cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    #[allow(dead_code)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when the text is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Text split around the cursor: everything before it, the character
    /// under it (empty at end of line), and everything after. Splits on
    /// char boundaries so the renderer can mark whole glyphs.
    pub fn split_at_cursor(&self) -> (&str, &str, &str) {
        let start = self.byte_offset(self.cursor);
        let (before, tail) = self.text.split_at(start);
        let under_len = tail.chars().next().map_or(0, |c| c.len_utf8());
        let (under, after) = tail.split_at(under_len);
        (before, under, after)
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.text
            .chars()
            .take(char_pos)
            .map(|c| c.len_utf8())
            .sum()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert a character at the cursor. Always changes the text.
    pub fn insert(&mut self, c: char) -> bool {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Remove the character before the cursor. Returns whether the text
    /// changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.text.drain(start..end);
        self.cursor -= 1;
        true
    }

    /// Remove the character under the cursor. Returns whether the text
    /// changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.drain(start..end);
        true
    }

    /// Erase everything. Returns whether the text changed.
    pub fn clear(&mut self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        self.text.clear();
        self.cursor = 0;
        true
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with(text: &str) -> InputField {
        let mut field = InputField::new();
        for c in text.chars() {
            field.insert(c);
        }
        field
    }

    #[test]
    fn test_insert_appends_at_cursor() {
        let mut field = InputField::new();
        assert!(field.insert('h'));
        assert!(field.insert('i'));
        assert_eq!(field.text(), "hi");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut field = field_with("hllo");
        field.move_home();
        field.move_right();
        field.insert('e');
        assert_eq!(field.text(), "hello");
    }

    #[test]
    fn test_backspace() {
        let mut field = field_with("hello");
        assert!(field.backspace());
        assert_eq!(field.text(), "hell");

        let mut empty = InputField::new();
        assert!(!empty.backspace());
    }

    #[test]
    fn test_delete_under_cursor() {
        let mut field = field_with("hello");
        field.move_home();
        assert!(field.delete());
        assert_eq!(field.text(), "ello");

        field.move_end();
        assert!(!field.delete());
    }

    #[test]
    fn test_cursor_bounds() {
        let mut field = field_with("ab");
        field.move_right();
        assert_eq!(field.cursor(), 2);
        field.move_left();
        field.move_left();
        field.move_left();
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_unicode_editing() {
        let mut field = field_with("名前検索");
        assert_eq!(field.cursor(), 4);
        field.backspace();
        assert_eq!(field.text(), "名前検");
        field.move_home();
        field.delete();
        assert_eq!(field.text(), "前検");
        field.insert('🔍');
        assert_eq!(field.text(), "🔍前検");
    }

    #[test]
    fn test_clear() {
        let mut field = field_with("someone");
        assert!(field.clear());
        assert_eq!(field.text(), "");
        assert_eq!(field.cursor(), 0);
        assert!(!field.clear());
    }

    #[test]
    fn test_blank_detection() {
        assert!(InputField::new().is_blank());
        assert!(field_with("   ").is_blank());
        assert!(!field_with(" a ").is_blank());
    }

    #[test]
    fn test_split_at_cursor() {
        let mut field = field_with("hello");
        field.move_home();
        field.move_right();
        field.move_right();
        assert_eq!(field.split_at_cursor(), ("he", "l", "lo"));

        field.move_end();
        assert_eq!(field.split_at_cursor(), ("hello", "", ""));

        assert_eq!(InputField::new().split_at_cursor(), ("", "", ""));
    }

    #[test]
    fn test_split_at_cursor_lands_on_char_boundaries() {
        let mut field = field_with("名前検索");
        field.move_home();
        field.move_right();
        assert_eq!(field.split_at_cursor(), ("名", "前", "検索"));

        field.move_end();
        assert_eq!(field.split_at_cursor(), ("名前検索", "", ""));
    }
}
