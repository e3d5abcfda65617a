use std::ops::Range;

use ropey::Rope;

/// Line/column view of the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in chars.
    pub col: usize,
}

impl Cursor {
    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A block's raw text backed by a rope, with a caret measured in chars.
///
/// The caret offset is the source of truth; line/column positions are derived
/// from it on demand.
pub struct EditBuffer {
    rope: Rope,
    caret: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl EditBuffer {
    /// Create a buffer with the caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            caret: 0,
            col_memory: 0,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Caret offset in chars.
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// Place the caret.
    ///
    /// An offset past the end is a caller bug: debug builds panic, release
    /// builds clamp.
    pub fn set_caret(&mut self, offset: usize) {
        let len = self.len_chars();
        debug_assert!(offset <= len, "caret {offset} outside 0..={len}");
        self.caret = offset.min(len);
        self.col_memory = self.cursor().col;
    }

    /// Number of chars in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The caret as a line/column pair.
    pub fn cursor(&self) -> Cursor {
        let line = self.rope.char_to_line(self.caret);
        Cursor::at(line, self.caret - self.rope.line_to_char(line))
    }

    /// Total number of lines; a trailing newline opens an empty last line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.strip_suffix('\n').map_or_else(|| s.clone(), ToOwned::to_owned))
    }

    /// Length of a line in chars (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    /// Char offset where `line_idx` begins.
    pub fn line_start(&self, line_idx: usize) -> usize {
        self.rope.line_to_char(line_idx.min(self.rope.len_lines()))
    }

    /// Text between the start of the caret's line and the caret.
    pub fn line_prefix(&self) -> String {
        let start = self.line_start(self.cursor().line);
        self.rope.slice(start..self.caret).to_string()
    }

    /// The char immediately before the caret.
    pub fn char_before_caret(&self) -> Option<char> {
        self.caret.checked_sub(1).map(|idx| self.rope.char(idx))
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert a character at the caret.
    pub fn insert_char(&mut self, ch: char) {
        self.rope.insert_char(self.caret, ch);
        self.caret += 1;
        self.col_memory = self.cursor().col;
    }

    /// Insert a string at the caret, leaving the caret after it.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.rope.insert(self.caret, s);
        self.caret += s.chars().count();
        self.col_memory = self.cursor().col;
    }

    /// Insert a string at `offset`; a caret at or after `offset` shifts with the text.
    pub fn insert_at(&mut self, offset: usize, s: &str) {
        let offset = offset.min(self.len_chars());
        self.rope.insert(offset, s);
        if self.caret >= offset {
            self.caret += s.chars().count();
        }
        self.col_memory = self.cursor().col;
    }

    /// Remove a char range; a caret inside it collapses to its start.
    pub fn remove_range(&mut self, range: Range<usize>) {
        let len = self.len_chars();
        let range = range.start.min(len)..range.end.min(len);
        if range.is_empty() {
            return;
        }
        self.rope.remove(range.clone());
        if self.caret >= range.end {
            self.caret -= range.len();
        } else if self.caret > range.start {
            self.caret = range.start;
        }
        self.col_memory = self.cursor().col;
    }

    /// Delete the character before the caret (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.remove_range(self.caret - 1..self.caret);
        true
    }

    /// Delete the character at the caret (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.caret >= self.len_chars() {
            return false;
        }
        self.remove_range(self.caret..self.caret + 1);
        true
    }

    /// Move the caret in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move caret to the beginning of the line (Home).
    pub fn move_home(&mut self) {
        let start = self.line_start(self.cursor().line);
        self.set_caret(start);
    }

    /// Move caret to the end of the line (End).
    pub fn move_end(&mut self) {
        let line = self.cursor().line;
        self.set_caret(self.line_start(line) + self.line_len(line));
    }

    /// Move caret one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        let cursor = self.cursor();
        if cursor.col == 0 {
            if self.caret > 0 {
                self.set_caret(self.caret - 1);
            }
            return;
        }

        let line: Vec<char> = self.line_at(cursor.line).unwrap_or_default().chars().collect();
        let mut col = cursor.col;
        while col > 0 && !is_word_char(line[col - 1]) {
            col -= 1;
        }
        while col > 0 && is_word_char(line[col - 1]) {
            col -= 1;
        }
        self.set_caret(self.line_start(cursor.line) + col);
    }

    /// Move caret one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let cursor = self.cursor();
        let line_len = self.line_len(cursor.line);
        if cursor.col >= line_len {
            if self.caret < self.len_chars() {
                self.set_caret(self.caret + 1);
            }
            return;
        }

        let line: Vec<char> = self.line_at(cursor.line).unwrap_or_default().chars().collect();
        let mut col = cursor.col;
        // Skip current word characters, then the gap after it
        while col < line.len() && is_word_char(line[col]) {
            col += 1;
        }
        while col < line.len() && !is_word_char(line[col]) {
            col += 1;
        }
        self.set_caret(self.line_start(cursor.line) + col);
    }

    /// Move caret to a specific line and column, clamped to the text.
    #[cfg(test)]
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let col = col.min(self.line_len(line));
        self.set_caret(self.line_start(line) + col);
    }

    /// Move caret to the end of the buffer.
    pub fn move_to_end(&mut self) {
        self.set_caret(self.len_chars());
    }

    // --- Private helpers ---

    fn move_left(&mut self) {
        if self.caret > 0 {
            self.set_caret(self.caret - 1);
        }
    }

    fn move_right(&mut self) {
        if self.caret < self.len_chars() {
            self.set_caret(self.caret + 1);
        }
    }

    fn move_up(&mut self) {
        let line = self.cursor().line;
        if line == 0 {
            self.set_caret(0);
            return;
        }
        let col = self.col_memory.min(self.line_len(line - 1));
        self.caret = self.line_start(line - 1) + col;
    }

    fn move_down(&mut self) {
        let line = self.cursor().line;
        if line + 1 >= self.line_count() {
            self.set_caret(self.len_chars());
            return;
        }
        let col = self.col_memory.min(self.line_len(line + 1));
        self.caret = self.line_start(line + 1) + col;
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl std::fmt::Debug for EditBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("caret", &self.caret)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_text_trailing_newline_opens_empty_line() {
        let buf = EditBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_carriage_return_is_not_a_line_break() {
        let buf = EditBuffer::from_text("a\rb");
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn test_line_len_counts_chars() {
        let buf = EditBuffer::from_text("café\nhi");
        assert_eq!(buf.line_len(0), 4);
        assert_eq!(buf.line_len(1), 2);
    }

    #[test]
    fn test_cursor_tracks_caret_offset() {
        let mut buf = EditBuffer::from_text("hello\nworld");
        buf.set_caret(8);
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
        buf.set_caret(11);
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
    }

    #[test]
    fn test_line_prefix_stops_at_caret() {
        let mut buf = EditBuffer::from_text("one\n  two");
        buf.set_caret(7);
        assert_eq!(buf.line_prefix(), "  t");
    }

    #[test]
    #[should_panic(expected = "outside")]
    #[cfg(debug_assertions)]
    fn test_set_caret_past_end_is_a_bug() {
        let mut buf = EditBuffer::from_text("abc");
        buf.set_caret(10);
    }

    // --- Insertion ---

    #[test]
    fn test_insert_char_advances_caret() {
        let mut buf = EditBuffer::from_text("hllo");
        buf.set_caret(1);
        buf.insert_char('e');
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.caret(), 2);
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut buf = EditBuffer::from_text("caf");
        buf.move_to_end();
        buf.insert_char('é');
        assert_eq!(buf.text(), "café");
        assert_eq!(buf.caret(), 4);
    }

    #[test]
    fn test_insert_str_with_newline_moves_to_next_line() {
        let mut buf = EditBuffer::from_text("ab");
        buf.set_caret(1);
        buf.insert_str("\n  ");
        assert_eq!(buf.text(), "a\n  b");
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
    }

    #[test]
    fn test_insert_at_before_caret_shifts_caret() {
        let mut buf = EditBuffer::from_text("abc");
        buf.set_caret(2);
        buf.insert_at(0, "  ");
        assert_eq!(buf.text(), "  abc");
        assert_eq!(buf.caret(), 4);
    }

    #[test]
    fn test_insert_at_after_caret_keeps_caret() {
        let mut buf = EditBuffer::from_text("abc");
        buf.set_caret(1);
        buf.insert_at(3, "!");
        assert_eq!(buf.caret(), 1);
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditBuffer::from_text("hello");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditBuffer::from_text("hello");
        buf.move_to_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_remove_range_collapses_caret_inside() {
        let mut buf = EditBuffer::from_text("  abc");
        buf.set_caret(1);
        buf.remove_range(0..2);
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.caret(), 0);
    }

    // --- Movement ---

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = EditBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_up_on_first_line_goes_to_start() {
        let mut buf = EditBuffer::from_text("hello\nworld");
        buf.set_caret(3);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.caret(), 0);
    }

    #[test]
    fn test_move_down_on_last_line_goes_to_end() {
        let mut buf = EditBuffer::from_text("hello\nworld");
        buf.move_to(1, 1);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.caret(), 11);
    }

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = EditBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor(), Cursor::at(2, 4));
    }

    #[test]
    fn test_home_and_end() {
        let mut buf = EditBuffer::from_text("one\ntwo words");
        buf.move_to(1, 4);
        buf.move_home();
        assert_eq!(buf.caret(), 4);
        buf.move_end();
        assert_eq!(buf.caret(), 13);
    }

    #[test]
    fn test_move_word_left_from_middle_of_word() {
        let mut buf = EditBuffer::from_text("hello world");
        buf.set_caret(8);
        buf.move_word_left();
        assert_eq!(buf.caret(), 6);
        buf.move_word_left();
        assert_eq!(buf.caret(), 0);
    }

    #[test]
    fn test_move_word_right_skips_gap() {
        let mut buf = EditBuffer::from_text("hello world");
        buf.move_word_right();
        assert_eq!(buf.caret(), 6);
    }

    #[test]
    fn test_move_word_right_at_line_end_wraps() {
        let mut buf = EditBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.move_word_right();
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_char_before_caret() {
        let mut buf = EditBuffer::from_text("a\n");
        assert_eq!(buf.char_before_caret(), None);
        buf.move_to_end();
        assert_eq!(buf.char_before_caret(), Some('\n'));
    }
}
