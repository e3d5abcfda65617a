use tracing::trace;
use unicode_width::UnicodeWidthStr;

use super::{CaretPlacement, Cursor, DEFAULT_LINE_LENGTH, Direction, EditBuffer, INDENT, WRAP_SLACK};
use crate::event::{EditKey, KeyOutcome, NavDirection, NavigationIntent};

/// The editable form of a block.
///
/// Owns the block's raw text and caret. Each key is either applied to the
/// text, turned into a caret move, or reported back as a
/// [`NavigationIntent`] for the document to act on.
#[derive(Debug)]
pub struct BlockEditController {
    buffer: EditBuffer,
    visual_rows: usize,
    line_length: usize,
}

impl BlockEditController {
    /// Enter edit mode for `text`.
    ///
    /// The initial row estimate is one row per logical line; wrapping is only
    /// accounted for after the first edit.
    pub fn new(text: &str, placement: CaretPlacement, line_length: usize) -> Self {
        let mut buffer = EditBuffer::from_text(text);
        if placement == CaretPlacement::End {
            buffer.move_to_end();
        }
        Self {
            buffer,
            visual_rows: text.matches('\n').count() + 1,
            line_length,
        }
    }

    /// An empty block ready for typing.
    pub fn empty(line_length: usize) -> Self {
        Self::new("", CaretPlacement::Start, line_length)
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn into_text(self) -> String {
        self.buffer.text()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Caret offset in chars.
    pub const fn caret(&self) -> usize {
        self.buffer.caret()
    }

    pub fn cursor(&self) -> Cursor {
        self.buffer.cursor()
    }

    pub fn set_caret(&mut self, offset: usize) {
        self.buffer.set_caret(offset);
    }

    /// Rows the text occupies once wrapped, as of the last edit.
    pub const fn visual_rows(&self) -> usize {
        self.visual_rows
    }

    pub const fn line_length(&self) -> usize {
        self.line_length
    }

    /// 1-based wrapped row holding the caret.
    pub fn caret_visual_row(&self) -> usize {
        let cursor = self.buffer.cursor();
        let wrap = self.wrap_width();
        let above: usize = (0..cursor.line)
            .map(|idx| 1 + self.buffer.line_at(idx).map_or(0, |l| l.width()) / wrap)
            .sum();
        above + self.buffer.line_prefix().width() / wrap + 1
    }

    /// Apply one key to the block.
    pub fn handle_key(&mut self, key: EditKey) -> KeyOutcome {
        trace!(?key, caret = self.buffer.caret(), "block key");
        match key {
            EditKey::Char(ch) => {
                self.buffer.insert_char(ch);
                self.edited()
            }
            EditKey::Tab => self.indent(),
            EditKey::BackTab => self.outdent(),
            EditKey::Enter => self.enter(),
            EditKey::Backspace => self.backspace(),
            EditKey::Delete => {
                if self.buffer.delete_forward() {
                    self.edited()
                } else {
                    KeyOutcome::none()
                }
            }
            EditKey::Up => {
                if self.buffer.caret() == 0 {
                    return KeyOutcome::navigate(NavigationIntent::focus(NavDirection::Previous));
                }
                self.buffer.move_cursor(Direction::Up);
                KeyOutcome::none()
            }
            EditKey::Down => {
                // The seeded row count ignores wrapping until the first edit.
                if self.caret_visual_row() >= self.compute_visual_rows() {
                    return KeyOutcome::navigate(NavigationIntent::focus(NavDirection::Next));
                }
                self.buffer.move_cursor(Direction::Down);
                KeyOutcome::none()
            }
            EditKey::Left => self.moved(|b| b.move_cursor(Direction::Left)),
            EditKey::Right => self.moved(|b| b.move_cursor(Direction::Right)),
            EditKey::Home => self.moved(EditBuffer::move_home),
            EditKey::End => self.moved(EditBuffer::move_end),
            EditKey::WordLeft => self.moved(EditBuffer::move_word_left),
            EditKey::WordRight => self.moved(EditBuffer::move_word_right),
        }
    }

    fn moved(&mut self, f: impl FnOnce(&mut EditBuffer)) -> KeyOutcome {
        f(&mut self.buffer);
        KeyOutcome::none()
    }

    fn indent(&mut self) -> KeyOutcome {
        let start = self.buffer.line_start(self.buffer.cursor().line);
        self.buffer.insert_at(start, INDENT);
        self.edited()
    }

    fn outdent(&mut self) -> KeyOutcome {
        let line = self.buffer.cursor().line;
        let starts_indented = self
            .buffer
            .line_at(line)
            .is_some_and(|l| l.starts_with(INDENT));
        if !starts_indented {
            return KeyOutcome::none();
        }
        let start = self.buffer.line_start(line);
        self.buffer.remove_range(start..start + INDENT.len());
        self.edited()
    }

    fn enter(&mut self) -> KeyOutcome {
        let carried: String = self
            .buffer
            .line_prefix()
            .chars()
            .take_while(|&c| c == ' ')
            .collect();
        if !carried.is_empty() {
            self.buffer.insert_str(&format!("\n{carried}"));
            return self.edited();
        }

        let caret = self.buffer.caret();
        if caret == 0 && !self.buffer.is_empty() {
            return KeyOutcome::navigate(NavigationIntent::create(NavDirection::Previous));
        }
        if caret == self.buffer.len_chars() && self.buffer.char_before_caret() == Some('\n') {
            return KeyOutcome::navigate(NavigationIntent::create(NavDirection::Next));
        }

        self.buffer.insert_char('\n');
        self.edited()
    }

    fn backspace(&mut self) -> KeyOutcome {
        if self.buffer.caret() == 0 {
            return KeyOutcome::navigate(NavigationIntent {
                direction: NavDirection::Previous,
                create_next: false,
                delete_current: self.buffer.is_empty(),
            });
        }
        self.buffer.delete_back();
        self.edited()
    }

    fn edited(&mut self) -> KeyOutcome {
        self.visual_rows = self.compute_visual_rows();
        KeyOutcome::edited(self.buffer.text())
    }

    fn compute_visual_rows(&self) -> usize {
        let wrap = self.wrap_width();
        (0..self.buffer.line_count())
            .map(|idx| 1 + self.buffer.line_at(idx).map_or(0, |l| l.width()) / wrap)
            .sum()
    }

    fn wrap_width(&self) -> usize {
        self.line_length.saturating_sub(WRAP_SLACK).max(1)
    }
}

impl Default for BlockEditController {
    fn default() -> Self {
        Self::empty(DEFAULT_LINE_LENGTH)
    }
}
