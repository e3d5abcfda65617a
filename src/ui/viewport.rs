//! Scroll state over the laid-out document rows.

use std::ops::Range;

/// The window of document rows currently on screen.
///
/// # Example
///
/// ```
/// use blockdown::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 10, 40);
/// vp.ensure_visible(25);
/// assert_eq!(vp.visible_range(), 16..26);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_rows: usize,
}

impl Viewport {
    /// `height` excludes the status bar.
    pub const fn new(width: u16, height: u16, total_rows: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_rows,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Document rows on screen, clamped to the document.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_rows);
        self.offset.min(end)..end
    }

    /// Document row under screen row `screen_row` of the document area.
    pub fn row_at(&self, screen_row: u16) -> Option<usize> {
        let row = self.offset + screen_row as usize;
        (screen_row < self.height && row < self.total_rows).then_some(row)
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    /// Scroll the least amount that brings `row` on screen.
    pub fn ensure_visible(&mut self, row: usize) {
        let height = (self.height as usize).max(1);
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + height {
            self.offset = row + 1 - height;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the row count after the document was laid out again.
    pub fn set_total_rows(&mut self, total: usize) {
        self.total_rows = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(self.height as usize)
    }
}
