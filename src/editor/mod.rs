//! Editing semantics for a single block.
//!
//! Provides a rope-backed text buffer with caret management and the
//! controller that interprets keys against it. Nothing in here knows about
//! sibling blocks; cross-block movement is only ever requested.

mod buffer;
mod controller;

pub use buffer::{Cursor, Direction, EditBuffer};
pub use controller::BlockEditController;

/// One level of indentation.
pub const INDENT: &str = "  ";

/// Default wrap length used for visual row estimates.
pub const DEFAULT_LINE_LENGTH: usize = 80;

/// Columns reserved from the line length before a line counts as wrapped.
pub const WRAP_SLACK: usize = 3;

/// Where the caret lands when a block enters edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretPlacement {
    Start,
    End,
}
