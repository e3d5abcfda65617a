//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`blocks`]: Terminal rendering of a block's markdown
//! - [`layout`]: The block sequence as rows, with the caret baked in
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Colors and modifiers

pub mod blocks;
pub mod layout;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use blocks::TerminalRenderer;
pub use render::{document_content_width, render};
pub use status::status_text;

pub const DOCUMENT_LEFT_PADDING: u16 = 2;

#[cfg(test)]
mod tests;
