// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. persist::PersistWriter)
    clippy::module_name_repetitions
)]

//! # Blockdown
//!
//! A block-structured markdown editor for the terminal.
//!
//! A document is a sequence of paragraph-sized blocks. Exactly one block at
//! a time shows its raw markdown for editing; every other block is shown
//! rendered. Moving past the edge of a block moves to its neighbor, and
//! pressing Enter or Backspace at an edge creates or removes blocks.
//!
//! The content is saved after a quiet period as a compressed, URL-safe
//! token, so a single link reopens the document.
//!
//! ## Architecture
//!
//! The terminal host uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`editor`]: Single-block editing
//! - [`document`]: The block sequence and its active block
//! - [`persist`]: Codec, storage locations, and the encode worker
//! - [`render`]: Markdown to HTML
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod event;
pub mod export;
pub mod logging;
pub mod persist;
pub mod render;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Block, DocumentController, DocumentOptions};
    pub use crate::editor::BlockEditController;
    pub use crate::event::{EditKey, KeyOutcome, NavDirection, NavigationIntent};
    pub use crate::persist::{Codec, GzipBase64Codec, Location, Token};
    pub use crate::ui::viewport::Viewport;
}
