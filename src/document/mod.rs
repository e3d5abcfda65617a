//! The block-structured document.
//!
//! This module handles:
//! - The closed set of block modes and conversions between them
//! - Keeping exactly one block editable and routing keys to it
//! - Creating and deleting blocks on navigation
//! - Deriving the document content and scheduling its persistence

mod block;
mod controller;

pub use block::{Block, RenderedBlock};
pub use controller::{DocumentController, DocumentOptions, LoadReport};

/// Separator between blocks in the document content.
pub const BLOCK_SEPARATOR: &str = "\n\n";
