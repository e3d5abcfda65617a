//! Turning a block's raw markdown into display output.
//!
//! The document never renders anything itself. A rendered block holds raw
//! text and hands it to whichever [`Render`] implementation the host uses:
//! [`HtmlRenderer`] for `--print html`, the terminal renderer in
//! [`crate::ui`] for the TUI.

use comrak::{Options, markdown_to_html};

/// Markdown to display output.
pub trait Render {
    type Output;

    fn render(&self, markdown: &str) -> Self::Output;
}

/// GFM extensions shared by every renderer.
pub fn markdown_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.superscript = true;
    options.extension.subscript = true;
    options
}

/// Sanitized HTML: raw HTML is omitted and unsafe link schemes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Render for HtmlRenderer {
    type Output = String;

    fn render(&self, markdown: &str) -> String {
        let mut options = markdown_options();
        options.render.unsafe_ = false;
        markdown_to_html(markdown, &options)
    }
}
