use crate::editor::{BlockEditController, CaretPlacement};
use crate::render::Render;

/// The display form of a block: raw text only, rendered on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBlock {
    raw: String,
}

impl RenderedBlock {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn render<R: Render>(&self, renderer: &R) -> R::Output {
        renderer.render(&self.raw)
    }

    /// Switch to edit mode, consuming the rendered form.
    pub fn into_edit(self, placement: CaretPlacement, line_length: usize) -> BlockEditController {
        BlockEditController::new(&self.raw, placement, line_length)
    }
}

impl From<BlockEditController> for RenderedBlock {
    fn from(editor: BlockEditController) -> Self {
        Self::new(editor.into_text())
    }
}

/// One paragraph-sized piece of the document, in exactly one mode.
#[derive(Debug)]
pub enum Block {
    Edit(BlockEditController),
    Rendered(RenderedBlock),
}

impl Block {
    /// The block's raw markdown.
    pub fn raw_text(&self) -> String {
        match self {
            Self::Edit(editor) => editor.text(),
            Self::Rendered(rendered) => rendered.raw().to_string(),
        }
    }

    /// Render the block's current raw text, whatever its mode.
    pub fn render<R: Render>(&self, renderer: &R) -> R::Output {
        match self {
            Self::Edit(editor) => renderer.render(&editor.text()),
            Self::Rendered(rendered) => rendered.render(renderer),
        }
    }

    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    pub const fn as_editor(&self) -> Option<&BlockEditController> {
        match self {
            Self::Edit(editor) => Some(editor),
            Self::Rendered(_) => None,
        }
    }

    pub const fn as_editor_mut(&mut self) -> Option<&mut BlockEditController> {
        match self {
            Self::Edit(editor) => Some(editor),
            Self::Rendered(_) => None,
        }
    }

    /// Consume into the rendered form. Rendering itself is deferred.
    #[must_use]
    pub fn into_rendered(self) -> Self {
        match self {
            Self::Edit(editor) => Self::Rendered(editor.into()),
            rendered @ Self::Rendered(_) => rendered,
        }
    }

    /// Consume into the edit form.
    #[must_use]
    pub fn into_edit(self, placement: CaretPlacement, line_length: usize) -> Self {
        match self {
            Self::Rendered(rendered) => Self::Edit(rendered.into_edit(placement, line_length)),
            editing @ Self::Edit(_) => editing,
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::Rendered(RenderedBlock::default())
    }
}
