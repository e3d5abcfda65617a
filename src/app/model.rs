use std::path::PathBuf;

use crate::document::{DocumentController, DocumentOptions};
use crate::ui::document_content_width;
use crate::ui::layout::DocumentLayout;
use crate::ui::viewport::Viewport;

const TOAST_DURATION_MS: u64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at_ms: u64,
}

/// Where the document stands relative to its last persisted token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveState {
    /// Nothing edited since loading.
    #[default]
    Clean,
    /// Edited; a save is scheduled or being encoded.
    Unsaved,
    Saved,
    Failed,
}

/// The complete application state.
///
/// The document and its layout are kept in step: anything that changes the
/// block sequence calls [`Model::relayout`] before the next frame.
#[derive(Debug)]
pub struct Model {
    pub document: DocumentController,
    pub viewport: Viewport,
    pub layout: DocumentLayout,
    pub help_visible: bool,
    pub should_quit: bool,
    /// Link that reopens the last saved content.
    pub share_link: Option<String>,
    pub save_state: SaveState,
    pub config_global_path: Option<PathBuf>,
    pub config_local_path: Option<PathBuf>,
    pub state_path: Option<PathBuf>,
    /// Milliseconds since the session started, refreshed before every update.
    pub now_ms: u64,
    toast: Option<Toast>,
}

impl Model {
    /// Build the model for a terminal of `size` (width, height).
    pub fn new(document: DocumentController, size: (u16, u16)) -> Self {
        let (width, height) = size;
        let layout = DocumentLayout::build(&document, document_content_width(width));
        let viewport = Viewport::new(width, height.saturating_sub(1), layout.line_count());
        let mut model = Self {
            document,
            viewport,
            layout,
            help_visible: false,
            should_quit: false,
            share_link: None,
            save_state: SaveState::Clean,
            config_global_path: None,
            config_local_path: None,
            state_path: None,
            now_ms: 0,
            toast: None,
        };
        model.follow_caret();
        model
    }

    /// Lay the document out again after it changed.
    pub fn relayout(&mut self) {
        self.layout =
            DocumentLayout::build(&self.document, document_content_width(self.viewport.width()));
        self.viewport.set_total_rows(self.layout.line_count());
    }

    /// Scroll so the caret row is on screen.
    pub fn follow_caret(&mut self) {
        if let Some(row) = self.layout.caret_row() {
            self.viewport.ensure_visible(row);
        }
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.viewport.resize(width, height.saturating_sub(1));
        self.relayout();
        self.follow_caret();
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at_ms: self.now_ms + TOAST_DURATION_MS,
        });
    }

    pub(super) fn expire_toast(&mut self, now_ms: u64) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at_ms <= now_ms)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(DocumentController::new(DocumentOptions::default()), (80, 24))
    }
}
