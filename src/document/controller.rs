use tracing::{debug, warn};

use super::{BLOCK_SEPARATOR, Block, RenderedBlock};
use crate::editor::{BlockEditController, CaretPlacement, DEFAULT_LINE_LENGTH};
use crate::event::{EditKey, KeyOutcome, NavDirection, NavigationIntent};
use crate::persist::{
    Codec, CodecError, DEFAULT_DEBOUNCE_MS, Location, PersistDebouncer, PersistRequest,
};

/// Tunables for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    pub debounce_ms: u64,
    pub line_length: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            line_length: DEFAULT_LINE_LENGTH,
        }
    }
}

/// How the initial document was obtained.
#[derive(Debug)]
pub enum LoadReport {
    /// Nothing stored; started with one empty block.
    Fresh,
    /// Decoded from the stored token.
    Restored { blocks: usize },
    /// The stored token was unreadable; started empty instead.
    Fallback(CodecError),
}

/// The ordered block sequence and its single active block.
///
/// Every public operation leaves at most one block in edit mode, at least one
/// block in the sequence, and `content` equal to the blank-line join of every
/// block's raw text.
#[derive(Debug)]
pub struct DocumentController {
    blocks: Vec<Block>,
    active: Option<usize>,
    content: String,
    debouncer: PersistDebouncer,
    next_seq: u64,
    line_length: usize,
}

impl DocumentController {
    /// A document with one empty block, ready for typing.
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            blocks: vec![Block::Edit(BlockEditController::empty(options.line_length))],
            active: Some(0),
            content: String::new(),
            debouncer: PersistDebouncer::new(options.debounce_ms),
            next_seq: 0,
            line_length: options.line_length,
        }
    }

    /// A document showing `content` split into rendered blocks, none active.
    pub fn from_content(content: &str, options: DocumentOptions) -> Self {
        let blocks = content
            .split(BLOCK_SEPARATOR)
            .map(|raw| Block::Rendered(RenderedBlock::new(raw)))
            .collect();
        Self {
            blocks,
            active: None,
            content: content.to_string(),
            debouncer: PersistDebouncer::new(options.debounce_ms),
            next_seq: 0,
            line_length: options.line_length,
        }
    }

    /// Build the initial document from whatever `location` holds.
    ///
    /// An unreadable token falls back to an empty document; the error is
    /// returned in the report for the host to surface.
    pub fn load(
        location: &impl Location,
        codec: &impl Codec,
        options: DocumentOptions,
    ) -> (Self, LoadReport) {
        let Some(token) = location.load() else {
            debug!("no stored token; starting empty");
            return (Self::new(options), LoadReport::Fresh);
        };
        match codec.decode(&token) {
            Ok(content) => {
                let doc = Self::from_content(&content, options);
                let blocks = doc.len();
                debug!(blocks, "restored document");
                (doc, LoadReport::Restored { blocks })
            }
            Err(err) => {
                warn!(error = %err, "stored token is unreadable; starting empty");
                (Self::new(options), LoadReport::Fallback(err))
            }
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the block in edit mode.
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_editor(&self) -> Option<&BlockEditController> {
        self.active
            .and_then(|idx| self.blocks.get(idx))
            .and_then(Block::as_editor)
    }

    /// Every block's raw text joined with blank lines.
    ///
    /// This is also what export writes.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Put block `index` into edit mode with the caret at its end.
    ///
    /// The previously active block is rendered first. Out-of-range indices and
    /// the already active block are ignored.
    pub fn activate(&mut self, index: usize) {
        if index >= self.blocks.len() || self.active == Some(index) {
            return;
        }
        if let Some(current) = self.active {
            self.render_at(current);
        }
        self.edit_at(index, CaretPlacement::End);
        debug!(index, "activated block");
    }

    /// Route a key to the active block and act on what it reports.
    ///
    /// Keys are ignored while no block is active.
    pub fn handle_key(&mut self, key: EditKey, now_ms: u64) -> KeyOutcome {
        let Some(editor) = self
            .active
            .and_then(|idx| self.blocks.get_mut(idx))
            .and_then(Block::as_editor_mut)
        else {
            return KeyOutcome::none();
        };
        let outcome = editor.handle_key(key);
        if outcome.text_changed.is_some() {
            self.sync_content(now_ms);
        }
        if let Some(intent) = outcome.intent {
            self.apply_intent(intent, now_ms);
        }
        outcome
    }

    /// Move focus, creating or deleting blocks as the intent asks.
    pub fn apply_intent(&mut self, intent: NavigationIntent, now_ms: u64) {
        let Some(current) = self.active else {
            return;
        };
        debug!(?intent, current, "navigation intent");
        let last = self.blocks.len() - 1;
        match (intent.direction, intent.create_next) {
            (NavDirection::Previous, true) => {
                self.blocks.insert(
                    current,
                    Block::Edit(BlockEditController::empty(self.line_length)),
                );
                self.active = Some(current);
                self.dispose(current + 1, intent.delete_current);
            }
            (NavDirection::Next, true) => {
                self.blocks.insert(
                    current + 1,
                    Block::Edit(BlockEditController::empty(self.line_length)),
                );
                self.active = Some(current + 1);
                self.dispose(current, intent.delete_current);
            }
            (NavDirection::Previous, false) if current == 0 => return,
            (NavDirection::Next, false) if current == last => return,
            (NavDirection::Previous, false) => {
                self.edit_at(current - 1, CaretPlacement::End);
                self.dispose(current, intent.delete_current);
            }
            (NavDirection::Next, false) => {
                self.edit_at(current + 1, CaretPlacement::Start);
                self.dispose(current, intent.delete_current);
            }
        }
        self.sync_content(now_ms);
    }

    /// A request to persist, once the quiet period after the last change has passed.
    pub fn poll_persist(&mut self, now_ms: u64) -> Option<PersistRequest> {
        self.debouncer
            .take_ready(now_ms)
            .then(|| self.next_request())
    }

    /// The pending request, immediately, regardless of the quiet period.
    pub fn flush_persist(&mut self) -> Option<PersistRequest> {
        self.debouncer.take_now().then(|| self.next_request())
    }

    pub const fn persist_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Milliseconds until a pending persist is due.
    pub fn persist_due_in(&self, now_ms: u64) -> Option<u64> {
        self.debouncer.remaining_ms(now_ms)
    }

    fn next_request(&mut self) -> PersistRequest {
        self.next_seq += 1;
        debug!(seq = self.next_seq, len = self.content.len(), "persist request");
        PersistRequest {
            seq: self.next_seq,
            content: self.content.clone(),
        }
    }

    fn sync_content(&mut self, now_ms: u64) {
        let content = self
            .blocks
            .iter()
            .map(Block::raw_text)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR);
        if content != self.content {
            self.content = content;
            self.debouncer.queue(now_ms);
        }
    }

    /// Convert block `index` to edit mode and mark it active.
    fn edit_at(&mut self, index: usize, placement: CaretPlacement) {
        let block = std::mem::take(&mut self.blocks[index]);
        self.blocks[index] = block.into_edit(placement, self.line_length);
        self.active = Some(index);
    }

    fn render_at(&mut self, index: usize) {
        let block = std::mem::take(&mut self.blocks[index]);
        self.blocks[index] = block.into_rendered();
        if self.active == Some(index) {
            self.active = None;
        }
    }

    /// Retire a block that just lost focus.
    fn dispose(&mut self, index: usize, delete: bool) {
        if !delete {
            self.render_at(index);
            return;
        }
        self.blocks.remove(index);
        if let Some(active) = self.active
            && active > index
        {
            self.active = Some(active - 1);
        }
        debug!(index, "deleted block");
    }
}

impl Default for DocumentController {
    fn default() -> Self {
        Self::new(DocumentOptions::default())
    }
}
