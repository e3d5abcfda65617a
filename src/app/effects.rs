use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, warn};

use crate::app::model::SaveState;
use crate::app::{App, Message, Model, ToastLevel};
use crate::export::export_markdown;
use crate::persist::{
    EncodeWorker, LinkFileLocation, PersistRequest, PersistResult, PersistWriter, WriteOutcome,
};

impl App {
    pub(super) fn handle_message_side_effects(&self, model: &mut Model, msg: Message) {
        if msg == Message::Export {
            match export_markdown(&self.settings.export_dir, model.document.content(), Utc::now()) {
                Ok(path) => {
                    model.show_toast(ToastLevel::Info, format!("Exported {}", path.display()));
                }
                Err(err) => {
                    warn!(%err, "export failed");
                    model.show_toast(ToastLevel::Error, format!("Export failed: {err}"));
                }
            }
        }
    }
}

/// Hands debounced saves to the encode worker and writes what comes back.
pub(super) struct Persistence {
    worker: EncodeWorker,
    writer: PersistWriter<LinkFileLocation>,
    in_flight: usize,
}

impl Persistence {
    pub(super) const fn new(worker: EncodeWorker, writer: PersistWriter<LinkFileLocation>) -> Self {
        Self {
            worker,
            writer,
            in_flight: 0,
        }
    }

    pub(super) const fn in_flight(&self) -> bool {
        self.in_flight > 0
    }

    pub(super) fn submit(&mut self, request: PersistRequest, model: &mut Model) {
        let seq = request.seq;
        if self.worker.submit(request) {
            debug!(seq, "save submitted");
            self.in_flight += 1;
        } else {
            warn!(seq, "encode worker is gone, save dropped");
            model.save_state = SaveState::Failed;
            model.show_toast(ToastLevel::Error, "Saving stopped working");
        }
    }

    /// Write every finished result. Returns whether anything arrived.
    pub(super) fn collect(&mut self, model: &mut Model) -> bool {
        let mut any = false;
        while let Some(result) = self.worker.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply(result, model);
            any = true;
        }
        any
    }

    fn apply(&mut self, result: PersistResult, model: &mut Model) {
        let token = result.token.as_ref().ok().cloned();
        match self.writer.write(result) {
            Ok(WriteOutcome::Written) => {
                if let Some(token) = token {
                    model.share_link = Some(self.writer.location().share_link(&token));
                }
                if !self.in_flight() && !model.document.persist_pending() {
                    model.save_state = SaveState::Saved;
                }
            }
            Ok(WriteOutcome::Stale) => {}
            Err(err) => {
                warn!(%err, "save failed");
                model.save_state = SaveState::Failed;
                model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
            }
        }
    }

    /// Save any pending edit, wait for the worker, and write the results.
    ///
    /// Returns the share link of the last content written, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the final save could not be encoded or written.
    pub(super) fn finish(mut self, model: &mut Model) -> Result<Option<String>> {
        if let Some(request) = model.document.flush_persist() {
            self.submit(request, model);
        }
        let Self {
            worker, mut writer, ..
        } = self;
        let written = writer
            .write_all(worker.finish())
            .context("Failed to save the document on exit")?;
        Ok(written
            .map(|token| writer.location().share_link(&token))
            .or_else(|| model.share_link.clone()))
    }
}
