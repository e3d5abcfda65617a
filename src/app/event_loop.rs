use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::effects::Persistence;
use crate::app::{App, Message, Model, ToastLevel, input, update};
use crate::document::{DocumentController, LoadReport};
use crate::persist::{EncodeWorker, GzipBase64Codec, Location, PersistWriter};

const RESIZE_DEBOUNCE_MS: u64 = 100;
const IDLE_POLL_MS: u64 = 250;
const IN_FLIGHT_POLL_MS: u64 = 20;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl App {
    /// Run the editor until the user quits.
    ///
    /// Returns the share link of the last saved content.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized, the event
    /// loop hits an I/O failure, or the final save fails.
    pub fn run(&self) -> Result<Option<String>> {
        let location = self.location();
        let codec = GzipBase64Codec::default();
        let (document, report) =
            DocumentController::load(&location, &codec, self.document_options());
        let initial_link = matches!(report, LoadReport::Restored { .. })
            .then(|| location.load().map(|token| location.share_link(&token)))
            .flatten();
        let worker = EncodeWorker::spawn(codec).context("Failed to start the encode worker")?;
        let mut persistence = Persistence::new(worker, PersistWriter::new(location));

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal, blockdown requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(document, (size.width, size.height));
        model.share_link = initial_link;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model.state_path = Some(self.settings.state_file.clone());
        match report {
            LoadReport::Fresh => {}
            LoadReport::Restored { blocks } => {
                model.show_toast(ToastLevel::Info, format!("Restored {blocks} blocks"));
            }
            LoadReport::Fallback(err) => {
                model.show_toast(
                    ToastLevel::Warning,
                    format!("Saved document unreadable ({err}), starting empty"),
                );
            }
        }

        let result = execute!(stdout(), EnableMouseCapture)
            .context("Failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal, &mut model, &mut persistence));

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        let link = persistence.finish(&mut model);
        result?;
        link
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        persistence: &mut Persistence,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(RESIZE_DEBOUNCE_MS);
        let mut needs_render = true;

        loop {
            let now_ms = elapsed_ms(start);
            model.now_ms = now_ms;

            if model.expire_toast(now_ms) {
                needs_render = true;
            }

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                debug!(width, height, "resize applied");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if let Some(request) = model.document.poll_persist(now_ms) {
                persistence.submit(request, model);
            }
            if persistence.collect(model) {
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else {
                Self::idle_poll_ms(model, persistence, &resize_debouncer, now_ms)
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event_ms = elapsed_ms(start);
                needs_render |=
                    self.dispatch(&event::read()?, model, event_ms, &mut resize_debouncer);

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::ZERO)? {
                    let drain_ms = elapsed_ms(start);
                    needs_render |=
                        self.dispatch(&event::read()?, model, drain_ms, &mut resize_debouncer);
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                info!("quit requested");
                break;
            }
        }
        Ok(())
    }

    /// Map one terminal event through `update`. Returns whether state changed.
    fn dispatch(
        &self,
        event: &Event,
        model: &mut Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> bool {
        model.now_ms = now_ms;
        let Some(msg) = input::handle_event(event, model, now_ms, resize_debouncer) else {
            return false;
        };
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, msg);
        true
    }

    fn idle_poll_ms(
        model: &Model,
        persistence: &Persistence,
        resize_debouncer: &ResizeDebouncer,
        now_ms: u64,
    ) -> u64 {
        let mut poll_ms = model
            .document
            .persist_due_in(now_ms)
            .unwrap_or(IDLE_POLL_MS)
            .min(IDLE_POLL_MS);
        if persistence.in_flight() || resize_debouncer.is_pending() {
            poll_ms = poll_ms.min(IN_FLIGHT_POLL_MS);
        }
        poll_ms
    }
}
