//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering and persistence

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, SaveState, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::Settings;
use crate::document::DocumentOptions;
use crate::persist::LinkFileLocation;

/// Owns the session configuration and runs the terminal editor.
pub struct App {
    settings: Settings,
    initial_link: Option<String>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    pub const fn new(settings: Settings) -> Self {
        Self {
            settings,
            initial_link: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Open the content of `link` instead of the last saved state.
    #[must_use]
    pub fn with_initial_link(mut self, link: Option<String>) -> Self {
        self.initial_link = link;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    fn location(&self) -> LinkFileLocation {
        let location =
            LinkFileLocation::new(&self.settings.state_file, self.settings.base_url.clone());
        match &self.initial_link {
            Some(link) => location.with_initial_link(link),
            None => location,
        }
    }

    const fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            debounce_ms: self.settings.debounce_ms,
            line_length: self.settings.line_length,
        }
    }
}
