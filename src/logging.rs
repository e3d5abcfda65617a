//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so interactive sessions log to a file or
//! nowhere. Non-interactive runs log to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_LEVEL;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

impl LogTarget {
    /// Target for a session that does (`interactive`) or does not own the terminal.
    pub fn for_session(log_file: Option<PathBuf>, interactive: bool) -> Self {
        match (log_file, interactive) {
            (Some(path), _) => Self::File(path),
            (None, true) => Self::Discard,
            (None, false) => Self::Stderr,
        }
    }
}

/// Build the filter: an explicit level wins, then `RUST_LOG`, then the default.
///
/// # Errors
///
/// Returns an error if `level` is not a valid filter directive.
pub fn filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level {level:?}"))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter is invalid, the log file cannot be opened,
/// or a subscriber is already installed.
pub fn init(level: Option<&str>, target: &LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_target(false);
    let installed = match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::Discard => builder.with_writer(io::sink).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|err| anyhow!("Failed to install log subscriber: {err}"))
}
