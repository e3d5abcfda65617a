//! Writing the document content to a timestamped markdown file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

/// Export file name pattern; colons are replaced so the name works everywhere.
pub const EXPORT_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3fZ";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// `<UTC timestamp>.md` for the given instant.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("{}.md", at.format(EXPORT_TIME_FORMAT))
}

/// Write `content` verbatim into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn export_markdown(dir: &Path, content: &str, at: DateTime<Utc>) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(at));
    let wrap = |source| ExportError::Write {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(wrap)?;
    fs::write(&path, content.as_bytes()).map_err(wrap)?;
    info!(path = %path.display(), bytes = content.len(), "exported markdown");
    Ok(path)
}
