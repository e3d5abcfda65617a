//! Saving the document as a compact token at a location.
//!
//! Content is compressed into a [`Token`] by a [`Codec`], off the UI thread
//! by the [`EncodeWorker`], and stored through a [`Location`]. Requests are
//! numbered so a late result for superseded content never overwrites a newer
//! one.

mod codec;
mod debounce;
mod location;
mod worker;

pub use codec::{Codec, CodecError, GzipBase64Codec, Token};
pub use debounce::PersistDebouncer;
pub use location::{
    DEFAULT_BASE_URL, LinkFileLocation, Location, LocationError, MemoryLocation, token_from_link,
};
pub use worker::EncodeWorker;

use thiserror::Error;
use tracing::{debug, info, warn};

/// Quiet period after the last change before content is persisted.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Content snapshot to encode, numbered in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistRequest {
    pub seq: u64,
    pub content: String,
}

impl PersistRequest {
    /// Encode synchronously.
    pub fn encode(self, codec: &impl Codec) -> PersistResult {
        PersistResult {
            seq: self.seq,
            token: codec.encode(&self.content),
        }
    }
}

/// Outcome of encoding one [`PersistRequest`].
#[derive(Debug)]
pub struct PersistResult {
    pub seq: u64,
    pub token: Result<Token, CodecError>,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("encoding failed: {0}")]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Location(#[from] LocationError),
}

/// What happened to a result handed to [`PersistWriter::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// A newer result was already written.
    Stale,
}

/// Writes encoded results to a location, newest sequence number wins.
#[derive(Debug)]
pub struct PersistWriter<L> {
    location: L,
    last_written: Option<u64>,
}

impl<L: Location> PersistWriter<L> {
    pub const fn new(location: L) -> Self {
        Self {
            location,
            last_written: None,
        }
    }

    /// Store `result` unless something newer is already stored.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding failed or the location rejected the write.
    pub fn write(&mut self, result: PersistResult) -> Result<WriteOutcome, PersistError> {
        if self.last_written.is_some_and(|last| result.seq <= last) {
            debug!(seq = result.seq, last = ?self.last_written, "dropping stale encode result");
            return Ok(WriteOutcome::Stale);
        }
        let token = result.token?;
        self.location.save(&token)?;
        self.last_written = Some(result.seq);
        info!(seq = result.seq, len = token.as_str().len(), "document persisted");
        Ok(WriteOutcome::Written)
    }

    /// Store every result in order, carrying on past failures.
    ///
    /// Returns the last token written.
    ///
    /// # Errors
    ///
    /// Returns the first failure once every result has been tried.
    pub fn write_all(
        &mut self,
        results: impl IntoIterator<Item = PersistResult>,
    ) -> Result<Option<Token>, PersistError> {
        let mut last = None;
        let mut first_err = None;
        for result in results {
            let token = result.token.as_ref().ok().cloned();
            match self.write(result) {
                Ok(WriteOutcome::Written) => last = token,
                Ok(WriteOutcome::Stale) => {}
                Err(err) => {
                    warn!(%err, "write failed, trying remaining results");
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                }
            }
        }
        first_err.map_or(Ok(last), Err)
    }

    #[cfg(test)]
    pub const fn last_written(&self) -> Option<u64> {
        self.last_written
    }

    pub const fn location(&self) -> &L {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(seq: u64, content: &str) -> PersistResult {
        PersistRequest {
            seq,
            content: content.to_string(),
        }
        .encode(&GzipBase64Codec::default())
    }

    #[test]
    fn test_writer_stores_newest() {
        let mut writer = PersistWriter::new(MemoryLocation::new());
        assert_eq!(writer.write(encoded(1, "a")).unwrap(), WriteOutcome::Written);
        assert_eq!(writer.write(encoded(2, "b")).unwrap(), WriteOutcome::Written);
        let codec = GzipBase64Codec::default();
        let stored = writer.location().current().unwrap();
        assert_eq!(codec.decode(stored).unwrap(), "b");
        assert_eq!(writer.last_written(), Some(2));
    }

    #[test]
    fn test_writer_drops_late_result() {
        let mut writer = PersistWriter::new(MemoryLocation::new());
        writer.write(encoded(5, "newer")).unwrap();
        assert_eq!(writer.write(encoded(4, "older")).unwrap(), WriteOutcome::Stale);
        let codec = GzipBase64Codec::default();
        assert_eq!(
            codec.decode(writer.location().current().unwrap()).unwrap(),
            "newer"
        );
        assert_eq!(writer.location().saves(), 1);
    }

    #[test]
    fn test_writer_reports_codec_failure_without_advancing() {
        let mut writer = PersistWriter::new(MemoryLocation::new());
        let failed = PersistResult {
            seq: 1,
            token: Err(CodecError::Io(std::io::Error::other("boom"))),
        };
        assert!(matches!(writer.write(failed), Err(PersistError::Codec(_))));
        assert_eq!(writer.last_written(), None);
    }

    #[test]
    fn test_write_all_keeps_going_after_failure() {
        let mut writer = PersistWriter::new(MemoryLocation::new());
        let failed = PersistResult {
            seq: 2,
            token: Err(CodecError::Io(std::io::Error::other("boom"))),
        };
        let results = vec![encoded(1, "a"), failed, encoded(3, "c")];
        assert!(matches!(writer.write_all(results), Err(PersistError::Codec(_))));
        assert_eq!(writer.last_written(), Some(3));
        assert_eq!(writer.location().saves(), 2);
        let codec = GzipBase64Codec::default();
        assert_eq!(codec.decode(writer.location().current().unwrap()).unwrap(), "c");
    }

    #[test]
    fn test_write_all_returns_last_written_token() {
        let mut writer = PersistWriter::new(MemoryLocation::new());
        let token = writer
            .write_all(vec![encoded(2, "new"), encoded(1, "old")])
            .unwrap()
            .unwrap();
        assert_eq!(GzipBase64Codec::default().decode(&token).unwrap(), "new");
    }
}
