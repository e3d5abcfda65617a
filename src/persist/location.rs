use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::Token;

/// Default prefix for share links.
pub const DEFAULT_BASE_URL: &str = "https://blockdown.invalid/";

/// Errors from writing the current location.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("failed to write state file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the current token lives between sessions.
///
/// `save` replaces the stored state; it never keeps history.
pub trait Location {
    /// The stored token, if any.
    fn load(&self) -> Option<Token>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&mut self, token: &Token) -> Result<(), LocationError>;
}

impl<L: Location + ?Sized> Location for Box<L> {
    fn load(&self) -> Option<Token> {
        (**self).load()
    }

    fn save(&mut self, token: &Token) -> Result<(), LocationError> {
        (**self).save(token)
    }
}

/// In-process location, used by tests and `--print` mode.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    current: Option<Token>,
    saves: usize,
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_token(token: Token) -> Self {
        Self {
            current: Some(token),
            saves: 0,
        }
    }

    pub const fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Number of successful saves.
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl Location for MemoryLocation {
    fn load(&self) -> Option<Token> {
        self.current.clone()
    }

    fn save(&mut self, token: &Token) -> Result<(), LocationError> {
        self.current = Some(token.clone());
        self.saves += 1;
        Ok(())
    }
}

/// A share link (`<base_url>?q=<token>`) kept in a state file.
///
/// A link given explicitly at startup wins over the file until the first save.
#[derive(Debug, Clone)]
pub struct LinkFileLocation {
    path: PathBuf,
    base_url: String,
    initial: Option<Token>,
}

impl LinkFileLocation {
    pub fn new(path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            base_url: base_url.into(),
            initial: None,
        }
    }

    /// Prefer `link` over the state file on load.
    #[must_use]
    pub fn with_initial_link(mut self, link: &str) -> Self {
        self.initial = token_from_link(link);
        if self.initial.is_none() {
            warn!(link, "ignoring link without a q= token");
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full share link for `token`.
    pub fn share_link(&self, token: &Token) -> String {
        format!("{}?q={token}", self.base_url)
    }
}

impl Location for LinkFileLocation {
    fn load(&self) -> Option<Token> {
        if let Some(token) = &self.initial {
            return Some(token.clone());
        }
        match fs::read_to_string(&self.path) {
            Ok(contents) => token_from_link(&contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cannot read state file");
                None
            }
        }
    }

    fn save(&mut self, token: &Token) -> Result<(), LocationError> {
        let wrap = |source| LocationError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        fs::write(&self.path, format!("{}\n", self.share_link(token))).map_err(wrap)?;
        self.initial = None;
        debug!(path = %self.path.display(), len = token.as_str().len(), "state file replaced");
        Ok(())
    }
}

/// Extract the `q` token from a full link, a bare `?q=` query, or a bare token.
pub fn token_from_link(link: &str) -> Option<Token> {
    let link = link.trim();
    let query = match link.split_once('?') {
        Some((_, query)) => query,
        None if link.starts_with("q=") => link,
        None => {
            return (!link.is_empty() && link.chars().all(is_token_char)).then(|| Token::new(link));
        }
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("q="))
        .filter(|token| !token.is_empty())
        .map(Token::new)
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '/' | '=')
}
