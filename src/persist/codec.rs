use std::fmt;
use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;

/// Compact, query-safe encoding of a document's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors from encoding or decoding a token.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("compressed stream is corrupt: {0}")]
    Io(#[from] std::io::Error),
    #[error("decoded content is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Converts between document content and tokens.
///
/// Implementations must round-trip exactly: `decode(encode(s)) == s`.
pub trait Codec {
    /// # Errors
    ///
    /// Returns an error if the content cannot be compressed.
    fn encode(&self, text: &str) -> Result<Token, CodecError>;

    /// # Errors
    ///
    /// Returns an error if the token is not one this codec produced.
    fn decode(&self, token: &Token) -> Result<String, CodecError>;
}

/// Gzip followed by URL-safe unpadded base64.
#[derive(Debug, Clone, Copy)]
pub struct GzipBase64Codec {
    level: Compression,
}

impl GzipBase64Codec {
    pub const fn new(level: Compression) -> Self {
        Self { level }
    }
}

impl Default for GzipBase64Codec {
    fn default() -> Self {
        Self::new(Compression::best())
    }
}

impl Codec for GzipBase64Codec {
    fn encode(&self, text: &str) -> Result<Token, CodecError> {
        let mut encoder = GzEncoder::new(Vec::new(), self.level);
        encoder.write_all(text.as_bytes())?;
        let compressed = encoder.finish()?;
        Ok(Token(URL_SAFE_NO_PAD.encode(compressed)))
    }

    fn decode(&self, token: &Token) -> Result<String, CodecError> {
        // Links shared by other tools may carry standard base64 with padding
        let raw = token.as_str().trim().trim_end_matches('=');
        let compressed = URL_SAFE_NO_PAD
            .decode(raw)
            .or_else(|_| STANDARD_NO_PAD.decode(raw))?;
        let mut bytes = Vec::new();
        GzDecoder::new(compressed.as_slice()).read_to_end(&mut bytes)?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip_multiline() {
        let codec = GzipBase64Codec::default();
        let text = "# Title\n\n- one\n  - two\n\n\n```\ncode\n```";
        let token = codec.encode(text).unwrap();
        assert_eq!(codec.decode(&token).unwrap(), text);
    }

    #[test]
    fn test_round_trip_empty() {
        let codec = GzipBase64Codec::default();
        let token = codec.encode("").unwrap();
        assert_eq!(codec.decode(&token).unwrap(), "");
    }

    #[test]
    fn test_token_is_query_safe() {
        let codec = GzipBase64Codec::default();
        let token = codec.encode("??? &&& === +++ ///").unwrap();
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_decode_accepts_standard_padded_base64() {
        let codec = GzipBase64Codec::default();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all("hello, world".as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        let token = Token::new(base64::engine::general_purpose::STANDARD.encode(compressed));
        assert_eq!(codec.decode(&token).unwrap(), "hello, world");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let codec = GzipBase64Codec::default();
        assert!(matches!(
            codec.decode(&Token::new("not*base64")),
            Err(CodecError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_gzip_payload() {
        let codec = GzipBase64Codec::default();
        let token = Token::new(URL_SAFE_NO_PAD.encode(b"plain bytes, no gzip header"));
        assert!(matches!(codec.decode(&token), Err(CodecError::Io(_))));
    }

    proptest! {
        #[test]
        fn prop_round_trip_any_unicode(text in any::<String>()) {
            let codec = GzipBase64Codec::default();
            let token = codec.encode(&text).unwrap();
            prop_assert_eq!(codec.decode(&token).unwrap(), text);
        }

        #[test]
        fn prop_round_trip_blank_line_joins(parts in proptest::collection::vec("[a-z \n]{0,12}", 0..6)) {
            let codec = GzipBase64Codec::default();
            let text = parts.join("\n\n");
            let token = codec.encode(&text).unwrap();
            prop_assert_eq!(codec.decode(&token).unwrap(), text);
        }
    }
}
