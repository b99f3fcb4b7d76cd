//! Error types for the diff presenter.

use std::path::PathBuf;

use crate::encoding::Encoding;

/// Errors raised while decoding or transcoding encoded text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The bytes are not valid in the encoding they are labelled with.
    #[error("invalid byte sequence in {encoding}")]
    InvalidByteSequence { encoding: Encoding },

    /// A character has no representation in the target encoding.
    #[error("{ch:?} from {from} has no representation in {to}")]
    UndefinedConversion {
        ch: char,
        from: Encoding,
        to: Encoding,
    },
}

/// Failures that replace a diff with a diagnostic message.
///
/// The `Display` output of each variant is the exact text handed back to the
/// caller in place of the rendered diff.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The two sides carry different encodings that could not be reconciled.
    #[error(
        "Could not produce a diff because the encoding of the actual string ({actual}) \
         differs from the encoding of the expected string ({expected})"
    )]
    EncodingMismatch {
        actual: Encoding,
        expected: Encoding,
        #[source]
        source: EncodingError,
    },

    /// Both sides share an encoding, but the content could not be decoded.
    #[error("Could not produce a diff because of the encoding of the string ({encoding})")]
    Unencodable {
        encoding: Encoding,
        #[source]
        source: EncodingError,
    },
}

/// Errors from loading a [`PresenterConfig`](crate::PresenterConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid TOML or has wrong field types.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Convenience alias for encoding operations.
pub type EncodingResult<T> = Result<T, EncodingError>;

/// A failed expectation, carrying the full failure message (diff included).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExpectationNotMet {
    pub message: String,
}
