//! Record-level errors
//!
//! Each variant wraps the stage error that caused it, so a caller can tell
//! from the value alone which stage and which field failed.

use tabula_core::ValidationError;
use tabula_format::{ConfigError, DecodeError, EncodeError, EnvelopeError};
use thiserror::Error;

/// Errors raised while turning a record into its textual document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// The codec configuration is invalid
    #[error("codec config: {0}")]
    Config(#[from] ConfigError),

    /// The table could not be framed
    #[error("table encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// The document could not be rendered as JSON
    #[error("document rendering failed: {0}")]
    Document(String),
}

/// Errors raised while rebuilding a record from its textual document
///
/// Decoding never yields a partial record: any of these means nothing was
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    /// The codec configuration is invalid
    #[error("codec config: {0}")]
    Config(#[from] ConfigError),

    /// Text is not a JSON object with string `id`, `name` and `table`
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The `table` field is not a valid envelope
    #[error("table envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    /// The unwrapped bytes are not a valid frame
    #[error("table frame: {0}")]
    Frame(#[from] DecodeError),

    /// Decoded fields fail record validation
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
}

impl DeserializationError {
    /// Stage that failed: "config", "document", "envelope", "frame" or
    /// "validation"
    pub fn stage(&self) -> &'static str {
        match self {
            DeserializationError::Config(_) => "config",
            DeserializationError::MalformedDocument(_) => "document",
            DeserializationError::Envelope(_) => "envelope",
            DeserializationError::Frame(_) => "frame",
            DeserializationError::Validation(_) => "validation",
        }
    }
}
