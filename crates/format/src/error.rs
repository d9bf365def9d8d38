//! Error types for the frame codec and text envelope

use thiserror::Error;

/// A table cannot be described by a [`TableSchema`](crate::schema::TableSchema)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Column element type has no wire mapping
    #[error("unsupported type {data_type} for column '{column}'")]
    UnsupportedColumnType {
        /// Column name
        column: String,
        /// Arrow data type, rendered for diagnostics
        data_type: String,
    },

    /// Two columns share a name
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// Errors raised while encoding a table into a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Column element type has no wire mapping
    #[error("unsupported type {data_type} for column '{column}'")]
    UnsupportedColumnType {
        /// Column name
        column: String,
        /// Arrow data type, rendered for diagnostics
        data_type: String,
    },

    /// Two columns share a name
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// The compression codec failed
    #[error("compression failed ({codec}): {detail}")]
    CompressionFailure {
        /// Codec tag name
        codec: &'static str,
        /// Codec-level error message
        detail: String,
    },

    /// A section exceeds what its length field can describe
    #[error("{what} too large for frame: {size} bytes")]
    TooLarge {
        /// Section or column that overflowed
        what: String,
        /// Size in bytes
        size: usize,
    },

    /// The Arrow IPC stream writer rejected the batch
    #[error("record batch stream write failed: {0}")]
    Stream(String),
}

impl From<SchemaError> for EncodeError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::UnsupportedColumnType { column, data_type } => {
                EncodeError::UnsupportedColumnType { column, data_type }
            }
            SchemaError::DuplicateColumn(name) => EncodeError::DuplicateColumn(name),
        }
    }
}

/// Errors raised while decoding a frame back into a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Frame does not start with the expected magic bytes
    #[error("invalid frame magic: {0:02x?}")]
    BadMagic([u8; 4]),

    /// Frame format version is not understood
    #[error("unsupported frame format version: {0}")]
    UnsupportedVersion(u32),

    /// Codec tag does not name a known compression codec
    #[error("unrecognized codec tag: {0}")]
    UnrecognizedCodecTag(u8),

    /// CRC32 over the frame does not match its trailer
    #[error("frame checksum mismatch: expected {expected:08x}, computed {actual:08x}")]
    ChecksumMismatch {
        /// Checksum stored in the frame
        expected: u32,
        /// Checksum computed over the received bytes
        actual: u32,
    },

    /// Schema bytes are malformed or disagree with the body
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A section ended before its declared length
    #[error("truncated frame: {section} needs {needed} bytes, {available} available")]
    TruncatedFrame {
        /// Section being read
        section: String,
        /// Bytes required
        needed: usize,
        /// Bytes present
        available: usize,
    },

    /// A value could not be parsed under its declared logical type
    #[error("invalid value in column '{column}': {reason}")]
    ValueParseFailure {
        /// Column name, or `*` when the failure is not tied to one column
        column: String,
        /// What was wrong
        reason: String,
    },

    /// The compression codec rejected the body
    #[error("decompression failed ({codec}): {detail}")]
    Decompression {
        /// Codec tag name
        codec: &'static str,
        /// Codec-level error message
        detail: String,
    },

    /// The body is not a well-formed Arrow IPC stream
    #[error("malformed record batch stream: {0}")]
    Stream(String),

    /// Declared body size exceeds the configured decode limit
    #[error("frame declares {declared} body bytes, limit is {limit}")]
    FrameTooLarge {
        /// Declared uncompressed body length
        declared: u64,
        /// Configured maximum
        limit: u64,
    },
}

impl DecodeError {
    /// Create a truncation error for `section`
    pub fn truncated(section: impl Into<String>, needed: usize, available: usize) -> Self {
        DecodeError::TruncatedFrame {
            section: section.into(),
            needed,
            available,
        }
    }

    /// Create a value parse error for `column`
    pub fn value(column: impl Into<String>, reason: impl Into<String>) -> Self {
        DecodeError::ValueParseFailure {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn schema(msg: impl Into<String>) -> Self {
        DecodeError::SchemaMismatch(msg.into())
    }
}

/// Errors raised while unwrapping a text envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Text has no `<tag>:` prefix
    #[error("envelope has no format tag")]
    MissingFormatTag,

    /// Tag does not name a known text encoding
    #[error("unknown envelope format tag '{0}'")]
    UnknownFormatTag(String),

    /// Payload is not valid under the declared encoding
    #[error("malformed {format} payload: {reason}")]
    MalformedPayload {
        /// Format tag of the envelope
        format: &'static str,
        /// Decoder error message
        reason: String,
    },
}

/// Result type for frame encoding
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for frame decoding
pub type DecodeResult<T> = Result<T, DecodeError>;
