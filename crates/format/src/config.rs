//! Codec configuration
//!
//! Encoding choices travel as an explicit value passed to every encode and
//! decode call. There is no process-wide registry.
//!
//! # Example
//!
//! ```toml
//! # Body compression: "zstd" (default) or "none"
//! compression = "zstd"
//! zstd_level = 3
//!
//! # Text-safe encoding for the envelope: "b64" (default) or "b64url"
//! text_encoding = "b64"
//!
//! # Frames declaring a larger uncompressed body are rejected
//! max_decoded_bytes = 1073741824
//! ```

use crate::compression::Compression;
use crate::envelope::TextEncoding;
use serde::{Deserialize, Serialize};

/// Default zstd compression level
pub const DEFAULT_ZSTD_LEVEL: i32 = 3;

/// Default ceiling on a decoded frame body (1 GiB)
pub const DEFAULT_MAX_DECODED_BYTES: u64 = 1024 * 1024 * 1024;

/// Frame and envelope configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Compression applied to frame bodies (default: zstd)
    pub compression: Compression,

    /// zstd level, used only when `compression` is zstd (default: 3)
    pub zstd_level: i32,

    /// Binary-to-text encoding for envelopes (default: b64)
    pub text_encoding: TextEncoding,

    /// Largest uncompressed body a decoder will allocate (default: 1 GiB)
    pub max_decoded_bytes: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            compression: Compression::Zstd,
            zstd_level: DEFAULT_ZSTD_LEVEL,
            text_encoding: TextEncoding::Base64,
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
        }
    }
}

impl CodecConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML and validate it
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: CodecConfig =
            toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set body compression (builder pattern).
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set zstd level (builder pattern).
    pub fn with_zstd_level(mut self, level: i32) -> Self {
        self.zstd_level = level;
        self
    }

    /// Set envelope text encoding (builder pattern).
    pub fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_encoding = encoding;
        self
    }

    /// Set decode size ceiling (builder pattern).
    pub fn with_max_decoded_bytes(mut self, bytes: u64) -> Self {
        self.max_decoded_bytes = bytes;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = zstd::compression_level_range();
        if self.compression == Compression::Zstd && !range.contains(&self.zstd_level) {
            return Err(ConfigError::ZstdLevelOutOfRange {
                level: self.zstd_level,
                min: *range.start(),
                max: *range.end(),
            });
        }
        if self.max_decoded_bytes == 0 {
            return Err(ConfigError::ZeroDecodeLimit);
        }
        Ok(())
    }

    /// Create a configuration for testing (small decode ceiling).
    pub fn for_testing() -> Self {
        CodecConfig {
            max_decoded_bytes: 16 * 1024 * 1024,
            ..Self::default()
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// zstd level outside the library's supported range
    #[error("zstd level {level} outside supported range {min}..={max}")]
    ZstdLevelOutOfRange {
        /// Requested level
        level: i32,
        /// Lowest supported level
        min: i32,
        /// Highest supported level
        max: i32,
    },

    /// A zero decode ceiling would reject every frame
    #[error("max_decoded_bytes must be greater than zero")]
    ZeroDecodeLimit,

    /// TOML could not be parsed into a configuration
    #[error("invalid codec configuration: {0}")]
    Parse(String),
}
