//! Frame body compression
//!
//! The codec tag is stored in the frame header so the decoder never has
//! to guess. Every call allocates its own zstd context and output buffer;
//! nothing is pooled or shared between threads.

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compression applied to a frame body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Body stored as-is
    None,
    /// Zstandard
    #[default]
    Zstd,
}

impl Compression {
    /// One-byte tag written to the frame header
    pub fn tag(self) -> u8 {
        match self {
            Compression::None => 0,
            Compression::Zstd => 1,
        }
    }

    /// Look up a codec by header tag
    pub fn from_tag(tag: u8) -> DecodeResult<Self> {
        match tag {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Zstd),
            other => Err(DecodeError::UnrecognizedCodecTag(other)),
        }
    }

    /// Lowercase codec name
    pub fn name(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Zstd => "zstd",
        }
    }

    /// Parse a codec name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Compression::None),
            "zstd" => Some(Compression::Zstd),
            _ => None,
        }
    }

    /// Compress `raw` with this codec
    ///
    /// `level` is only consulted by zstd.
    pub fn compress(self, raw: &[u8], level: i32) -> EncodeResult<Vec<u8>> {
        match self {
            Compression::None => Ok(raw.to_vec()),
            Compression::Zstd => {
                zstd::bulk::compress(raw, level).map_err(|e| EncodeError::CompressionFailure {
                    codec: self.name(),
                    detail: e.to_string(),
                })
            }
        }
    }

    /// Reverse [`compress`](Self::compress)
    ///
    /// `raw_len` is the uncompressed length recorded in the frame; output of
    /// any other length is reported as corruption.
    pub fn decompress(self, stored: &[u8], raw_len: usize) -> DecodeResult<Vec<u8>> {
        let raw = match self {
            Compression::None => stored.to_vec(),
            Compression::Zstd => {
                zstd::bulk::decompress(stored, raw_len).map_err(|e| DecodeError::Decompression {
                    codec: self.name(),
                    detail: e.to_string(),
                })?
            }
        };
        if raw.len() != raw_len {
            return Err(DecodeError::truncated(
                format!("{} body", self.name()),
                raw_len,
                raw.len(),
            ));
        }
        Ok(raw)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
