//! Frame header (40 bytes).
//!
//! ```text
//! ┌───────────┬─────────────┬───────────┬──────────────┬────────────────┐
//! │ Magic (4) │ Version (4) │ Codec (1) │ Reserved (3) │ Schema len (4) │
//! ├───────────┴─────────────┴───┬───────┴──────────────┴──┬─────────────┘
//! │ Row count (8)               │ Body len (8)             │
//! ├─────────────────────────────┼──────────────────────────┘
//! │ Raw body len (8)            │
//! └─────────────────────────────┘
//! ```

use crate::error::{DecodeError, DecodeResult};

/// Magic bytes identifying a frame: "TBLF"
pub const FRAME_MAGIC: [u8; 4] = *b"TBLF";

/// Current frame format version
pub const FRAME_FORMAT_VERSION: u32 = 1;

/// Size of the frame header in bytes
pub const FRAME_HEADER_SIZE: usize = 40;

/// Size of the CRC32 trailer in bytes
pub const FRAME_TRAILER_SIZE: usize = 4;

/// Fixed-size frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Magic bytes: "TBLF"
    pub magic: [u8; 4],
    /// Format version for forward compatibility
    pub format_version: u32,
    /// Compression codec tag
    pub codec_tag: u8,
    /// Length of the schema section
    pub schema_len: u32,
    /// Number of rows in the batch
    pub row_count: u64,
    /// Length of the stored (possibly compressed) body
    pub body_len: u64,
    /// Length of the body after decompression
    pub raw_body_len: u64,
}

impl FrameHeader {
    /// Serialize header to bytes.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.format_version.to_le_bytes());
        bytes[8] = self.codec_tag;
        // 9..12 reserved, zero
        bytes[12..16].copy_from_slice(&self.schema_len.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.row_count.to_le_bytes());
        bytes[24..32].copy_from_slice(&self.body_len.to_le_bytes());
        bytes[32..40].copy_from_slice(&self.raw_body_len.to_le_bytes());
        bytes
    }

    /// Deserialize header from bytes.
    ///
    /// Fails with `TruncatedFrame` if fewer than [`FRAME_HEADER_SIZE`] bytes
    /// are given. Magic and version are checked by [`validate`](Self::validate).
    pub fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        let header: &[u8; FRAME_HEADER_SIZE] = bytes
            .get(..FRAME_HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| DecodeError::truncated("frame header", FRAME_HEADER_SIZE, bytes.len()))?;

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        Ok(FrameHeader {
            magic,
            format_version: u32::from_le_bytes(le(&header[4..8])),
            codec_tag: header[8],
            schema_len: u32::from_le_bytes(le(&header[12..16])),
            row_count: u64::from_le_bytes(le(&header[16..24])),
            body_len: u64::from_le_bytes(le(&header[24..32])),
            raw_body_len: u64::from_le_bytes(le(&header[32..40])),
        })
    }

    /// Check magic bytes and format version.
    pub fn validate(&self) -> DecodeResult<()> {
        if self.magic != FRAME_MAGIC {
            return Err(DecodeError::BadMagic(self.magic));
        }
        if self.format_version != FRAME_FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(self.format_version));
        }
        Ok(())
    }
}

fn le<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(bytes);
    buf
}
