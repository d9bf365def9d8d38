//! Binary and text formats for Tabula tables
//!
//! This crate turns a record batch into bytes and bytes into text:
//!
//! - Schema capture: column names, logical types, nullability
//! - Columnar frame: header + schema + compressed Arrow IPC body + CRC32
//! - Compression: none or zstd, tagged in the frame header
//! - Text envelope: `<tag>:<payload>` base64 forms safe for JSON strings
//! - Codec configuration, loadable from TOML
//!
//! Every operation is a pure function of its inputs plus an explicit
//! [`CodecConfig`]. Nothing here is cached or shared between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compression; // Body codecs (none, zstd)
pub mod config; // CodecConfig and its TOML form
pub mod envelope; // Tagged base64 text form
pub mod error; // Schema, encode, decode and envelope errors
pub mod frame; // Frame layout and ColumnarFramer
pub mod schema; // LogicalType, ColumnSpec, TableSchema

// === Re-exports ===
pub use compression::Compression;
pub use config::{CodecConfig, ConfigError, DEFAULT_MAX_DECODED_BYTES, DEFAULT_ZSTD_LEVEL};
pub use envelope::{Envelope, TextEncoding, TAG_SEPARATOR};
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, EnvelopeError, SchemaError};
pub use frame::{
    ColumnarFramer, Frame, FrameHeader, FRAME_FORMAT_VERSION, FRAME_HEADER_SIZE, FRAME_MAGIC,
    FRAME_TRAILER_SIZE,
};
pub use schema::{extract_schema, rebuild_shell, ColumnSpec, LogicalType, Metadata, TableSchema};
