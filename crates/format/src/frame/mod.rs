//! Columnar frame codec
//!
//! A frame is the self-describing binary form of one record batch. It holds
//! the schema, the batch as an Arrow IPC stream, and the tag of the
//! compression codec applied to that stream.
//!
//! # Frame Layout
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ Frame Header (40 bytes)            │
//! ├────────────────────────────────────┤
//! │ Schema (schema_len bytes)          │
//! ├────────────────────────────────────┤
//! │ Body (body_len bytes, compressed)  │
//! │   Arrow IPC stream, one batch      │
//! ├────────────────────────────────────┤
//! │ CRC32 (4 bytes)                    │
//! └────────────────────────────────────┘
//! ```
//!
//! The schema is stored uncompressed so the decoder can validate the shape
//! of a frame before paying for decompression, and so the codec can change
//! without touching the schema format. `raw_body_len` is the length of the
//! IPC stream before compression and is checked against the decode limit
//! before any buffer is allocated.

mod header;

pub use header::{
    FrameHeader, FRAME_FORMAT_VERSION, FRAME_HEADER_SIZE, FRAME_MAGIC, FRAME_TRAILER_SIZE,
};

use crate::compression::Compression;
use crate::config::{CodecConfig, ConfigError};
use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::schema::{extract_schema, rebuild_shell, TableSchema};
use arrow_array::RecordBatch;
use arrow_ipc::reader::StreamReader;
use arrow_ipc::writer::StreamWriter;
use arrow_schema::ArrowError;
use tracing::{debug, trace, warn};

/// Self-describing binary unit holding one record batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    codec: Compression,
    row_count: u64,
    schema_bytes: Vec<u8>,
    body: Vec<u8>,
    raw_body_len: u64,
}

impl Frame {
    /// Assemble a frame from its parts
    ///
    /// No validation happens here; [`ColumnarFramer::decode`] checks
    /// everything.
    pub fn from_parts(
        codec: Compression,
        row_count: u64,
        schema_bytes: Vec<u8>,
        body: Vec<u8>,
        raw_body_len: u64,
    ) -> Self {
        Frame {
            codec,
            row_count,
            schema_bytes,
            body,
            raw_body_len,
        }
    }

    /// Split into `(codec, row_count, schema_bytes, body, raw_body_len)`
    pub fn into_parts(self) -> (Compression, u64, Vec<u8>, Vec<u8>, u64) {
        (
            self.codec,
            self.row_count,
            self.schema_bytes,
            self.body,
            self.raw_body_len,
        )
    }

    /// Compression codec applied to the body
    pub fn codec(&self) -> Compression {
        self.codec
    }

    /// Number of rows
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Serialized schema
    pub fn schema_bytes(&self) -> &[u8] {
        &self.schema_bytes
    }

    /// Stored body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body length after decompression
    pub fn raw_body_len(&self) -> u64 {
        self.raw_body_len
    }

    /// Serialize to the wire layout, CRC32 trailer included
    pub fn to_bytes(&self) -> EncodeResult<Vec<u8>> {
        let schema_len = u32::try_from(self.schema_bytes.len()).map_err(|_| EncodeError::TooLarge {
            what: "schema".to_string(),
            size: self.schema_bytes.len(),
        })?;
        let header = FrameHeader {
            magic: FRAME_MAGIC,
            format_version: FRAME_FORMAT_VERSION,
            codec_tag: self.codec.tag(),
            schema_len,
            row_count: self.row_count,
            body_len: self.body.len() as u64,
            raw_body_len: self.raw_body_len,
        };

        let mut out = Vec::with_capacity(
            FRAME_HEADER_SIZE + self.schema_bytes.len() + self.body.len() + FRAME_TRAILER_SIZE,
        );
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&self.schema_bytes);
        out.extend_from_slice(&self.body);

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&out);
        out.extend_from_slice(&hasher.finalize().to_le_bytes());
        Ok(out)
    }

    /// Parse the wire layout
    ///
    /// Checks magic, version, codec tag, declared lengths and the CRC32
    /// trailer. Schema and body contents are checked on decode.
    pub fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        let header = FrameHeader::from_bytes(bytes)?;
        header.validate()?;
        let codec = Compression::from_tag(header.codec_tag)?;

        let expected = (FRAME_HEADER_SIZE as u64)
            .checked_add(header.schema_len as u64)
            .and_then(|n| n.checked_add(header.body_len))
            .and_then(|n| n.checked_add(FRAME_TRAILER_SIZE as u64))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| DecodeError::truncated("frame", usize::MAX, bytes.len()))?;
        if bytes.len() < expected {
            return Err(DecodeError::truncated("frame", expected, bytes.len()));
        }
        if bytes.len() > expected {
            return Err(DecodeError::schema(format!(
                "{} trailing bytes after frame",
                bytes.len() - expected
            )));
        }

        let crc_offset = expected - FRAME_TRAILER_SIZE;
        let mut stored = [0u8; FRAME_TRAILER_SIZE];
        stored.copy_from_slice(&bytes[crc_offset..]);
        let stored = u32::from_le_bytes(stored);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&bytes[..crc_offset]);
        let computed = hasher.finalize();
        if stored != computed {
            warn!(
                expected = stored,
                actual = computed,
                frame_len = bytes.len(),
                "Frame checksum mismatch"
            );
            return Err(DecodeError::ChecksumMismatch {
                expected: stored,
                actual: computed,
            });
        }

        let schema_end = FRAME_HEADER_SIZE + header.schema_len as usize;
        Ok(Frame {
            codec,
            row_count: header.row_count,
            schema_bytes: bytes[FRAME_HEADER_SIZE..schema_end].to_vec(),
            body: bytes[schema_end..crc_offset].to_vec(),
            raw_body_len: header.raw_body_len,
        })
    }
}

/// Encodes record batches to frames and back
///
/// Holds only an immutable [`CodecConfig`]; a single framer can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct ColumnarFramer {
    config: CodecConfig,
}

impl ColumnarFramer {
    /// Create a framer with the given configuration
    ///
    /// # Errors
    ///
    /// Whatever [`CodecConfig::validate`] reports.
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(ColumnarFramer { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `batch` using the configured compression
    pub fn encode(&self, batch: &RecordBatch) -> EncodeResult<Frame> {
        self.encode_with(batch, self.config.compression)
    }

    /// Encode `batch` with an explicit compression choice
    ///
    /// # Errors
    ///
    /// `UnsupportedColumnType` / `DuplicateColumn` from schema capture,
    /// `Stream` from the IPC writer, `CompressionFailure` from the codec,
    /// `TooLarge` if a section overflows its length field.
    pub fn encode_with(&self, batch: &RecordBatch, compression: Compression) -> EncodeResult<Frame> {
        let schema = extract_schema(batch)?;
        let schema_bytes = schema.to_bytes()?;
        let raw = write_stream(batch)?;
        let body = compression.compress(&raw, self.config.zstd_level)?;

        debug!(
            rows = batch.num_rows(),
            columns = schema.len(),
            codec = %compression,
            schema_bytes = schema_bytes.len(),
            raw_bytes = raw.len(),
            stored_bytes = body.len(),
            "Frame encoded"
        );

        Ok(Frame {
            codec: compression,
            row_count: batch.num_rows() as u64,
            schema_bytes,
            body,
            raw_body_len: raw.len() as u64,
        })
    }

    /// Decode a frame back into a record batch
    ///
    /// The schema is parsed and the table shell rebuilt before the body is
    /// decompressed. A frame either decodes fully or fails; no partial
    /// batch is ever returned.
    pub fn decode(&self, frame: &Frame) -> DecodeResult<RecordBatch> {
        let schema = TableSchema::from_bytes(&frame.schema_bytes)?;
        let shell = rebuild_shell(&schema);

        let rows = usize::try_from(frame.row_count).map_err(|_| {
            DecodeError::schema(format!("row count {} exceeds address space", frame.row_count))
        })?;
        if frame.raw_body_len > self.config.max_decoded_bytes {
            return Err(DecodeError::FrameTooLarge {
                declared: frame.raw_body_len,
                limit: self.config.max_decoded_bytes,
            });
        }
        let raw_len = usize::try_from(frame.raw_body_len).map_err(|_| DecodeError::FrameTooLarge {
            declared: frame.raw_body_len,
            limit: self.config.max_decoded_bytes,
        })?;

        let raw = frame.codec.decompress(&frame.body, raw_len)?;
        let batch = read_stream(&raw, &shell, rows)?;

        debug!(
            rows,
            columns = schema.len(),
            codec = %frame.codec,
            raw_bytes = raw_len,
            stored_bytes = frame.body.len(),
            "Frame decoded"
        );
        Ok(batch)
    }

    /// Encode `batch` straight to wire bytes
    pub fn encode_to_bytes(&self, batch: &RecordBatch) -> EncodeResult<Vec<u8>> {
        self.encode(batch)?.to_bytes()
    }

    /// Decode wire bytes straight to a record batch
    pub fn decode_from_bytes(&self, bytes: &[u8]) -> DecodeResult<RecordBatch> {
        self.decode(&Frame::from_bytes(bytes)?)
    }
}

fn write_stream(batch: &RecordBatch) -> EncodeResult<Vec<u8>> {
    let stream_err = |e: ArrowError| EncodeError::Stream(e.to_string());
    let mut writer =
        StreamWriter::try_new(Vec::new(), batch.schema().as_ref()).map_err(stream_err)?;
    writer.write(batch).map_err(stream_err)?;
    writer.finish().map_err(stream_err)?;
    writer.into_inner().map_err(stream_err)
}

/// Read the single batch of an IPC stream and check it against the shell
fn read_stream(raw: &[u8], shell: &RecordBatch, rows: usize) -> DecodeResult<RecordBatch> {
    let reader = StreamReader::try_new(raw, None).map_err(|e| DecodeError::Stream(e.to_string()))?;
    if reader.schema() != shell.schema() {
        return Err(DecodeError::schema(
            "stream schema disagrees with frame schema",
        ));
    }

    let mut batches = reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(batch_error)?;
    trace!(batches = batches.len(), "Stream read");
    let batch = match batches.len() {
        1 => batches.remove(0),
        0 if rows == 0 => RecordBatch::new_empty(shell.schema()),
        n => {
            return Err(DecodeError::schema(format!(
                "expected one record batch, stream holds {}",
                n
            )))
        }
    };

    if batch.num_rows() != rows {
        return Err(DecodeError::schema(format!(
            "header declares {} rows, stream holds {}",
            rows,
            batch.num_rows()
        )));
    }
    Ok(batch)
}

fn batch_error(e: ArrowError) -> DecodeError {
    match e {
        ArrowError::InvalidArgumentError(reason) | ArrowError::ParseError(reason) => {
            DecodeError::value("*", reason)
        }
        other => DecodeError::Stream(other.to_string()),
    }
}

/// Encode `batch` with default settings and the given compression
pub fn encode(batch: &RecordBatch, compression: Compression) -> EncodeResult<Frame> {
    ColumnarFramer::default().encode_with(batch, compression)
}

/// Decode `frame` with default settings
pub fn decode(frame: &Frame) -> DecodeResult<RecordBatch> {
    ColumnarFramer::default().decode(frame)
}
