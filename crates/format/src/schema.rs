//! Table schema capture and wire form
//!
//! A [`TableSchema`] is the ordered list of `(name, logical type, nullable)`
//! triples describing a record batch, plus the key/value metadata attached
//! to the schema and to each field. Logical types form a closed set; each
//! has a stable one-byte wire tag and an exhaustive mapping to an Arrow
//! `DataType`. Arrow types outside the set are rejected rather than coerced.
//!
//! # Wire Layout
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┬───────────────────┐
//! │ Column count (4) │ Column 1 .. Column N     │ Schema metadata   │
//! └──────────────────┴──────────────────────────┴───────────────────┘
//!
//! Column:
//! ┌──────────────┬─────────────┬──────────────┬──────────────┬──────────┐
//! │ Name len (4) │ Name (UTF-8)│ Type tag (1) │ Nullable (1) │ Metadata │
//! └──────────────┴─────────────┴──────────────┴──────────────┴──────────┘
//!
//! Metadata:
//! ┌────────────────┬──────────────────────────────────────────────────┐
//! │ Pair count (4) │ (Key len (4), Key, Value len (4), Value) × count │
//! └────────────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Metadata pairs are written in key order,
//! so a given table always produces the same bytes.

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult, SchemaError};
use arrow_array::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

/// Sorted key/value metadata
pub type Metadata = BTreeMap<String, String>;

/// Smallest encoded column: empty name, tag, nullable flag, no metadata
const MIN_COLUMN_BYTES: usize = 4 + 1 + 1 + 4;

/// Smallest encoded metadata pair: empty key and value
const MIN_PAIR_BYTES: usize = 4 + 4;

/// Logical column type
///
/// Tag values are part of the wire format and MUST NOT change:
/// - Boolean = 0x01
/// - Int32 = 0x02
/// - Int64 = 0x03
/// - UInt64 = 0x04
/// - Float32 = 0x05
/// - Float64 = 0x06
/// - Utf8 = 0x07
/// - Binary = 0x08
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    /// Boolean values, bit-packed
    Boolean,
    /// 32-bit signed integers
    Int32,
    /// 64-bit signed integers
    Int64,
    /// 64-bit unsigned integers
    UInt64,
    /// 32-bit IEEE-754 floats
    Float32,
    /// 64-bit IEEE-754 floats
    Float64,
    /// UTF-8 strings
    Utf8,
    /// Arbitrary byte strings
    Binary,
}

impl LogicalType {
    /// Every logical type, in tag order
    pub const ALL: [LogicalType; 8] = [
        LogicalType::Boolean,
        LogicalType::Int32,
        LogicalType::Int64,
        LogicalType::UInt64,
        LogicalType::Float32,
        LogicalType::Float64,
        LogicalType::Utf8,
        LogicalType::Binary,
    ];

    /// One-byte wire tag
    pub fn wire_tag(self) -> u8 {
        match self {
            LogicalType::Boolean => 0x01,
            LogicalType::Int32 => 0x02,
            LogicalType::Int64 => 0x03,
            LogicalType::UInt64 => 0x04,
            LogicalType::Float32 => 0x05,
            LogicalType::Float64 => 0x06,
            LogicalType::Utf8 => 0x07,
            LogicalType::Binary => 0x08,
        }
    }

    /// Look up a type by wire tag
    pub fn from_wire_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(LogicalType::Boolean),
            0x02 => Some(LogicalType::Int32),
            0x03 => Some(LogicalType::Int64),
            0x04 => Some(LogicalType::UInt64),
            0x05 => Some(LogicalType::Float32),
            0x06 => Some(LogicalType::Float64),
            0x07 => Some(LogicalType::Utf8),
            0x08 => Some(LogicalType::Binary),
            _ => None,
        }
    }

    /// Map an Arrow type into the closed set
    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Boolean => Some(LogicalType::Boolean),
            DataType::Int32 => Some(LogicalType::Int32),
            DataType::Int64 => Some(LogicalType::Int64),
            DataType::UInt64 => Some(LogicalType::UInt64),
            DataType::Float32 => Some(LogicalType::Float32),
            DataType::Float64 => Some(LogicalType::Float64),
            DataType::Utf8 => Some(LogicalType::Utf8),
            DataType::Binary => Some(LogicalType::Binary),
            _ => None,
        }
    }

    /// The Arrow type this logical type decodes to
    pub fn to_arrow(self) -> DataType {
        match self {
            LogicalType::Boolean => DataType::Boolean,
            LogicalType::Int32 => DataType::Int32,
            LogicalType::Int64 => DataType::Int64,
            LogicalType::UInt64 => DataType::UInt64,
            LogicalType::Float32 => DataType::Float32,
            LogicalType::Float64 => DataType::Float64,
            LogicalType::Utf8 => DataType::Utf8,
            LogicalType::Binary => DataType::Binary,
        }
    }

    /// Lowercase type name
    pub fn name(self) -> &'static str {
        match self {
            LogicalType::Boolean => "boolean",
            LogicalType::Int32 => "int32",
            LogicalType::Int64 => "int64",
            LogicalType::UInt64 => "uint64",
            LogicalType::Float32 => "float32",
            LogicalType::Float64 => "float64",
            LogicalType::Utf8 => "utf8",
            LogicalType::Binary => "binary",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One column of a [`TableSchema`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name, unique within the schema
    pub name: String,
    /// Element type
    pub logical_type: LogicalType,
    /// Whether the column may contain nulls
    pub nullable: bool,
    /// Field-level metadata
    pub metadata: Metadata,
}

impl ColumnSpec {
    /// Create a column spec without metadata
    pub fn new(name: impl Into<String>, logical_type: LogicalType, nullable: bool) -> Self {
        ColumnSpec {
            name: name.into(),
            logical_type,
            nullable,
            metadata: Metadata::new(),
        }
    }

    /// Attach field metadata (builder pattern).
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn to_field(&self) -> Field {
        Field::new(self.name.as_str(), self.logical_type.to_arrow(), self.nullable)
            .with_metadata(to_hash_map(&self.metadata))
    }
}

/// Ordered column list describing a table's shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<ColumnSpec>,
    metadata: Metadata,
}

impl TableSchema {
    /// Create a schema, rejecting duplicate column names
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(TableSchema {
            columns,
            metadata: Metadata::new(),
        })
    }

    /// Attach schema-level metadata (builder pattern).
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Columns in table order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Schema-level metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Build the equivalent Arrow schema, metadata included
    pub fn to_arrow(&self) -> SchemaRef {
        let fields: Vec<Field> = self.columns.iter().map(ColumnSpec::to_field).collect();
        Arc::new(Schema::new(fields).with_metadata(to_hash_map(&self.metadata)))
    }

    /// Serialize to the schema wire form
    pub fn to_bytes(&self) -> EncodeResult<Vec<u8>> {
        let mut out = Vec::with_capacity(8 + self.columns.len() * 20);
        put_len(&mut out, self.columns.len(), || "column count".to_string())?;
        for column in &self.columns {
            put_str(&mut out, &column.name, || format!("name of column '{}'", column.name))?;
            out.push(column.logical_type.wire_tag());
            out.push(u8::from(column.nullable));
            put_metadata(&mut out, &column.metadata, &column.name)?;
        }
        put_metadata(&mut out, &self.metadata, "schema")?;
        Ok(out)
    }

    /// Parse the schema wire form
    ///
    /// The input must be consumed exactly; trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        let mut cursor = Cursor::new(bytes);

        let count = read_u32(&mut cursor, "schema column count")? as usize;
        let available = remaining(&cursor);
        if count.saturating_mul(MIN_COLUMN_BYTES) > available {
            return Err(DecodeError::truncated(
                "schema columns",
                count.saturating_mul(MIN_COLUMN_BYTES),
                available,
            ));
        }

        let mut columns = Vec::with_capacity(count);
        for index in 0..count {
            let name = read_str(&mut cursor, "schema column name")
                .map_err(|e| with_index(e, index))?;

            let tag = read_u8(&mut cursor, "schema type tag")?;
            let logical_type = LogicalType::from_wire_tag(tag).ok_or_else(|| {
                DecodeError::schema(format!("column '{}' has unknown type tag {}", name, tag))
            })?;

            let nullable = match read_u8(&mut cursor, "schema nullable flag")? {
                0 => false,
                1 => true,
                other => {
                    return Err(DecodeError::schema(format!(
                        "column '{}' has invalid nullable flag {}",
                        name, other
                    )))
                }
            };

            let metadata = read_metadata(&mut cursor, &name)?;
            columns.push(ColumnSpec {
                name,
                logical_type,
                nullable,
                metadata,
            });
        }
        let metadata = read_metadata(&mut cursor, "schema")?;

        let trailing = remaining(&cursor);
        if trailing != 0 {
            return Err(DecodeError::schema(format!(
                "{} trailing bytes after {} columns",
                trailing, count
            )));
        }

        Ok(TableSchema::new(columns)
            .map_err(|e| DecodeError::schema(e.to_string()))?
            .with_metadata(metadata))
    }
}

/// Read the schema of a record batch
///
/// Deterministic: the same batch always yields the same schema, in column
/// order, with metadata sorted by key.
///
/// # Errors
///
/// `UnsupportedColumnType` for any column outside the logical type set,
/// `DuplicateColumn` if two columns share a name.
pub fn extract_schema(batch: &RecordBatch) -> Result<TableSchema, SchemaError> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let logical_type = LogicalType::from_arrow(field.data_type()).ok_or_else(|| {
            SchemaError::UnsupportedColumnType {
                column: field.name().clone(),
                data_type: field.data_type().to_string(),
            }
        })?;
        columns.push(
            ColumnSpec::new(field.name().as_str(), logical_type, field.is_nullable())
                .with_metadata(to_sorted(field.metadata())),
        );
    }
    Ok(TableSchema::new(columns)?.with_metadata(to_sorted(schema.metadata())))
}

/// Build an empty batch with the columns, types and metadata of `schema`
///
/// Allocates no rows. The decoder checks the stream it reads against the
/// shell's Arrow schema.
pub fn rebuild_shell(schema: &TableSchema) -> RecordBatch {
    RecordBatch::new_empty(schema.to_arrow())
}

fn to_sorted(map: &HashMap<String, String>) -> Metadata {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn to_hash_map(map: &Metadata) -> HashMap<String, String> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn put_len(out: &mut Vec<u8>, len: usize, what: impl FnOnce() -> String) -> EncodeResult<()> {
    let len32 = u32::try_from(len).map_err(|_| EncodeError::TooLarge {
        what: what(),
        size: len,
    })?;
    out.extend_from_slice(&len32.to_le_bytes());
    Ok(())
}

fn put_str(out: &mut Vec<u8>, s: &str, what: impl FnOnce() -> String) -> EncodeResult<()> {
    put_len(out, s.len(), what)?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

fn put_metadata(out: &mut Vec<u8>, metadata: &Metadata, owner: &str) -> EncodeResult<()> {
    put_len(out, metadata.len(), || format!("metadata of '{}'", owner))?;
    for (key, value) in metadata {
        put_str(out, key, || format!("metadata key of '{}'", owner))?;
        put_str(out, value, || format!("metadata value '{}' of '{}'", key, owner))?;
    }
    Ok(())
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor
        .get_ref()
        .len()
        .saturating_sub(cursor.position() as usize)
}

fn with_index(err: DecodeError, index: usize) -> DecodeError {
    match err {
        DecodeError::SchemaMismatch(msg) => {
            DecodeError::schema(format!("column {}: {}", index, msg))
        }
        other => other,
    }
}

fn read_u32(cursor: &mut Cursor<&[u8]>, section: &str) -> DecodeResult<u32> {
    let available = remaining(cursor);
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| DecodeError::truncated(section, 4, available))
}

fn read_u8(cursor: &mut Cursor<&[u8]>, section: &str) -> DecodeResult<u8> {
    let available = remaining(cursor);
    cursor
        .read_u8()
        .map_err(|_| DecodeError::truncated(section, 1, available))
}

fn read_str(cursor: &mut Cursor<&[u8]>, section: &str) -> DecodeResult<String> {
    let len = read_u32(cursor, section)? as usize;
    let available = remaining(cursor);
    if len > available {
        return Err(DecodeError::truncated(section, len, available));
    }
    let start = cursor.position() as usize;
    let bytes = *cursor.get_ref();
    let s = std::str::from_utf8(&bytes[start..start + len])
        .map_err(|e| DecodeError::schema(format!("{} is not UTF-8: {}", section, e)))?
        .to_string();
    cursor.set_position((start + len) as u64);
    Ok(s)
}

fn read_metadata(cursor: &mut Cursor<&[u8]>, owner: &str) -> DecodeResult<Metadata> {
    let count = read_u32(cursor, "metadata pair count")? as usize;
    let available = remaining(cursor);
    if count.saturating_mul(MIN_PAIR_BYTES) > available {
        return Err(DecodeError::truncated(
            "metadata pairs",
            count.saturating_mul(MIN_PAIR_BYTES),
            available,
        ));
    }
    let mut metadata = Metadata::new();
    for _ in 0..count {
        let key = read_str(cursor, "metadata key")?;
        let value = read_str(cursor, "metadata value")?;
        if metadata.insert(key.clone(), value).is_some() {
            return Err(DecodeError::schema(format!(
                "duplicate metadata key '{}' on '{}'",
                key, owner
            )));
        }
    }
    Ok(metadata)
}
