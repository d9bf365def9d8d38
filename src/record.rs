//! DatasetRecord and its textual document
//!
//! A record is the validated triple `(id, name, table)`. Its text form is a
//! JSON object:
//!
//! ```text
//! {"id":"<uuid v4>","name":"<≤128 chars>","table":"<tag>:<payload>"}
//! ```
//!
//! `table` holds the columnar frame wrapped in a text envelope. Consumers
//! must treat it as opaque.

use crate::error::{DeserializationError, SerializationError};
use arrow_array::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tabula_core::{DatasetId, DatasetName, ValidationError, ValidationResult};
use tabula_format::{envelope, CodecConfig, ColumnarFramer};
use tracing::debug;

/// Textual form of a [`DatasetRecord`]
///
/// Field order is the order keys are written. Unknown keys are ignored when
/// reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDocument {
    /// Dataset identity, canonical UUID v4
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Enveloped columnar frame
    pub table: String,
}

/// A named, identity-bearing table
///
/// Construction checks the identity, the name length and column name
/// uniqueness, in that order. A record that exists is always valid.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    id: DatasetId,
    name: DatasetName,
    table: RecordBatch,
}

impl DatasetRecord {
    /// Validate and build a record
    ///
    /// # Errors
    ///
    /// - `InvalidIdentity` if `id` is not a canonical lowercase UUID v4
    /// - `NameTooLong` if `name` has more than 128 characters
    /// - `DuplicateColumn` if two table columns share a name
    pub fn new(id: &str, name: &str, table: RecordBatch) -> ValidationResult<Self> {
        let id = DatasetId::parse(id)?;
        let name = DatasetName::new(name)?;
        Self::from_parts(id, name, table)
    }

    /// Build a record from already-validated identity and name
    pub fn from_parts(
        id: DatasetId,
        name: DatasetName,
        table: RecordBatch,
    ) -> ValidationResult<Self> {
        check_unique_columns(&table)?;
        Ok(DatasetRecord { id, name, table })
    }

    /// Dataset identity
    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Dataset name
    pub fn name(&self) -> &DatasetName {
        &self.name
    }

    /// Table payload
    pub fn table(&self) -> &RecordBatch {
        &self.table
    }

    /// Split into `(id, name, table)`
    pub fn into_parts(self) -> (DatasetId, DatasetName, RecordBatch) {
        (self.id, self.name, self.table)
    }

    /// Encode into a document with the default configuration
    pub fn to_document(&self) -> Result<DatasetDocument, SerializationError> {
        self.to_document_with(&CodecConfig::default())
    }

    /// Encode into a document
    ///
    /// The table is framed with `config.compression` and wrapped with
    /// `config.text_encoding`. The record is left untouched on failure.
    pub fn to_document_with(
        &self,
        config: &CodecConfig,
    ) -> Result<DatasetDocument, SerializationError> {
        let framer = ColumnarFramer::new(config.clone())?;
        let frame = framer.encode_to_bytes(&self.table)?;
        let table = envelope::wrap(&frame, config.text_encoding);

        debug!(
            id = %self.id,
            rows = self.table.num_rows(),
            columns = self.table.num_columns(),
            frame_bytes = frame.len(),
            text_bytes = table.len(),
            "Record encoded"
        );

        Ok(DatasetDocument {
            id: self.id.to_string(),
            name: self.name.as_str().to_string(),
            table,
        })
    }

    /// Rebuild a record from a document with the default configuration
    pub fn from_document(doc: &DatasetDocument) -> Result<Self, DeserializationError> {
        Self::from_document_with(doc, &CodecConfig::default())
    }

    /// Rebuild a record from a document
    ///
    /// The config is checked first, then identity and name, then the table
    /// is decoded. The envelope tag, not `config.text_encoding`, selects the
    /// text decoder; `config.max_decoded_bytes` bounds the frame body.
    pub fn from_document_with(
        doc: &DatasetDocument,
        config: &CodecConfig,
    ) -> Result<Self, DeserializationError> {
        let framer = ColumnarFramer::new(config.clone())?;
        let id = DatasetId::parse(&doc.id)?;
        let name = DatasetName::new(doc.name.as_str())?;

        let frame = envelope::unwrap(&doc.table)?;
        let table = framer.decode_from_bytes(&frame)?;
        let record = Self::from_parts(id, name, table)?;

        debug!(
            id = %record.id,
            rows = record.table.num_rows(),
            columns = record.table.num_columns(),
            frame_bytes = frame.len(),
            "Record decoded"
        );
        Ok(record)
    }

    /// Render as compact JSON with the default configuration
    pub fn to_text(&self) -> Result<String, SerializationError> {
        self.to_text_with(&CodecConfig::default())
    }

    /// Render as compact JSON
    pub fn to_text_with(&self, config: &CodecConfig) -> Result<String, SerializationError> {
        let doc = self.to_document_with(config)?;
        serde_json::to_string(&doc).map_err(|e| SerializationError::Document(e.to_string()))
    }

    /// Parse JSON text with the default configuration
    pub fn from_text(text: &str) -> Result<Self, DeserializationError> {
        Self::from_text_with(text, &CodecConfig::default())
    }

    /// Parse JSON text
    pub fn from_text_with(text: &str, config: &CodecConfig) -> Result<Self, DeserializationError> {
        let doc: DatasetDocument = serde_json::from_str(text)
            .map_err(|e| DeserializationError::MalformedDocument(e.to_string()))?;
        Self::from_document_with(&doc, config)
    }
}

fn check_unique_columns(table: &RecordBatch) -> ValidationResult<()> {
    let schema = table.schema();
    let mut seen = HashSet::with_capacity(schema.fields().len());
    for field in schema.fields() {
        if !seen.insert(field.name().as_str()) {
            return Err(ValidationError::DuplicateColumn {
                name: field.name().clone(),
            });
        }
    }
    Ok(())
}
