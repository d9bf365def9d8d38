//! Tabula - validated datasets in portable text envelopes
//!
//! A [`DatasetRecord`] pairs a UUID v4 identity and a short name with an
//! Arrow [`RecordBatch`]. Its text form is a JSON object whose `table` field
//! carries the batch as a compressed, schema-tagged binary frame wrapped in
//! a base64 envelope.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
//! use tabula::DatasetRecord;
//!
//! let names: ArrayRef = Arc::new(StringArray::from(vec!["Tom", "nick"]));
//! let ages: ArrayRef = Arc::new(Int64Array::from(vec![20, 21]));
//! let table = RecordBatch::try_from_iter(vec![("Name", names), ("Age", ages)]).unwrap();
//!
//! let record = DatasetRecord::new("8fba0c5b-4792-4bc1-a8d6-3eea6cc5d086", "ppl_dataset", table).unwrap();
//! let text = record.to_text().unwrap();
//! assert_eq!(DatasetRecord::from_text(&text).unwrap(), record);
//! ```
//!
//! # Architecture
//!
//! - `tabula-core`: identity and name validation
//! - `tabula-format`: schema capture, columnar frame, compression, envelope
//! - this crate: the record and its JSON document
//!
//! Encoding choices travel in an explicit [`CodecConfig`]; the `_with`
//! variants of every record operation take one.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;

pub use error::{DeserializationError, SerializationError};
pub use record::{DatasetDocument, DatasetRecord};

pub use arrow_array::RecordBatch;
pub use tabula_core::{
    validate_identity, validate_name_length, DatasetId, DatasetName, ValidationError,
    MAX_DATASET_NAME_LENGTH,
};
pub use tabula_format::{
    CodecConfig, ColumnarFramer, Compression, ConfigError, DecodeError, EncodeError, Envelope,
    EnvelopeError, Frame, TextEncoding,
};
