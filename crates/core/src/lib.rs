//! Core types for Tabula
//!
//! This crate defines the identity-bearing parts of a dataset record:
//! - DatasetId: canonical UUID v4 identity
//! - DatasetName: human-readable name, at most 128 characters
//! - ValidationError: construction-time failures
//!
//! The checks here are pure functions over strings. They never touch the
//! table payload; columnar encoding lives in `tabula-format`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset_id;
pub mod dataset_name;
pub mod error;

pub use dataset_id::{validate_identity, DatasetId};
pub use dataset_name::{validate_name_length, DatasetName, MAX_DATASET_NAME_LENGTH};
pub use error::{ValidationError, ValidationResult};
