//! Dataset name type
//!
//! Datasets have dual identity:
//! - **DatasetId**: unique, immutable UUID v4
//! - **DatasetName**: human-readable label chosen by the producer
//!
//! Names are free-form text. The only rule is length: at most
//! [`MAX_DATASET_NAME_LENGTH`] characters, counted as Unicode scalar values
//! rather than bytes. Empty names are allowed.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a dataset name, in characters
pub const MAX_DATASET_NAME_LENGTH: usize = 128;

/// Human-readable dataset name
///
/// ## Examples
///
/// Valid names:
/// - "ppl_dataset"
/// - "quarterly revenue (EU)"
/// - "" (empty)
///
/// Invalid names:
/// - any string longer than 128 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetName(String);

impl DatasetName {
    /// Create a new DatasetName, validating the input
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NameTooLong` if the name exceeds
    /// [`MAX_DATASET_NAME_LENGTH`] characters.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(DatasetName(name))
    }

    /// Validate a dataset name
    pub fn validate(name: &str) -> Result<(), ValidationError> {
        // Byte length bounds char count from above
        if name.len() <= MAX_DATASET_NAME_LENGTH {
            return Ok(());
        }
        let length = name.chars().count();
        if length > MAX_DATASET_NAME_LENGTH {
            return Err(ValidationError::NameTooLong {
                length,
                max: MAX_DATASET_NAME_LENGTH,
            });
        }
        Ok(())
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DatasetName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DatasetName::new(value)
    }
}

impl TryFrom<&str> for DatasetName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        DatasetName::new(value)
    }
}

impl From<DatasetName> for String {
    fn from(name: DatasetName) -> Self {
        name.0
    }
}

/// Check whether `name` fits within [`MAX_DATASET_NAME_LENGTH`] characters
pub fn validate_name_length(name: &str) -> bool {
    DatasetName::validate(name).is_ok()
}

// ============================================================================
// Tests
// ============================================================================
