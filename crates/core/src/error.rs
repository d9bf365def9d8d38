//! Validation errors for dataset records
//!
//! Raised only at construction time. Encode and decode stages have their
//! own error types in `tabula-format`.

use thiserror::Error;

/// Result type alias for record validation
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// A dataset record failed one of its construction checks
///
/// Each variant names the check that failed and carries the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The id is not the canonical form of a UUID v4
    #[error("invalid dataset id '{value}': expected a canonical lowercase UUID v4")]
    InvalidIdentity {
        /// The rejected id string
        value: String,
    },

    /// The name exceeds the maximum length
    #[error("dataset name too long: {length} chars (max {max})")]
    NameTooLong {
        /// Length of the rejected name in characters
        length: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Two table columns share a name
    #[error("duplicate column name '{name}' in dataset table")]
    DuplicateColumn {
        /// The repeated column name
        name: String,
    },
}

impl ValidationError {
    /// Short, stable name of the check that failed
    pub fn check(&self) -> &'static str {
        match self {
            ValidationError::InvalidIdentity { .. } => "identity",
            ValidationError::NameTooLong { .. } => "name_length",
            ValidationError::DuplicateColumn { .. } => "unique_columns",
        }
    }
}
