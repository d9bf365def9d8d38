//! Dataset identity
//!
//! A dataset is identified by a random (version 4) UUID. Only the canonical
//! textual form is accepted: 36 characters, lowercase hex, hyphenated
//! `8-4-4-4-12`. Braced, URN, simple (no hyphens) and uppercase spellings
//! are rejected so that one dataset never has two valid ids.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a dataset
///
/// Wraps a UUID v4. Displaying a `DatasetId` always yields the exact string
/// it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// Create a new random DatasetId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a DatasetId, accepting only the canonical UUID v4 form
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIdentity` carrying the input.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::parse_canonical(s).ok_or_else(|| ValidationError::InvalidIdentity {
            value: s.to_string(),
        })
    }

    fn parse_canonical(s: &str) -> Option<Self> {
        let uuid = Uuid::try_parse(s).ok()?;
        if uuid.get_version_num() != 4 {
            return None;
        }
        // try_parse also accepts simple, braced and urn spellings as well as
        // uppercase hex; only the lowercase hyphenated rendering round-trips.
        let mut buf = Uuid::encode_buffer();
        if &*uuid.hyphenated().encode_lower(&mut buf) != s {
            return None;
        }
        Some(Self(uuid))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Get the raw bytes of this DatasetId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DatasetId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DatasetId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DatasetId> for String {
    fn from(id: DatasetId) -> Self {
        id.to_string()
    }
}

/// Check whether `s` is a canonical UUID v4 string
pub fn validate_identity(s: &str) -> bool {
    DatasetId::parse_canonical(s).is_some()
}
