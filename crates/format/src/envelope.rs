//! Text-safe envelope for opaque bytes
//!
//! Wraps an arbitrary byte sequence so it can ride inside text-only
//! containers (JSON strings, log lines, message headers). The text form is
//! `<format_tag>:<payload>`; the tag selects the decoder, so new encodings
//! can be added without breaking payloads written with older ones.
//!
//! | Tag      | Alphabet                 | Padding            |
//! |----------|--------------------------|--------------------|
//! | `b64`    | `A-Z a-z 0-9 + /`        | canonical `=`      |
//! | `b64url` | `A-Z a-z 0-9 - _`        | none               |
//!
//! Only byte sequences go through here, never structured objects.

use crate::error::EnvelopeError;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between format tag and payload
pub const TAG_SEPARATOR: char = ':';

/// Binary-to-text transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Standard base64 with padding
    #[default]
    #[serde(rename = "b64")]
    Base64,
    /// URL-safe base64 without padding
    #[serde(rename = "b64url")]
    Base64Url,
}

impl TextEncoding {
    /// Format tag written ahead of the payload
    pub fn tag(self) -> &'static str {
        match self {
            TextEncoding::Base64 => "b64",
            TextEncoding::Base64Url => "b64url",
        }
    }

    /// Look up an encoding by format tag
    pub fn from_tag(tag: &str) -> Result<Self, EnvelopeError> {
        match tag {
            "b64" => Ok(TextEncoding::Base64),
            "b64url" => Ok(TextEncoding::Base64Url),
            other => Err(EnvelopeError::UnknownFormatTag(other.to_string())),
        }
    }

    fn encode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Base64 => STANDARD.encode(bytes),
            TextEncoding::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    fn decode(self, text: &str) -> Result<Vec<u8>, EnvelopeError> {
        let decoded = match self {
            TextEncoding::Base64 => STANDARD.decode(text),
            TextEncoding::Base64Url => URL_SAFE_NO_PAD.decode(text),
        };
        decoded.map_err(|e| EnvelopeError::MalformedPayload {
            format: self.tag(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Text-safe payload paired with the tag of the transform that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    format: TextEncoding,
    payload: String,
}

impl Envelope {
    /// Encode `bytes` as text
    pub fn wrap(bytes: &[u8], format: TextEncoding) -> Self {
        Envelope {
            format,
            payload: format.encode(bytes),
        }
    }

    /// Recover the exact bytes passed to [`wrap`](Self::wrap)
    ///
    /// # Errors
    ///
    /// `MalformedPayload` if the payload has characters outside the
    /// encoding's alphabet or non-canonical padding.
    pub fn unwrap(&self) -> Result<Vec<u8>, EnvelopeError> {
        self.format.decode(&self.payload)
    }

    /// Parse the `<tag>:<payload>` text form
    ///
    /// Only the tag is checked here; payload validity surfaces on
    /// [`unwrap`](Self::unwrap).
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let (tag, payload) = text
            .split_once(TAG_SEPARATOR)
            .ok_or(EnvelopeError::MissingFormatTag)?;
        Ok(Envelope {
            format: TextEncoding::from_tag(tag)?,
            payload: payload.to_string(),
        })
    }

    /// Render as `<tag>:<payload>`
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.format.tag().len() + 1 + self.payload.len());
        out.push_str(self.format.tag());
        out.push(TAG_SEPARATOR);
        out.push_str(&self.payload);
        out
    }

    /// Encoding used for the payload
    pub fn format(&self) -> TextEncoding {
        self.format
    }

    /// Payload text without the tag
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.format.tag(), TAG_SEPARATOR, self.payload)
    }
}

/// Wrap `bytes` and render the tagged text form
pub fn wrap(bytes: &[u8], format: TextEncoding) -> String {
    Envelope::wrap(bytes, format).to_text()
}

/// Parse tagged text and recover the wrapped bytes
pub fn unwrap(text: &str) -> Result<Vec<u8>, EnvelopeError> {
    Envelope::parse(text)?.unwrap()
}
