//! Schema validation error model.

use thiserror::Error;

/// Result type used across the schema layer.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Client-side validation error.
///
/// Raised when a payload fails its schema checks: before any network call for
/// request inputs, or after decoding for response bodies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field is present but its value is not acceptable.
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The payload could not be decoded into the declared shape
    /// (missing field, wrong type, unknown enum value).
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// An identifier was invalid (e.g. blank or containing a path separator).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Name of the offending field, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField(field) => Some(field),
            Self::InvalidField { field, .. } => Some(field),
            Self::Malformed(_) | Self::InvalidId(_) => None,
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}
