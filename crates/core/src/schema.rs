//! Declarative payload schemas.
//!
//! Every request input and response body implements [`Schema`]. Decoding is
//! delegated to `serde` (required fields, field types, enum membership); the
//! trait adds the structural checks serde cannot express (non-blank text,
//! e-mail shape, positive amounts, pagination bounds).
//!
//! Validation is pure: given a payload it returns a typed value or a
//! [`ValidationError`], nothing else.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Shape constraints of a payload beyond what its type already guarantees.
pub trait Schema {
    fn validate(&self) -> ValidationResult<()>;
}

impl Schema for () {
    fn validate(&self) -> ValidationResult<()> {
        Ok(())
    }
}

impl Schema for serde_json::Value {
    fn validate(&self) -> ValidationResult<()> {
        Ok(())
    }
}

impl<T: Schema> Schema for Vec<T> {
    fn validate(&self) -> ValidationResult<()> {
        self.iter().try_for_each(Schema::validate)
    }
}

impl<T: Schema> Schema for Option<T> {
    fn validate(&self) -> ValidationResult<()> {
        self.as_ref().map_or(Ok(()), Schema::validate)
    }
}

/// Output of commands whose response body carries nothing of interest
/// (e.g. a DELETE). Any JSON document decodes into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoContent;

impl<'de> Deserialize<'de> for NoContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(NoContent)
    }
}

impl Schema for NoContent {
    fn validate(&self) -> ValidationResult<()> {
        Ok(())
    }
}

/// Decode a JSON document into `T` and validate it.
pub fn parse<T>(bytes: &[u8]) -> ValidationResult<T>
where
    T: DeserializeOwned + Schema,
{
    let value: T = serde_json::from_slice(bytes)?;
    value.validate()?;
    Ok(value)
}

/// Decode an already-parsed JSON value into `T` and validate it.
pub fn parse_value<T>(value: serde_json::Value) -> ValidationResult<T>
where
    T: DeserializeOwned + Schema,
{
    let typed: T = serde_json::from_value(value)?;
    typed.validate()?;
    Ok(typed)
}

/// Require a non-blank text field.
pub fn require_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

/// Require an optional text field to be non-blank when present.
pub fn optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

/// Loose e-mail shape check: `local@domain` with a dot in the domain.
pub fn optional_email(field: &str, value: Option<&str>) -> ValidationResult<()> {
    let Some(email) = value else {
        return Ok(());
    };
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        });
    if valid {
        Ok(())
    } else {
        Err(ValidationError::invalid(field, "not a valid e-mail address"))
    }
}

/// Require a strictly positive amount.
pub fn require_positive(field: &str, value: u64) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::invalid(field, "must be positive"));
    }
    Ok(())
}

/// Largest page size accepted by list endpoints.
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Offset/limit pagination shared by list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }
}

impl Schema for Pagination {
    fn validate(&self) -> ValidationResult<()> {
        match self.limit {
            Some(0) => Err(ValidationError::invalid("limit", "must be at least 1")),
            Some(limit) if limit > MAX_PAGE_LIMIT => Err(ValidationError::invalid(
                "limit",
                format!("must not exceed {MAX_PAGE_LIMIT}"),
            )),
            _ => Ok(()),
        }
    }
}
