//! Strongly-typed identifiers used across the SDK.
//!
//! Resource identifiers are opaque strings assigned by the remote service.
//! They are never parsed, only checked for shape so they can be placed in a
//! URL path segment.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Check that a raw identifier can be used as a single path segment.
pub fn validate_resource_id(kind: &str, raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::invalid_id(format!("{kind}: cannot be blank")));
    }
    if raw.contains('/') {
        return Err(ValidationError::invalid_id(format!(
            "{kind}: cannot contain '/'"
        )));
    }
    Ok(())
}

/// Declare an opaque string identifier newtype.
///
/// The generated type is `#[serde(transparent)]`, implements `Display`,
/// `FromStr` (rejecting blank values and `/`) and `AsRef<str>`.
#[macro_export]
macro_rules! resource_id {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl $t {
            /// Wrap a raw identifier, checking it is usable as a path segment.
            pub fn new(raw: impl Into<String>) -> Result<Self, $crate::ValidationError> {
                let raw = raw.into();
                $crate::id::validate_resource_id($name, &raw)?;
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $t {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::str::FromStr for $t {
            type Err = $crate::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl $crate::Schema for $t {
            fn validate(&self) -> $crate::ValidationResult<()> {
                $crate::id::validate_resource_id($name, &self.0)
            }
        }
    };
}

resource_id!(
    /// Identifier of a tenant (logical partition on the remote service).
    TenantId,
    "TenantId"
);

/// Correlation identifier attached to every outgoing request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Create a new trace identifier.
    ///
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for TraceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| ValidationError::invalid_id(format!("TraceId: {e}")))?;
        Ok(Self(uuid))
    }
}
