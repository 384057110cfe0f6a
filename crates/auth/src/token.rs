use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens this close to expiry are treated as expired and refreshed.
pub const REFRESH_SKEW_SECS: i64 = 30;

/// A bearer token obtained from the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the token can still be sent at `now`.
    ///
    /// Tokens without an expiry stay fresh until invalidated.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(REFRESH_SKEW_SECS) < expires_at,
            None => true,
        }
    }
}

impl core::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Wire shape of the token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token response has an empty access_token")]
    EmptyToken,

    #[error("unsupported token type '{0}' (expected Bearer)")]
    UnsupportedType(String),

    #[error("token response has an out-of-range expires_in ({0})")]
    InvalidLifetime(i64),
}

impl TokenResponse {
    /// Validate the response and turn it into an [`AccessToken`] issued at `issued_at`.
    pub fn into_access_token(self, issued_at: DateTime<Utc>) -> Result<AccessToken, TokenError> {
        if self.access_token.trim().is_empty() {
            return Err(TokenError::EmptyToken);
        }
        if let Some(kind) = &self.token_type {
            if !kind.eq_ignore_ascii_case("bearer") {
                return Err(TokenError::UnsupportedType(kind.clone()));
            }
        }
        let expires_at = match self.expires_in {
            Some(secs) if secs <= 0 => return Err(TokenError::InvalidLifetime(secs)),
            Some(secs) => {
                let expires_at = Duration::try_seconds(secs).and_then(|ttl| issued_at.checked_add_signed(ttl));
                Some(expires_at.ok_or(TokenError::InvalidLifetime(secs))?)
            }
            None => None,
        };
        Ok(AccessToken::new(self.access_token, expires_at))
    }
}
