use serde::Serialize;

use corebank_core::schema::require_text;
use corebank_core::{Schema, ValidationResult};

/// Client credentials exchanged for a bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    client_id: String,
    client_secret: String,
}

impl Credential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> ValidationResult<Self> {
        let credential = Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        };
        credential.validate()?;
        Ok(credential)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Body of the `client_credentials` token exchange request.
    pub fn exchange_request(&self) -> TokenExchangeRequest<'_> {
        TokenExchangeRequest {
            grant_type: "client_credentials",
            client_id: &self.client_id,
            client_secret: &self.client_secret,
        }
    }
}

impl Schema for Credential {
    fn validate(&self) -> ValidationResult<()> {
        require_text("client_id", &self.client_id)?;
        require_text("client_secret", &self.client_secret)
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Wire shape of the token exchange request.
#[derive(Debug, Clone, Serialize)]
pub struct TokenExchangeRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// How outgoing requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// A pre-issued bearer token used as-is.
    BearerToken(String),
    /// Credentials exchanged for a bearer token on first use.
    Credential(Credential),
}

impl AuthMode {
    pub fn bearer(token: impl Into<String>) -> ValidationResult<Self> {
        let token = token.into();
        require_text("bearer_token", &token)?;
        Ok(Self::BearerToken(token))
    }

    pub fn requires_exchange(&self) -> bool {
        matches!(self, Self::Credential(_))
    }
}

impl core::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
            Self::Credential(c) => f.debug_tuple("Credential").field(c).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_never_contains_secrets() {
        let credential = Credential::new("app", "s3cr3t").unwrap();
        let rendered = format!("{:?}", AuthMode::Credential(credential));
        assert!(rendered.contains("app"));
        assert!(!rendered.contains("s3cr3t"));

        let bearer = AuthMode::bearer("tok-123").unwrap();
        assert!(!format!("{bearer:?}").contains("tok-123"));
    }

    #[test]
    fn credential_requires_both_parts() {
        assert!(Credential::new("", "secret").is_err());
        assert!(Credential::new("app", " ").is_err());
        assert!(AuthMode::bearer("").is_err());
    }

    #[test]
    fn exchange_request_uses_client_credentials_grant() {
        let credential = Credential::new("app", "secret").unwrap();
        let body = serde_json::to_value(credential.exchange_request()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "grant_type": "client_credentials",
                "client_id": "app",
                "client_secret": "secret",
            })
        );
    }
}
