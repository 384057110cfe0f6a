//! HMAC request signing.
//!
//! When a signing key is configured every outgoing request carries the signee
//! name, a unix timestamp and `hex(HMAC-SHA256(secret, canonical))` where the
//! canonical string is `"{METHOD}\n{path}\n{timestamp}\n{body}"`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNEE_HEADER: &str = "x-signee";
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
pub const SIGNATURE_HEADER: &str = "x-signature";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("signing key requires a non-empty {0}")]
    Empty(&'static str),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Secret + signee pair used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    signee: String,
    secret: String,
}

/// Signature material for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    pub signee: String,
    pub timestamp: i64,
    pub signature: String,
}

impl RequestSignature {
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            (SIGNEE_HEADER, self.signee.clone()),
            (TIMESTAMP_HEADER, self.timestamp.to_string()),
            (SIGNATURE_HEADER, self.signature.clone()),
        ]
    }
}

impl SigningKey {
    pub fn new(signee: impl Into<String>, secret: impl Into<String>) -> Result<Self, SigningError> {
        let signee = signee.into();
        let secret = secret.into();
        if signee.trim().is_empty() {
            return Err(SigningError::Empty("signee"));
        }
        if secret.is_empty() {
            return Err(SigningError::Empty("secret"));
        }
        Ok(Self { signee, secret })
    }

    pub fn signee(&self) -> &str {
        &self.signee
    }

    pub fn sign(
        &self,
        method: &str,
        path: &str,
        timestamp: i64,
        body: &[u8],
    ) -> Result<RequestSignature, SigningError> {
        let mac = self.mac(method, path, timestamp, body)?;
        Ok(RequestSignature {
            signee: self.signee.clone(),
            timestamp,
            signature: hex::encode(mac.finalize().into_bytes()),
        })
    }

    /// Constant-time check of a hex signature against the canonical request.
    pub fn verify(&self, method: &str, path: &str, timestamp: i64, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        match self.mac(method, path, timestamp, body) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }

    fn mac(&self, method: &str, path: &str, timestamp: i64, body: &[u8]) -> Result<HmacSha256, SigningError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
        mac.update(method.as_bytes());
        mac.update(b"\n");
        mac.update(path.as_bytes());
        mac.update(b"\n");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b"\n");
        mac.update(body);
        Ok(mac)
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("signee", &self.signee)
            .field("secret", &"<redacted>")
            .finish()
    }
}
