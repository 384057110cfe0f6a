//! `corebank-auth`: credentials, access tokens and request signing.
//!
//! This crate is intentionally decoupled from HTTP: the token exchange call
//! itself is performed by the executor in `corebank-infra`, which hands the
//! fetch future to [`TokenCache`].

pub mod cache;
pub mod credential;
pub mod signing;
pub mod token;

pub use cache::TokenCache;
pub use credential::{AuthMode, Credential, TokenExchangeRequest};
pub use signing::{RequestSignature, SigningError, SigningKey};
pub use token::{AccessToken, TokenError, TokenResponse};
