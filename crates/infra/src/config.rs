//! Client configuration.
//!
//! A [`ClientConfig`] is built once (from code or from the environment) and
//! never mutated afterwards. Secrets only appear redacted in `Debug` output.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use corebank_auth::{AuthMode, Credential, SigningError, SigningKey};
use corebank_core::{TenantId, ValidationError};

pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";
pub const DEFAULT_TOKEN_PATH: &str = "/oauth/token";

pub const ENV_BASE_URL: &str = "COREBANK_BASE_URL";
pub const ENV_TENANT_ID: &str = "COREBANK_TENANT_ID";
pub const ENV_BEARER_TOKEN: &str = "COREBANK_BEARER_TOKEN";
pub const ENV_CLIENT_ID: &str = "COREBANK_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "COREBANK_CLIENT_SECRET";
pub const ENV_SECRET: &str = "COREBANK_SECRET";
pub const ENV_SIGNEE: &str = "COREBANK_SIGNEE";
pub const ENV_GRAPHQL_PATH: &str = "COREBANK_GRAPHQL_PATH";
pub const ENV_TOKEN_PATH: &str = "COREBANK_TOKEN_PATH";
pub const ENV_TIMEOUT_MS: &str = "COREBANK_TIMEOUT_MS";
pub const ENV_KEEP_ALIVE: &str = "COREBANK_KEEP_ALIVE";
pub const ENV_TRACE_ID: &str = "COREBANK_TRACE_ID";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid configuration value {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("invalid credentials: {0}")]
    Auth(#[from] ValidationError),

    #[error("invalid signing key: {0}")]
    Signing(#[from] SigningError),
}

/// Tuning knobs handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Whole-request timeout; `None` leaves the transport default.
    pub timeout: Option<Duration>,
    /// Static headers sent with every request.
    pub headers: BTreeMap<String, String>,
    pub keep_alive: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            headers: BTreeMap::new(),
            keep_alive: true,
        }
    }
}

/// Connection parameters of one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    tenant_id: Option<TenantId>,
    auth: AuthMode,
    signing: Option<SigningKey>,
    graphql_path: String,
    token_path: String,
    transport: TransportOptions,
    trace_id: Option<String>,
}

impl ClientConfig {
    pub fn builder(base_url: impl Into<String>, auth: AuthMode) -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_url: base_url.into(),
            auth,
            tenant_id: None,
            signing: None,
            graphql_path: DEFAULT_GRAPHQL_PATH.to_string(),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            transport: TransportOptions::default(),
            trace_id: None,
        }
    }

    /// Load configuration from `COREBANK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = var(ENV_BASE_URL).ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let auth = match (var(ENV_BEARER_TOKEN), var(ENV_CLIENT_ID), var(ENV_CLIENT_SECRET)) {
            (Some(token), _, _) => AuthMode::bearer(token)?,
            (None, Some(id), Some(secret)) => AuthMode::Credential(Credential::new(id, secret)?),
            (None, Some(_), None) => return Err(ConfigError::Missing(ENV_CLIENT_SECRET)),
            (None, None, _) => return Err(ConfigError::Missing(ENV_BEARER_TOKEN)),
        };

        let mut builder = Self::builder(base_url, auth);
        if let Some(tenant) = var(ENV_TENANT_ID) {
            builder = builder.tenant_id(TenantId::new(tenant)?);
        }
        match (var(ENV_SIGNEE), var(ENV_SECRET)) {
            (Some(signee), Some(secret)) => builder = builder.signing(SigningKey::new(signee, secret)?),
            (None, None) => {}
            (Some(_), None) => return Err(ConfigError::Missing(ENV_SECRET)),
            (None, Some(_)) => return Err(ConfigError::Missing(ENV_SIGNEE)),
        }
        if let Some(path) = var(ENV_GRAPHQL_PATH) {
            builder = builder.graphql_path(path);
        }
        if let Some(path) = var(ENV_TOKEN_PATH) {
            builder = builder.token_path(path);
        }
        if let Some(raw) = var(ENV_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                name: ENV_TIMEOUT_MS,
                reason: format!("{e}"),
            })?;
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if let Some(raw) = var(ENV_KEEP_ALIVE) {
            builder = builder.keep_alive(parse_bool(ENV_KEEP_ALIVE, &raw)?);
        }
        if let Some(trace_id) = var(ENV_TRACE_ID) {
            builder = builder.trace_id(trace_id);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref()
    }

    pub fn auth(&self) -> &AuthMode {
        &self.auth
    }

    pub fn signing(&self) -> Option<&SigningKey> {
        self.signing.as_ref()
    }

    pub fn graphql_path(&self) -> &str {
        &self.graphql_path
    }

    pub fn token_path(&self) -> &str {
        &self.token_path
    }

    pub fn transport(&self) -> &TransportOptions {
        &self.transport
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Resolve path segments against the base URL.
    ///
    /// Each segment is percent-encoded; a path prefix on the base URL
    /// (e.g. `https://host/api/v2`) is kept.
    pub fn url_for<'a, I>(&self, segments: I) -> Result<Url, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ConfigError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: "cannot be a base".to_string(),
                })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// URL of a configured endpoint path such as the GraphQL or token path.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
        self.url_for(path.split('/').filter(|s| !s.is_empty()))
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("'{other}' is not a boolean"),
        }),
    }
}

fn validate_path(name: &'static str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("'{path}' must start with '/'"),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    auth: AuthMode,
    tenant_id: Option<TenantId>,
    signing: Option<SigningKey>,
    graphql_path: String,
    token_path: String,
    transport: TransportOptions,
    trace_id: Option<String>,
}

impl ClientConfigBuilder {
    pub fn tenant_id(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn signing(mut self, key: SigningKey) -> Self {
        self.signing = Some(key);
        self
    }

    pub fn graphql_path(mut self, path: impl Into<String>) -> Self {
        self.graphql_path = path.into();
        self
    }

    pub fn token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.transport.headers.insert(name.into(), value.into());
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.transport.keep_alive = keep_alive;
        self
    }

    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url,
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url,
                reason: "must not carry a query or fragment".to_string(),
            });
        }
        validate_path("graphql_path", &self.graphql_path)?;
        validate_path("token_path", &self.token_path)?;

        Ok(ClientConfig {
            base_url,
            tenant_id: self.tenant_id,
            auth: self.auth,
            signing: self.signing,
            graphql_path: self.graphql_path,
            token_path: self.token_path,
            transport: self.transport,
            trace_id: self.trace_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn loads_credential_config_from_environment() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://bank.example/api"),
            (ENV_CLIENT_ID, "app"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_TENANT_ID, "acme"),
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_KEEP_ALIVE, "false"),
            (ENV_SIGNEE, "gateway"),
            (ENV_SECRET, "hmac"),
        ]))
        .unwrap();

        assert!(config.auth().requires_exchange());
        assert_eq!(config.tenant_id().map(TenantId::as_str), Some("acme"));
        assert_eq!(config.transport().timeout, Some(Duration::from_millis(2500)));
        assert!(!config.transport().keep_alive);
        assert_eq!(config.signing().map(SigningKey::signee), Some("gateway"));
        assert_eq!(config.graphql_path(), DEFAULT_GRAPHQL_PATH);
    }

    #[test]
    fn bearer_token_takes_precedence_over_credentials() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://bank.example"),
            (ENV_BEARER_TOKEN, "tok"),
            (ENV_CLIENT_ID, "app"),
        ]))
        .unwrap();
        assert!(!config.auth().requires_exchange());
    }

    #[test]
    fn reports_missing_and_invalid_values() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_BASE_URL));

        let err = ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "https://b.example")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_BEARER_TOKEN));

        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://b.example"),
            (ENV_CLIENT_ID, "app"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_CLIENT_SECRET));

        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://b.example"),
            (ENV_BEARER_TOKEN, "tok"),
            (ENV_SIGNEE, "gateway"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_SECRET));

        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://b.example"),
            (ENV_BEARER_TOKEN, "tok"),
            (ENV_TIMEOUT_MS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: ENV_TIMEOUT_MS, .. }));
    }

    #[test]
    fn rejects_non_http_base_urls_and_relative_paths() {
        let auth = AuthMode::bearer("tok").unwrap();
        assert!(ClientConfig::builder("ftp://bank.example", auth.clone()).build().is_err());
        assert!(ClientConfig::builder("not a url", auth.clone()).build().is_err());
        assert!(ClientConfig::builder("https://bank.example?x=1", auth.clone()).build().is_err());
        assert!(
            ClientConfig::builder("https://bank.example", auth)
                .graphql_path("graphql")
                .build()
                .is_err()
        );
    }

    #[test]
    fn url_for_keeps_base_prefix_and_encodes_segments() {
        let auth = AuthMode::bearer("tok").unwrap();
        let config = ClientConfig::builder("https://bank.example/api/v2/", auth)
            .build()
            .unwrap();

        let url = config.url_for(["clients", "a b"]).unwrap();
        assert_eq!(url.as_str(), "https://bank.example/api/v2/clients/a%20b");

        let gql = config.endpoint_url(config.graphql_path()).unwrap();
        assert_eq!(gql.as_str(), "https://bank.example/api/v2/graphql");
    }

    #[test]
    fn url_for_on_bare_host() {
        let auth = AuthMode::bearer("tok").unwrap();
        let config = ClientConfig::builder("http://localhost:8080", auth).build().unwrap();
        assert_eq!(
            config.endpoint_url("/oauth/token").unwrap().as_str(),
            "http://localhost:8080/oauth/token"
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = ClientConfig::builder("https://bank.example", AuthMode::bearer("tok-secret").unwrap())
            .signing(SigningKey::new("gw", "hmac-secret").unwrap())
            .build()
            .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("tok-secret"));
        assert!(!rendered.contains("hmac-secret"));
    }
}
