//! Command execution.
//!
//! ## Execution flow
//!
//! ```text
//! Command
//!   ↓
//! 1. Build CommandContext (trace id, tenant)
//!   ↓
//! 2. Resolve access token (static, cached, or exchanged)
//!   ↓
//! 3. before hooks
//!   ↓
//! 4. Build request (URL, headers, body, signature)
//!   ↓
//! 5. Transport send, map failures into ApiError
//!   ↓
//! 6. Decode + validate the response body
//!   ↓
//! 7. after hooks  (on any failure in 2-7: on_error hooks)
//! ```
//!
//! The executor owns the token cache. Clones share it, so one executor (or
//! its clones) performs at most one token exchange at a time.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::Instrument;

use corebank_auth::{AccessToken, AuthMode, Credential, TokenCache, TokenResponse};
use corebank_core::{HttpMethod, Protocol, Schema, TraceId, ValidationError, schema::parse_value};

use crate::command::{Body, Command};
use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, CommandError};
use crate::graphql::GraphqlResponse;
use crate::middleware::{CommandContext, Middleware, Pipeline};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

const JSON: &str = "application/json";
pub const TENANT_HEADER: &str = "x-tenant-id";
pub const TRACE_HEADER: &str = "x-trace-id";

struct Inner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    pipeline: Pipeline,
    tokens: TokenCache,
}

/// Runs commands against one configured service.
#[derive(Clone)]
pub struct CommandExecutor {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("config", &self.inner.config)
            .field("pipeline", &self.inner.pipeline)
            .finish_non_exhaustive()
    }
}

pub struct CommandExecutorBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    pipeline: Pipeline,
}

impl CommandExecutorBuilder {
    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Use a transport the caller keeps a handle to (e.g. to inspect recorded calls).
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Append a middleware; hooks run in registration order.
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.pipeline.push(Arc::new(middleware));
        self
    }

    pub fn shared_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.pipeline.push(middleware);
        self
    }

    /// Finish the executor, defaulting to a [`ReqwestTransport`] built from
    /// the configured transport options. No request is sent.
    pub fn build(self) -> Result<CommandExecutor, TransportError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config.transport())?),
        };
        Ok(CommandExecutor {
            inner: Arc::new(Inner {
                config: self.config,
                transport,
                pipeline: self.pipeline,
                tokens: TokenCache::new(),
            }),
        })
    }
}

impl CommandExecutor {
    pub fn builder(config: ClientConfig) -> CommandExecutorBuilder {
        CommandExecutorBuilder {
            config,
            transport: None,
            pipeline: Pipeline::new(),
        }
    }

    /// Executor with the default transport and no middleware.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Number of token exchanges performed by this executor (and its clones).
    pub fn token_exchanges(&self) -> u64 {
        self.inner.tokens.exchange_count()
    }

    /// Execute `command` and decode its response.
    ///
    /// `Ok(None)` means the service answered with an empty body (or null data).
    pub async fn execute<I, O>(&self, command: &Command<I, O>) -> Result<Option<O>, CommandError>
    where
        I: Sync,
        O: DeserializeOwned + Schema,
    {
        let config = &self.inner.config;
        let trace_id = config
            .trace_id()
            .map(str::to_string)
            .unwrap_or_else(|| TraceId::new().to_string());
        let ctx = CommandContext::new(command.metadata().clone(), trace_id, config.tenant_id().cloned());

        let span = tracing::debug_span!(
            "command",
            command = ctx.command_name(),
            trace_id = %ctx.trace_id,
        );

        async {
            tracing::debug!(method = %ctx.metadata.method, path = ctx.metadata.path, "executing command");
            match self.run(&ctx, command).await {
                Ok(output) => {
                    tracing::debug!(elapsed_ms = ctx.elapsed_ms(), "command completed");
                    Ok(output)
                }
                Err(error) => {
                    tracing::warn!(kind = error.kind(), error = %error, "command failed");
                    Err(self.inner.pipeline.on_error(&ctx, error).await)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run<I, O>(&self, ctx: &CommandContext, command: &Command<I, O>) -> Result<Option<O>, CommandError>
    where
        I: Sync,
        O: DeserializeOwned + Schema,
    {
        let token = self.access_token(&ctx.trace_id).await?;
        self.inner.pipeline.before(ctx).await?;

        let request = self.build_request(ctx, command, token.value())?;
        let response = self.inner.transport.send(request).await.map_err(ApiError::from)?;

        if !response.is_success() {
            if response.status == 401 && self.inner.config.auth().requires_exchange() {
                tracing::warn!("access token rejected; dropping cached token");
                self.inner.tokens.invalidate(token.value()).await;
            }
            return Err(ApiError::from_response(&response).into());
        }

        let output = decode(command, &response)?;
        self.inner.pipeline.after(ctx, &response).await?;
        Ok(output)
    }

    async fn access_token(&self, trace_id: &str) -> Result<AccessToken, ApiError> {
        match self.inner.config.auth() {
            AuthMode::BearerToken(token) => Ok(AccessToken::new(token.clone(), None)),
            AuthMode::Credential(credential) => {
                self.inner
                    .tokens
                    .get_or_fetch(|| self.exchange(credential, trace_id))
                    .await
            }
        }
    }

    /// Trade the client credential for an access token.
    ///
    /// The exchange is traced and signed like any command request.
    async fn exchange(&self, credential: &Credential, trace_id: &str) -> Result<AccessToken, ApiError> {
        let config = &self.inner.config;
        tracing::info!(client_id = credential.client_id(), "exchanging client credential");

        let auth_error = |message: String| ApiError::new(ApiError::AUTHENTICATION_ERROR, message);
        let url = config
            .endpoint_url(config.token_path())
            .map_err(|e| auth_error(e.to_string()))?;
        let body = serde_json::to_vec(&credential.exchange_request()).map_err(|e| auth_error(e.to_string()))?;

        let signed_path = url.path().to_string();
        let mut request = HttpRequest::new(HttpMethod::Post, url)
            .with_header("accept", JSON)
            .with_header(TRACE_HEADER, trace_id);
        if let Some(tenant) = config.tenant_id() {
            request = request.with_header(TENANT_HEADER, tenant.as_str());
        }
        let request = self
            .sign(request, HttpMethod::Post, &signed_path, &body)
            .map_err(|e| auth_error(e.to_string()))?
            .with_header("content-type", JSON)
            .with_body(body);

        let response = self.inner.transport.send(request).await.map_err(|e| {
            let cause = ApiError::from(e);
            auth_error(format!("token exchange failed: {}", cause.message))
        })?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "token exchange rejected");
            return Err(ApiError::from_response_named(ApiError::AUTHENTICATION_ERROR, &response));
        }

        let token: TokenResponse = serde_json::from_slice(&response.body)
            .map_err(|e| auth_error(format!("invalid token response: {e}")).with_status(response.status))?;
        token
            .into_access_token(Utc::now())
            .map_err(|e| auth_error(e.to_string()).with_status(response.status))
    }

    fn build_request<I, O>(
        &self,
        ctx: &CommandContext,
        command: &Command<I, O>,
        token: &str,
    ) -> Result<HttpRequest, CommandError> {
        let config = &self.inner.config;
        let metadata = command.metadata();
        let unbuildable = |e: ConfigError| ValidationError::malformed(e.to_string());

        let (mut url, body) = match command.body() {
            Body::Graphql(graphql) => {
                let url = config.endpoint_url(config.graphql_path()).map_err(unbuildable)?;
                let envelope = serde_json::to_vec(&graphql.envelope(config.tenant_id())).map_err(ValidationError::from)?;
                (url, Some(envelope))
            }
            Body::Json(bytes) => {
                let url = config.url_for(command.segments().iter().map(String::as_str)).map_err(unbuildable)?;
                (url, Some(bytes.clone()))
            }
            Body::Empty => {
                let url = config.url_for(command.segments().iter().map(String::as_str)).map_err(unbuildable)?;
                (url, None)
            }
        };
        if !command.query().is_empty() {
            url.query_pairs_mut().extend_pairs(command.query());
        }

        let signed_path = match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        };

        let mut request = HttpRequest::new(metadata.method, url)
            .with_header("authorization", format!("Bearer {token}"))
            .with_header("accept", JSON)
            .with_header(TRACE_HEADER, ctx.trace_id.as_str());
        if let (Protocol::Rest, Some(tenant)) = (metadata.protocol, &ctx.tenant_id) {
            request = request.with_header(TENANT_HEADER, tenant.as_str());
        }
        request = self.sign(request, metadata.method, &signed_path, body.as_deref().unwrap_or_default())?;
        if let Some(body) = body {
            request = request.with_header("content-type", JSON).with_body(body);
        }
        Ok(request)
    }

    /// Add the signature headers when a signing key is configured.
    fn sign(
        &self,
        mut request: HttpRequest,
        method: HttpMethod,
        signed_path: &str,
        body: &[u8],
    ) -> Result<HttpRequest, ValidationError> {
        let Some(key) = self.inner.config.signing() else {
            return Ok(request);
        };
        let signature = key
            .sign(method.as_str(), signed_path, Utc::now().timestamp(), body)
            .map_err(|e| ValidationError::malformed(e.to_string()))?;
        for (name, value) in signature.headers() {
            request = request.with_header(name, value);
        }
        Ok(request)
    }
}

/// Decode and validate a 2xx response.
fn decode<I, O>(command: &Command<I, O>, response: &HttpResponse) -> Result<Option<O>, ApiError>
where
    O: DeserializeOwned + Schema,
{
    if response.is_blank() {
        return Ok(None);
    }
    let invalid = |e: ValidationError| ApiError::response_validation(&e, response);

    let value: JsonValue = serde_json::from_slice(&response.body).map_err(|e| invalid(e.into()))?;
    let value = match command.body() {
        Body::Graphql(_) => {
            let graphql: GraphqlResponse = serde_json::from_value(value).map_err(|e| invalid(e.into()))?;
            match graphql.into_data(command.root_field(), response)? {
                Some(data) => data,
                None => return Ok(None),
            }
        }
        Body::Json(_) | Body::Empty => value,
    };
    if value.is_null() {
        return Ok(None);
    }
    parse_value(value).map(Some).map_err(invalid)
}
