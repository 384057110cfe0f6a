//! Command middleware pipeline.
//!
//! Middlewares observe every command execution through three hooks:
//!
//! ```text
//! before(ctx)            in list order, prior to the transport call
//!   ↓ transport + decode
//! after(ctx, response)   in list order, on success
//! on_error(ctx, error)   in list order, on any failure
//! ```
//!
//! Hooks cannot rewrite requests or responses. A failing `before`/`after`
//! hook turns the execution into a failure with its [`MiddlewareError`]; a
//! failing `on_error` hook stops the remaining `on_error` hooks and replaces
//! the error being returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use corebank_core::{CommandMetadata, TenantId};

use crate::error::{CommandError, MiddlewareError};
use crate::transport::HttpResponse;

mod logging;
mod metrics;

pub use self::logging::LoggingMiddleware;
pub use self::metrics::{COMMANDS_TOTAL, COMMAND_DURATION_SECONDS, MetricsMiddleware};

/// Per-execution data handed to every hook.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub metadata: CommandMetadata,
    pub trace_id: String,
    pub tenant_id: Option<TenantId>,
    pub started_at: Instant,
}

impl CommandContext {
    pub fn new(metadata: CommandMetadata, trace_id: impl Into<String>, tenant_id: Option<TenantId>) -> Self {
        Self {
            metadata,
            trace_id: trace_id.into(),
            tenant_id,
            started_at: Instant::now(),
        }
    }

    pub fn command_name(&self) -> &'static str {
        self.metadata.command_name
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Elapsed wall time in whole milliseconds, saturating at `u64::MAX`.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Hooks invoked around each command execution. All hooks default to no-ops.
#[async_trait::async_trait]
pub trait Middleware: Send + Sync {
    /// Name reported in [`MiddlewareError`]s and logs.
    fn name(&self) -> &'static str;

    async fn before(&self, _ctx: &CommandContext) -> Result<(), MiddlewareError> {
        Ok(())
    }

    async fn after(&self, _ctx: &CommandContext, _response: &HttpResponse) -> Result<(), MiddlewareError> {
        Ok(())
    }

    async fn on_error(&self, _ctx: &CommandContext, _error: &CommandError) -> Result<(), MiddlewareError> {
        Ok(())
    }
}

/// Ordered list of middlewares.
#[derive(Clone, Default)]
pub struct Pipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub async fn before(&self, ctx: &CommandContext) -> Result<(), MiddlewareError> {
        for middleware in &self.middlewares {
            middleware.before(ctx).await?;
        }
        Ok(())
    }

    pub async fn after(&self, ctx: &CommandContext, response: &HttpResponse) -> Result<(), MiddlewareError> {
        for middleware in &self.middlewares {
            middleware.after(ctx, response).await?;
        }
        Ok(())
    }

    /// Run the `on_error` hooks and return the error the caller should see.
    pub async fn on_error(&self, ctx: &CommandContext, error: CommandError) -> CommandError {
        for middleware in &self.middlewares {
            if let Err(hook_error) = middleware.on_error(ctx, &error).await {
                tracing::warn!(
                    middleware = middleware.name(),
                    original = %error,
                    "on_error hook failed; replacing command error"
                );
                return hook_error.into();
            }
        }
        error
    }
}

impl core::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.middlewares.iter().map(|m| m.name()))
            .finish()
    }
}
