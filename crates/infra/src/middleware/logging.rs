use crate::error::{CommandError, MiddlewareError};
use crate::transport::HttpResponse;

use super::{CommandContext, Middleware};

/// Emits one `tracing` event per hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn before(&self, ctx: &CommandContext) -> Result<(), MiddlewareError> {
        tracing::info!(
            command = ctx.command_name(),
            method = %ctx.metadata.method,
            path = ctx.metadata.path,
            trace_id = %ctx.trace_id,
            tenant_id = ctx.tenant_id.as_ref().map(|t| t.as_str()),
            "command started"
        );
        Ok(())
    }

    async fn after(&self, ctx: &CommandContext, response: &HttpResponse) -> Result<(), MiddlewareError> {
        tracing::info!(
            command = ctx.command_name(),
            trace_id = %ctx.trace_id,
            status = response.status,
            elapsed_ms = ctx.elapsed_ms(),
            "command succeeded"
        );
        Ok(())
    }

    async fn on_error(&self, ctx: &CommandContext, error: &CommandError) -> Result<(), MiddlewareError> {
        tracing::warn!(
            command = ctx.command_name(),
            trace_id = %ctx.trace_id,
            kind = error.kind(),
            status = error.status_code(),
            elapsed_ms = ctx.elapsed_ms(),
            error = %error,
            "command failed"
        );
        Ok(())
    }
}
