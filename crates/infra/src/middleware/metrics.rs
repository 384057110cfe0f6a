use crate::error::{CommandError, MiddlewareError};
use crate::transport::HttpResponse;

use super::{CommandContext, Middleware};

/// Counter of executions, labelled `command` and `outcome` (`success` or the error kind).
pub const COMMANDS_TOTAL: &str = "corebank_commands_total";
/// Histogram of execution latency, labelled `command`.
pub const COMMAND_DURATION_SECONDS: &str = "corebank_command_duration_seconds";

/// Records command outcomes through the `metrics` facade.
///
/// Without an installed recorder the calls are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsMiddleware;

impl MetricsMiddleware {
    fn record(ctx: &CommandContext, outcome: &'static str) {
        let command = ctx.command_name();
        metrics::counter!(COMMANDS_TOTAL, "command" => command, "outcome" => outcome).increment(1);
        metrics::histogram!(COMMAND_DURATION_SECONDS, "command" => command)
            .record(ctx.elapsed().as_secs_f64());
    }
}

#[async_trait::async_trait]
impl Middleware for MetricsMiddleware {
    fn name(&self) -> &'static str {
        "metrics"
    }

    async fn after(&self, ctx: &CommandContext, _response: &HttpResponse) -> Result<(), MiddlewareError> {
        Self::record(ctx, "success");
        Ok(())
    }

    async fn on_error(&self, ctx: &CommandContext, error: &CommandError) -> Result<(), MiddlewareError> {
        Self::record(ctx, error.kind());
        Ok(())
    }
}
