use anyhow::Context;
use clap::Parser;

use corebank_infra::{ClientConfig, CommandExecutor, LoggingMiddleware, MetricsMiddleware};
use corebank_sdk::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    corebank_observability::init_with(cli.log_format);

    let config = ClientConfig::from_env().context("failed to load client configuration from the environment")?;
    tracing::debug!(base_url = %config.base_url(), "configuration loaded");

    let executor = CommandExecutor::builder(config)
        .middleware(LoggingMiddleware)
        .middleware(MetricsMiddleware)
        .build()
        .context("failed to build the HTTP transport")?;

    let output = cli::run(cli.command, &executor).await?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}
