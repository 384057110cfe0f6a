//! Command-line front end over the SDK.
//!
//! Every subcommand maps onto one command factory; the decoded record is
//! printed as JSON on stdout.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use corebank_clients::{ClientId, ClientState, ListClientsParams, get_client, get_clients};
use corebank_core::{Pagination, Schema};
use corebank_infra::{Command, CommandExecutor, graphql_command};
use corebank_observability::LogFormat;
use corebank_payments::{PaymentId, TransferId, get_payment, get_transfer};
use corebank_savings::{SavingAccountId, get_saving_account};

#[derive(Debug, Parser)]
#[command(name = "corebank", version, about = "Core-banking API client")]
pub struct Cli {
    /// Log line format (json or compact).
    #[arg(long, env = "COREBANK_LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,

    /// Pretty-print the JSON result.
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Clients.
    #[command(subcommand)]
    Client(ClientCommand),
    /// Savings accounts.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Outgoing payments.
    #[command(subcommand)]
    Payment(PaymentCommand),
    /// Transfers between accounts.
    #[command(subcommand)]
    Transfer(TransferCommand),
    /// Run a raw GraphQL operation and print its `data`.
    Graphql {
        query: String,
        /// Variables as a JSON object.
        #[arg(long)]
        variables: Option<String>,
        #[arg(long)]
        operation_name: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    Get {
        id: String,
    },
    List {
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long, default_value_t = 50)]
        limit: u32,
        /// Lifecycle state filter, e.g. ACTIVE or PENDING_APPROVAL.
        #[arg(long, value_parser = parse_client_state)]
        state: Option<ClientState>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    Get { id: String },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    Get { id: String },
}

#[derive(Debug, Subcommand)]
pub enum TransferCommand {
    Get { id: String },
}

fn parse_client_state(raw: &str) -> Result<ClientState, String> {
    let wire = raw.trim().to_ascii_uppercase().replace('-', "_");
    serde_json::from_value(JsonValue::String(wire)).map_err(|_| format!("unknown client state '{raw}'"))
}

/// Execute `command` and render its outcome. An empty response renders as `null`.
pub async fn run(command: CliCommand, executor: &CommandExecutor) -> anyhow::Result<JsonValue> {
    match command {
        CliCommand::Client(ClientCommand::Get { id }) => render(get_client(&ClientId::new(id)?)?, executor).await,
        CliCommand::Client(ClientCommand::List { offset, limit, state }) => {
            let params = ListClientsParams {
                page: Pagination {
                    offset,
                    limit: Some(limit),
                },
                state,
                branch_key: None,
            };
            render(get_clients(params)?, executor).await
        }
        CliCommand::Account(AccountCommand::Get { id }) => {
            render(get_saving_account(&SavingAccountId::new(id)?)?, executor).await
        }
        CliCommand::Payment(PaymentCommand::Get { id }) => render(get_payment(&PaymentId::new(id)?)?, executor).await,
        CliCommand::Transfer(TransferCommand::Get { id }) => {
            render(get_transfer(&TransferId::new(id)?)?, executor).await
        }
        CliCommand::Graphql {
            query,
            variables,
            operation_name,
        } => {
            let variables = variables
                .map(|raw| serde_json::from_str::<JsonValue>(&raw))
                .transpose()
                .context("--variables is not valid JSON")?;
            let command = graphql_command::<JsonValue>("Graphql", query, variables, operation_name)?;
            render(command, executor).await
        }
    }
}

async fn render<I, O>(command: Command<I, O>, executor: &CommandExecutor) -> anyhow::Result<JsonValue>
where
    I: Sync,
    O: DeserializeOwned + Schema + Serialize,
{
    let name = command.metadata().command_name;
    let output = command
        .execute(executor)
        .await
        .with_context(|| format!("{name} failed"))?;
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use corebank_auth::AuthMode;
    use corebank_core::HttpMethod;
    use corebank_infra::{ClientConfig, CommandError, HttpResponse, RecordingTransport};

    use super::*;

    fn executor(transport: &Arc<RecordingTransport>) -> CommandExecutor {
        let config = ClientConfig::builder("http://bank.test/api", AuthMode::bearer("cli-token").unwrap())
            .build()
            .unwrap();
        CommandExecutor::builder(config)
            .shared_transport(transport.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn parses_client_list_with_state() {
        let cli = Cli::try_parse_from(["corebank", "client", "list", "--state", "pending_approval", "--offset", "10"])
            .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(!cli.pretty);
        match cli.command {
            CliCommand::Client(ClientCommand::List { offset, limit, state }) => {
                assert_eq!(offset, Some(10));
                assert_eq!(limit, 50);
                assert_eq!(state, Some(ClientState::PendingApproval));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_client_state() {
        assert!(Cli::try_parse_from(["corebank", "client", "list", "--state", "sleeping"]).is_err());
    }

    #[test]
    fn parses_log_format_and_graphql_options() {
        let cli = Cli::try_parse_from([
            "corebank",
            "--log-format",
            "compact",
            "--pretty",
            "graphql",
            "query { ping }",
            "--variables",
            "{\"x\":1}",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert!(cli.pretty);
        assert!(matches!(cli.command, CliCommand::Graphql { operation_name: None, .. }));
    }

    #[tokio::test]
    async fn client_get_renders_the_record() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Get,
            "/api/clients/c-1",
            HttpResponse::json(
                200,
                &json!({
                    "id": "c-1",
                    "firstname": "Ada",
                    "lastname": "Lovelace",
                    "state": "ACTIVE",
                    "createdAt": "2024-01-02T03:04:05Z"
                }),
            ),
        ));
        let cli = Cli::try_parse_from(["corebank", "client", "get", "c-1"]).unwrap();

        let value = run(cli.command, &executor(&transport)).await.unwrap();
        assert_eq!(value["firstname"], "Ada");
        assert_eq!(value["state"], "ACTIVE");
    }

    #[tokio::test]
    async fn empty_response_renders_null() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Get,
            "/api/payments/p-9",
            HttpResponse::empty(200),
        ));
        let cli = Cli::try_parse_from(["corebank", "payment", "get", "p-9"]).unwrap();

        let value = run(cli.command, &executor(&transport)).await.unwrap();
        assert!(value.is_null());
    }

    #[tokio::test]
    async fn client_list_sends_pagination_and_state() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Get,
            "/api/clients",
            HttpResponse::json(200, &json!([])),
        ));
        let cli = Cli::try_parse_from(["corebank", "client", "list", "--state", "ACTIVE", "--limit", "5"]).unwrap();

        let value = run(cli.command, &executor(&transport)).await.unwrap();
        assert_eq!(value, json!([]));
        let call = transport.last_call().unwrap();
        assert_eq!(call.url.query(), Some("limit=5&state=ACTIVE"));
    }

    #[tokio::test]
    async fn graphql_rejects_invalid_variables_before_sending() {
        let transport = Arc::new(RecordingTransport::new());
        let cli = Cli::try_parse_from(["corebank", "graphql", "query { ping }", "--variables", "{not json"]).unwrap();

        let err = run(cli.command, &executor(&transport)).await.unwrap_err();
        assert!(err.to_string().contains("--variables"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn http_errors_keep_their_typed_cause() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Get,
            "/api/transfers/t-1",
            HttpResponse::json(404, &json!({ "errorCode": "NOT_FOUND", "message": "no such transfer" })),
        ));
        let cli = Cli::try_parse_from(["corebank", "transfer", "get", "t-1"]).unwrap();

        let err = run(cli.command, &executor(&transport)).await.unwrap_err();
        let cause = err.downcast_ref::<CommandError>().unwrap();
        assert_eq!(cause.status_code(), Some(404));
    }
}
