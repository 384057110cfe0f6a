//! `corebank-infra`: transport, configuration and command execution.
//!
//! Resource crates describe *what* to call (a [`Command`] built from static
//! metadata and a validated input); this crate decides *how*: it resolves the
//! access token, runs the middleware pipeline, builds and signs the HTTP
//! request, and normalizes every failure into a [`CommandError`].

pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod graphql;
pub mod middleware;
pub mod transport;


pub use command::{Body, Command};
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError, TransportOptions};
pub use error::{ApiError, CommandError, MiddlewareError, is_command_error};
pub use executor::{CommandExecutor, CommandExecutorBuilder};
pub use graphql::{GraphqlRequest, GraphqlResponse, graphql_command};
pub use middleware::{CommandContext, LoggingMiddleware, MetricsMiddleware, Middleware, Pipeline};
pub use transport::{
    HttpRequest, HttpResponse, RecordingTransport, ReqwestTransport, Transport, TransportError,
};
