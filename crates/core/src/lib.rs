//! `corebank-core`: schema-layer building blocks.
//!
//! This crate contains **pure** primitives shared by every resource crate
//! (no transport, no I/O): identifiers, money, command metadata and the
//! `Schema` validation contract.

pub mod command;
pub mod error;
pub mod id;
pub mod money;
pub mod schema;

pub use command::{CommandMetadata, HttpMethod, Protocol};
pub use error::{ValidationError, ValidationResult};
pub use id::{TenantId, TraceId};
pub use money::{Currency, Money};
pub use schema::{NoContent, Pagination, Schema};
