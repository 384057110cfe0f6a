//! Clients resource (customers of the bank).
//!
//! Records, request schemas and command factories for `/clients` and the
//! client search GraphQL query. Factories only build commands; nothing is
//! sent until a command is executed.

pub mod client;
pub mod commands;
pub mod search;

pub use client::{
    Address, BranchKey, Client, ClientId, ClientState, CreateClientRequest, Gender, ListClientsParams,
    UpdateClientRequest,
};
pub use commands::{create_client, delete_client, get_client, get_clients, search_clients, update_client};
pub use search::{ClientSearch, ClientSearchResult};
