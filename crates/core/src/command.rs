//! Static command metadata.
//!
//! Every command carries a fixed description of the remote call it performs:
//! a logical name, the path template and the HTTP verb. Metadata is decided by
//! the factory that builds the command and never depends on runtime input.

use serde::{Deserialize, Serialize};

/// HTTP verbs used by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which remote surface a command talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Resource-oriented REST endpoint; the path template is meaningful.
    Rest,
    /// The single GraphQL endpoint; the path is resolved from configuration.
    Graphql,
}

/// Path placeholder used in the metadata of GraphQL commands.
pub const GRAPHQL_PATH: &str = "{graphqlPath}";

/// Fixed description of a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMetadata {
    /// Logical operation name, e.g. `"CreateTransfer"`.
    pub command_name: &'static str,
    /// Path template, e.g. `"/transfers/{transferId}"`.
    pub path: &'static str,
    pub method: HttpMethod,
    pub protocol: Protocol,
}

impl CommandMetadata {
    pub const fn rest(command_name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self {
            command_name,
            path,
            method,
            protocol: Protocol::Rest,
        }
    }

    pub const fn graphql(command_name: &'static str) -> Self {
        Self {
            command_name,
            path: GRAPHQL_PATH,
            method: HttpMethod::Post,
            protocol: Protocol::Graphql,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_metadata_is_a_post_to_the_configured_path() {
        let meta = CommandMetadata::graphql("SearchClients");
        assert_eq!(meta.method, HttpMethod::Post);
        assert_eq!(meta.protocol, Protocol::Graphql);
        assert_eq!(meta.path, GRAPHQL_PATH);
    }

    #[test]
    fn metadata_serializes_in_camel_case() {
        let meta = CommandMetadata::rest("GetClient", HttpMethod::Get, "/clients/{clientId}");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["commandName"], "GetClient");
        assert_eq!(json["method"], "GET");
        assert_eq!(json["protocol"], "rest");
    }
}
