//! Client search over the GraphQL endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use corebank_core::schema::require_text;
use corebank_core::{Pagination, Schema, ValidationResult};

use crate::client::{BranchKey, Client, ClientState};

/// Root field of the search query in the response `data`.
pub const SEARCH_CLIENTS_FIELD: &str = "searchClients";

pub const SEARCH_CLIENTS_QUERY: &str = "query SearchClients($text: String!, $state: ClientState, $branchKey: String, $offset: Int, $limit: Int) {
  searchClients(text: $text, state: $state, branchKey: $branchKey, offset: $offset, limit: $limit) {
    total
    items {
      id firstname lastname middlename email mobilePhone gender birthDate state branchKey
      address { line1 line2 city postcode country }
      createdAt updatedAt
    }
  }
}";

/// Free-text client search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSearch {
    /// Matched against names, e-mail and phone.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ClientState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_key: Option<BranchKey>,
    #[serde(flatten)]
    pub page: Pagination,
}

impl ClientSearch {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            state: None,
            branch_key: None,
            page: Pagination::default(),
        }
    }

    /// GraphQL variables of [`SEARCH_CLIENTS_QUERY`]; unset filters are omitted.
    pub fn variables(&self) -> ValidationResult<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Schema for ClientSearch {
    fn validate(&self) -> ValidationResult<()> {
        require_text("text", &self.text)?;
        self.branch_key.validate()?;
        self.page.validate()
    }
}

/// One page of search hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSearchResult {
    pub total: u64,
    #[serde(default)]
    pub items: Vec<Client>,
}

impl Schema for ClientSearchResult {
    fn validate(&self) -> ValidationResult<()> {
        self.items.validate()
    }
}
