//! Command factories for the clients resource.

use corebank_core::{CommandMetadata, HttpMethod, NoContent, ValidationResult};
use corebank_infra::{Command, GraphqlRequest};

use crate::client::{Client, ClientId, CreateClientRequest, ListClientsParams, UpdateClientRequest};
use crate::search::{ClientSearch, ClientSearchResult, SEARCH_CLIENTS_FIELD, SEARCH_CLIENTS_QUERY};

pub const CREATE_CLIENT: CommandMetadata = CommandMetadata::rest("CreateClient", HttpMethod::Post, "/clients");
pub const GET_CLIENT: CommandMetadata = CommandMetadata::rest("GetClient", HttpMethod::Get, "/clients/{clientId}");
pub const GET_CLIENTS: CommandMetadata = CommandMetadata::rest("GetClients", HttpMethod::Get, "/clients");
pub const UPDATE_CLIENT: CommandMetadata =
    CommandMetadata::rest("UpdateClient", HttpMethod::Put, "/clients/{clientId}");
pub const DELETE_CLIENT: CommandMetadata =
    CommandMetadata::rest("DeleteClient", HttpMethod::Delete, "/clients/{clientId}");
pub const SEARCH_CLIENTS: CommandMetadata = CommandMetadata::graphql("SearchClients");

pub fn create_client(request: CreateClientRequest) -> ValidationResult<Command<CreateClientRequest, Client>> {
    Command::new(CREATE_CLIENT, request, &[])?.with_json_body()
}

pub fn get_client(client_id: &ClientId) -> ValidationResult<Command<ClientId, Client>> {
    Command::new(GET_CLIENT, client_id.clone(), &[("clientId", client_id.as_str())])
}

pub fn get_clients(params: ListClientsParams) -> ValidationResult<Command<ListClientsParams, Vec<Client>>> {
    Command::new(GET_CLIENTS, params, &[])?.with_input_query()
}

pub fn update_client(
    client_id: &ClientId,
    request: UpdateClientRequest,
) -> ValidationResult<Command<UpdateClientRequest, Client>> {
    Command::new(UPDATE_CLIENT, request, &[("clientId", client_id.as_str())])?.with_json_body()
}

/// The service answers with an empty body; a successful execution yields `None`.
pub fn delete_client(client_id: &ClientId) -> ValidationResult<Command<ClientId, NoContent>> {
    Command::new(DELETE_CLIENT, client_id.clone(), &[("clientId", client_id.as_str())])
}

pub fn search_clients(search: ClientSearch) -> ValidationResult<Command<ClientSearch, ClientSearchResult>> {
    let request = GraphqlRequest::new(SEARCH_CLIENTS_QUERY)
        .with_variables(search.variables()?)
        .with_operation_name(SEARCH_CLIENTS.command_name);
    Command::graphql(SEARCH_CLIENTS, search, request, Some(SEARCH_CLIENTS_FIELD))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use corebank_auth::AuthMode;
    use corebank_core::{Pagination, Protocol, ValidationError};
    use corebank_infra::{Body, ClientConfig, CommandExecutor, HttpResponse, RecordingTransport};

    use super::*;
    use crate::client::ClientState;

    fn client_id() -> ClientId {
        ClientId::new("c-1").unwrap()
    }

    fn client_body(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "firstname": "Ada",
            "lastname": "Lovelace",
            "state": "ACTIVE",
            "createdAt": "2024-01-02T03:04:05Z"
        })
    }

    fn executor(transport: &Arc<RecordingTransport>) -> CommandExecutor {
        let config = ClientConfig::builder("http://bank.test/api", AuthMode::bearer("tok").unwrap())
            .build()
            .unwrap();
        CommandExecutor::builder(config)
            .shared_transport(transport.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn factories_carry_static_metadata() {
        let command = get_client(&client_id()).unwrap();
        assert_eq!(command.metadata(), &GET_CLIENT);
        assert_eq!(command.metadata().path, "/clients/{clientId}");
        assert_eq!(command.segments(), ["clients", "c-1"]);

        let command = update_client(&client_id(), UpdateClientRequest::default()).unwrap();
        assert_eq!(command.metadata().method, HttpMethod::Put);
        assert_eq!(command.body(), &Body::Json(b"{}".to_vec()));

        let command = search_clients(ClientSearch::new("ada")).unwrap();
        assert_eq!(command.metadata().protocol, Protocol::Graphql);
        assert_eq!(command.metadata().command_name, "SearchClients");
    }

    #[test]
    fn invalid_inputs_are_rejected_before_any_request() {
        let err = create_client(CreateClientRequest::new("", "Lovelace")).unwrap_err();
        assert_eq!(err, ValidationError::missing("firstname"));

        let params = ListClientsParams {
            page: Pagination::new(0, 0),
            ..ListClientsParams::default()
        };
        assert_eq!(get_clients(params).unwrap_err().field(), Some("limit"));
    }

    #[tokio::test]
    async fn create_client_posts_the_request_body() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Post,
            "/api/clients",
            HttpResponse::json(201, &client_body("c-1")),
        ));
        let executor = executor(&transport);

        let mut request = CreateClientRequest::new("Ada", "Lovelace");
        request.email = Some("ada@example.com".to_string());
        let command = create_client(request).unwrap();
        assert_eq!(transport.call_count(), 0);

        let client = command.execute(&executor).await.unwrap().unwrap();
        assert_eq!(client.id, client_id());
        assert_eq!(
            transport.last_call().unwrap().body_json().unwrap(),
            json!({ "firstname": "Ada", "lastname": "Lovelace", "email": "ada@example.com" })
        );
    }

    #[tokio::test]
    async fn get_clients_sends_filters_as_query() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Get,
            "/api/clients",
            HttpResponse::json(200, &json!([client_body("c-1"), client_body("c-2")])),
        ));
        let executor = executor(&transport);

        let params = ListClientsParams {
            page: Pagination::new(20, 10),
            state: Some(ClientState::Active),
            branch_key: None,
        };
        let clients = get_clients(params).unwrap().execute(&executor).await.unwrap().unwrap();
        assert_eq!(clients.len(), 2);

        let url = transport.last_call().unwrap().url;
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        pairs.sort();
        assert_eq!(
            pairs,
            [
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "20".to_string()),
                ("state".to_string(), "ACTIVE".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn delete_client_accepts_an_empty_response() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Delete,
            "/api/clients/c-1",
            HttpResponse::empty(204),
        ));
        let executor = executor(&transport);

        let outcome = delete_client(&client_id()).unwrap().execute(&executor).await.unwrap();
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn search_clients_reads_the_root_field() {
        let transport = Arc::new(RecordingTransport::new().respond(
            HttpMethod::Post,
            "/api/graphql",
            HttpResponse::json(
                200,
                &json!({ "data": { "searchClients": { "total": 1, "items": [client_body("c-1")] } } }),
            ),
        ));
        let executor = executor(&transport);

        let result = search_clients(ClientSearch::new("ada"))
            .unwrap()
            .execute(&executor)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].firstname, "Ada");

        let body = transport.last_call().unwrap().body_json().unwrap();
        assert_eq!(body["variables"], json!({ "text": "ada" }));
        assert_eq!(body["operationName"], "SearchClients");
    }
}
