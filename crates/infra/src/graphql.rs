//! GraphQL wire types.
//!
//! All GraphQL operations go through a single endpoint. The request document
//! travels in the `command` field of the envelope; the tenant is carried in
//! the body instead of a header.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use corebank_core::{CommandMetadata, Schema, TenantId, ValidationError, ValidationResult, schema::require_text};

use crate::command::Command;
use crate::error::ApiError;
use crate::transport::HttpResponse;

/// A GraphQL document plus its variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    pub fn with_variables(mut self, variables: JsonValue) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Body sent to the GraphQL endpoint.
    pub fn envelope<'a>(&'a self, tenant_id: Option<&'a TenantId>) -> GraphqlEnvelope<'a> {
        GraphqlEnvelope {
            command: &self.query,
            tenant_id,
            variables: self.variables.as_ref(),
            operation_name: self.operation_name.as_deref(),
        }
    }
}

impl Schema for GraphqlRequest {
    fn validate(&self) -> ValidationResult<()> {
        require_text("query", &self.query)?;
        match &self.variables {
            None | Some(JsonValue::Object(_)) => {}
            Some(_) => {
                return Err(ValidationError::invalid("variables", "must be a JSON object"));
            }
        }
        if let Some(name) = &self.operation_name {
            require_text("operationName", name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlEnvelope<'a> {
    pub command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<&'a TenantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlErrorItem {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<JsonValue>>,
    #[serde(default)]
    pub extensions: Option<JsonValue>,
}

impl GraphqlErrorItem {
    fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }
}

/// `{data?, errors?}` as returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<JsonValue>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorItem>,
}

impl GraphqlResponse {
    /// Split a 2xx GraphQL response into its data or a `GraphQLError`.
    ///
    /// `root_field` selects one field of `data`; a null or missing result is
    /// `Ok(None)`.
    pub fn into_data(
        self,
        root_field: Option<&str>,
        response: &HttpResponse,
    ) -> Result<Option<JsonValue>, ApiError> {
        if let Some(first) = self.errors.first() {
            let message = self
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            let mut error = ApiError::new(ApiError::GRAPHQL_ERROR, message).with_status(response.status);
            if let Some(code) = first.code() {
                error = error.with_code(code);
            }
            if let Some(request_id) = response.header(crate::error::REQUEST_ID_HEADER) {
                error = error.with_request_id(request_id);
            }
            let original = serde_json::to_value(
                self.errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "message": e.message,
                            "path": e.path,
                            "extensions": e.extensions,
                        })
                    })
                    .collect::<Vec<_>>(),
            )
            .unwrap_or(JsonValue::Null);
            return Err(error.with_original(original));
        }

        let data = match (self.data, root_field) {
            (Some(JsonValue::Object(mut map)), Some(field)) => map.remove(field),
            (data, _) => data,
        };
        Ok(data.filter(|v| !v.is_null()))
    }
}

/// Ad-hoc GraphQL operation whose whole `data` object decodes into `O`.
pub fn graphql_command<O>(
    command_name: &'static str,
    query: impl Into<String>,
    variables: Option<JsonValue>,
    operation_name: Option<String>,
) -> ValidationResult<Command<GraphqlRequest, O>> {
    let request = GraphqlRequest {
        query: query.into(),
        variables,
        operation_name,
    };
    Command::graphql(CommandMetadata::graphql(command_name), request.clone(), request, None)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_uses_command_field_and_skips_absent_values() {
        let request = GraphqlRequest::new("query { ping }");
        let body = serde_json::to_value(request.envelope(None)).unwrap();
        assert_eq!(body, json!({ "command": "query { ping }" }));

        let tenant = TenantId::new("acme").unwrap();
        let request = request
            .with_variables(json!({ "x": 1 }))
            .with_operation_name("Ping");
        let body = serde_json::to_value(request.envelope(Some(&tenant))).unwrap();
        assert_eq!(
            body,
            json!({
                "command": "query { ping }",
                "tenantId": "acme",
                "variables": { "x": 1 },
                "operationName": "Ping",
            })
        );
    }

    #[test]
    fn validation_requires_query_and_object_variables() {
        assert!(GraphqlRequest::new("  ").validate().is_err());
        assert!(
            GraphqlRequest::new("query { a }")
                .with_variables(json!([1, 2]))
                .validate()
                .is_err()
        );
        assert!(
            GraphqlRequest::new("query { a }")
                .with_variables(json!({}))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn errors_become_graphql_error() {
        let http = HttpResponse::json(200, &json!({})).with_header("x-request-id", "req-9");
        let response: GraphqlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [
                { "message": "field missing", "extensions": { "code": "BAD_INPUT" } },
                { "message": "second" }
            ]
        }))
        .unwrap();

        let err = response.into_data(None, &http).unwrap_err();
        assert_eq!(err.name, ApiError::GRAPHQL_ERROR);
        assert_eq!(err.message, "field missing; second");
        assert_eq!(err.code.as_deref(), Some("BAD_INPUT"));
        assert_eq!(err.request_id.as_deref(), Some("req-9"));
        assert_eq!(err.status_code, Some(200));
    }

    #[test]
    fn selects_root_field_and_maps_null_to_none() {
        let http = HttpResponse::empty(200);
        let response: GraphqlResponse =
            serde_json::from_value(json!({ "data": { "searchClients": { "total": 1 } } })).unwrap();
        assert_eq!(
            response.into_data(Some("searchClients"), &http).unwrap(),
            Some(json!({ "total": 1 }))
        );

        let response: GraphqlResponse =
            serde_json::from_value(json!({ "data": { "searchClients": null } })).unwrap();
        assert_eq!(response.into_data(Some("searchClients"), &http).unwrap(), None);
    }
}
