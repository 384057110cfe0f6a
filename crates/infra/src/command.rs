//! Typed command objects.
//!
//! A [`Command`] pairs a validated input with the static metadata of one
//! remote operation and everything needed to build its request. Creating a
//! command never performs I/O; it is inert until handed to a
//! [`CommandExecutor`].

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use corebank_core::{CommandMetadata, Protocol, Schema, ValidationError, ValidationResult};

use crate::error::CommandError;
use crate::executor::CommandExecutor;
use crate::graphql::GraphqlRequest;

/// Request payload of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    /// Serialized JSON document.
    Json(Vec<u8>),
    /// Sent to the GraphQL endpoint inside the envelope.
    Graphql(GraphqlRequest),
}

/// A remote operation with input `I` and decoded output `O`.
pub struct Command<I, O> {
    input: I,
    metadata: CommandMetadata,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Body,
    root_field: Option<&'static str>,
    _output: PhantomData<fn() -> O>,
}

impl<I, O> Command<I, O>
where
    I: Schema,
{
    /// REST command without a body.
    ///
    /// `params` fill the `{name}` placeholders of the metadata path template.
    pub fn new(metadata: CommandMetadata, input: I, params: &[(&str, &str)]) -> ValidationResult<Self> {
        input.validate()?;
        let segments = match metadata.protocol {
            Protocol::Rest => resolve_path(metadata.path, params)?,
            Protocol::Graphql => Vec::new(),
        };
        Ok(Self {
            input,
            metadata,
            segments,
            query: Vec::new(),
            body: Body::Empty,
            root_field: None,
            _output: PhantomData,
        })
    }

    /// GraphQL command. `root_field` selects the field of `data` decoded as `O`;
    /// without it the whole `data` object is decoded.
    pub fn graphql(
        metadata: CommandMetadata,
        input: I,
        request: GraphqlRequest,
        root_field: Option<&'static str>,
    ) -> ValidationResult<Self> {
        request.validate()?;
        let mut command = Self::new(metadata, input, &[])?;
        command.body = Body::Graphql(request);
        command.root_field = root_field;
        Ok(command)
    }
}

impl<I, O> Command<I, O>
where
    I: Serialize,
{
    /// Send the input as the JSON request body.
    pub fn with_json_body(mut self) -> ValidationResult<Self> {
        self.body = Body::Json(serde_json::to_vec(&self.input)?);
        Ok(self)
    }

    /// Send the input's fields as query parameters.
    pub fn with_input_query(self) -> ValidationResult<Self> {
        let value = serde_json::to_value(&self.input)?;
        self.with_query_value(value)
    }
}

impl<I, O> Command<I, O> {
    /// Append query parameters from a flat serializable object.
    ///
    /// Null fields are omitted and arrays repeat the key once per element.
    pub fn with_query<Q: Serialize>(self, query: &Q) -> ValidationResult<Self> {
        let value = serde_json::to_value(query)?;
        self.with_query_value(value)
    }

    fn with_query_value(mut self, value: JsonValue) -> ValidationResult<Self> {
        let JsonValue::Object(map) = value else {
            return Err(ValidationError::malformed("query parameters must be an object"));
        };
        for (key, value) in map {
            match value {
                JsonValue::Null => {}
                JsonValue::Array(items) => {
                    for item in items {
                        if let Some(v) = scalar(&key, item)? {
                            self.query.push((key.clone(), v));
                        }
                    }
                }
                other => {
                    if let Some(v) = scalar(&key, other)? {
                        self.query.push((key, v));
                    }
                }
            }
        }
        Ok(self)
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    /// Resolved path segments (REST only).
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn root_field(&self) -> Option<&'static str> {
        self.root_field
    }
}

impl<I, O> Command<I, O>
where
    I: Sync,
    O: DeserializeOwned + Schema,
{
    /// Shorthand for [`CommandExecutor::execute`].
    pub async fn execute(&self, executor: &CommandExecutor) -> Result<Option<O>, CommandError> {
        executor.execute(self).await
    }
}

impl<I: Clone, O> Clone for Command<I, O> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            metadata: self.metadata.clone(),
            segments: self.segments.clone(),
            query: self.query.clone(),
            body: self.body.clone(),
            root_field: self.root_field,
            _output: PhantomData,
        }
    }
}

impl<I: core::fmt::Debug, O> core::fmt::Debug for Command<I, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Command")
            .field("metadata", &self.metadata)
            .field("input", &self.input)
            .field("segments", &self.segments)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

fn scalar(key: &str, value: JsonValue) -> ValidationResult<Option<String>> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s)),
        JsonValue::Bool(b) => Ok(Some(b.to_string())),
        JsonValue::Number(n) => Ok(Some(n.to_string())),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            Err(ValidationError::invalid(key, "nested values cannot be sent as query parameters"))
        }
    }
}

/// Split a path template into segments, substituting `{name}` placeholders.
fn resolve_path(template: &str, params: &[(&str, &str)]) -> ValidationResult<Vec<String>> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
                return Ok(segment.to_string());
            };
            params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ValidationError::missing(name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use corebank_core::{HttpMethod, NoContent};

    use super::*;

    const GET_THING: CommandMetadata = CommandMetadata::rest("GetThing", HttpMethod::Get, "/things/{thingId}/parts/{partId}");
    const LIST_THINGS: CommandMetadata = CommandMetadata::rest("ListThings", HttpMethod::Get, "/things");

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filter {
        offset: Option<u32>,
        limit: Option<u32>,
        states: Vec<&'static str>,
        branch_key: Option<String>,
    }

    impl Schema for Filter {
        fn validate(&self) -> ValidationResult<()> {
            Ok(())
        }
    }

    #[test]
    fn substitutes_path_parameters() {
        let command: Command<(), NoContent> =
            Command::new(GET_THING, (), &[("thingId", "t-1"), ("partId", "p 2")]).unwrap();
        assert_eq!(command.segments(), ["things", "t-1", "parts", "p 2"]);
        assert_eq!(command.body(), &Body::Empty);
    }

    #[test]
    fn missing_path_parameter_is_a_validation_error() {
        let err = Command::<(), NoContent>::new(GET_THING, (), &[("thingId", "t-1")]).unwrap_err();
        assert_eq!(err, ValidationError::missing("partId"));

        let err = Command::<(), NoContent>::new(GET_THING, (), &[("thingId", " "), ("partId", "p")]).unwrap_err();
        assert_eq!(err.field(), Some("thingId"));
    }

    #[test]
    fn input_query_skips_nulls_and_repeats_arrays() {
        let filter = Filter {
            offset: Some(10),
            limit: None,
            states: vec!["ACTIVE", "BLOCKED"],
            branch_key: Some("b1".to_string()),
        };
        let command: Command<Filter, Vec<JsonValue>> =
            Command::new(LIST_THINGS, filter, &[]).unwrap().with_input_query().unwrap();

        let mut query = command.query().to_vec();
        query.sort();
        assert_eq!(
            query,
            [
                ("branchKey".to_string(), "b1".to_string()),
                ("offset".to_string(), "10".to_string()),
                ("states".to_string(), "ACTIVE".to_string()),
                ("states".to_string(), "BLOCKED".to_string()),
            ]
        );
    }

    #[test]
    fn nested_query_values_are_rejected() {
        let result = Command::<(), NoContent>::new(LIST_THINGS, (), &[])
            .unwrap()
            .with_query(&json!({ "filter": { "a": 1 } }));
        assert!(result.is_err());
    }

    #[test]
    fn json_body_serializes_the_input() {
        let command: Command<JsonValue, JsonValue> = Command::new(LIST_THINGS, json!({ "a": 1 }), &[])
            .unwrap()
            .with_json_body()
            .unwrap();
        assert_eq!(command.body(), &Body::Json(br#"{"a":1}"#.to_vec()));
    }

    #[test]
    fn graphql_commands_validate_the_document() {
        let meta = CommandMetadata::graphql("Ping");
        assert!(Command::<(), JsonValue>::graphql(meta.clone(), (), GraphqlRequest::new(""), None).is_err());

        let command =
            Command::<(), JsonValue>::graphql(meta, (), GraphqlRequest::new("{ ping }"), Some("ping")).unwrap();
        assert!(command.segments().is_empty());
        assert_eq!(command.root_field(), Some("ping"));
    }
}
