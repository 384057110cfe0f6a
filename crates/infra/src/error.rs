//! Command error model.
//!
//! Every command either fully succeeds or fails with one of three kinds of
//! error:
//!
//! - **Validation**: the input (or a decoded response) failed its schema.
//! - **Api**: transport or remote failure, normalized into [`ApiError`].
//! - **Middleware**: a hook failed; its error is propagated unmodified.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use corebank_core::ValidationError;

use crate::transport::{HttpResponse, TransportError};

/// Header carrying the remote request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Uniform shape of every transport/remote failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{name}: {message}")]
pub struct ApiError {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_error: Option<JsonValue>,
}

impl ApiError {
    pub const HTTP_ERROR: &'static str = "HttpError";
    pub const NETWORK_ERROR: &'static str = "NetworkError";
    pub const TIMEOUT_ERROR: &'static str = "TimeoutError";
    pub const AUTHENTICATION_ERROR: &'static str = "AuthenticationError";
    pub const GRAPHQL_ERROR: &'static str = "GraphQLError";
    pub const RESPONSE_VALIDATION_ERROR: &'static str = "ResponseValidationError";

    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            status_code: None,
            code: None,
            request_id: None,
            original_error: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_original(mut self, original: JsonValue) -> Self {
        self.original_error = Some(original);
        self
    }

    /// Normalize a non-2xx response.
    ///
    /// Understands the common error body layouts: `{message, code}`,
    /// `{error: "..."}`, `{error: {message, code}}` and
    /// `{errors: [{errorCode, errorReason}]}`. The request id comes from the
    /// `x-request-id` header, falling back to a `requestId` body field.
    pub fn from_response(response: &HttpResponse) -> Self {
        Self::from_response_named(Self::HTTP_ERROR, response)
    }

    pub fn from_response_named(name: &str, response: &HttpResponse) -> Self {
        let body: Option<JsonValue> = serde_json::from_slice(&response.body).ok();
        let detail = body.as_ref().map(ErrorDetail::extract).unwrap_or_default();

        let message = detail
            .message
            .unwrap_or_else(|| format!("request failed with status {}", response.status));
        let mut err = Self::new(name, message).with_status(response.status);
        err.code = detail.code;
        err.request_id = response
            .header(REQUEST_ID_HEADER)
            .map(str::to_string)
            .or(detail.request_id);
        err.original_error = match body {
            Some(value) => Some(value),
            None if response.body.is_empty() => None,
            None => Some(JsonValue::String(response.text())),
        };
        err
    }

    /// A response arrived but did not match the declared output schema.
    pub fn response_validation(error: &ValidationError, response: &HttpResponse) -> Self {
        let mut err = Self::new(Self::RESPONSE_VALIDATION_ERROR, error.to_string())
            .with_status(response.status);
        err.request_id = response.header(REQUEST_ID_HEADER).map(str::to_string);
        err
    }
}

#[derive(Debug, Default)]
struct ErrorDetail {
    message: Option<String>,
    code: Option<String>,
    request_id: Option<String>,
}

impl ErrorDetail {
    fn extract(body: &JsonValue) -> Self {
        let first_error = body.get("errors").and_then(|e| e.get(0));
        let nested = body.get("error").filter(|e| e.is_object());

        let message = text(body.get("message"))
            .or_else(|| text(body.get("error")))
            .or_else(|| nested.and_then(|e| text(e.get("message"))))
            .or_else(|| first_error.and_then(|e| text(e.get("errorReason"))))
            .or_else(|| first_error.and_then(|e| text(e.get("message"))));
        let code = scalar(body.get("code"))
            .or_else(|| scalar(body.get("errorCode")))
            .or_else(|| nested.and_then(|e| scalar(e.get("code"))))
            .or_else(|| first_error.and_then(|e| scalar(e.get("errorCode"))));
        let request_id = text(body.get("requestId"));

        Self {
            message,
            code,
            request_id,
        }
    }
}

fn text(value: Option<&JsonValue>) -> Option<String> {
    value.and_then(JsonValue::as_str).map(str::to_string)
}

fn scalar(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl From<TransportError> for ApiError {
    fn from(value: TransportError) -> Self {
        let name = match value {
            TransportError::Timeout(_) => Self::TIMEOUT_ERROR,
            _ => Self::NETWORK_ERROR,
        };
        let detail = value.detail().to_string();
        Self::new(name, value.to_string()).with_original(JsonValue::String(detail))
    }
}

/// Returns true iff `value` has the [`ApiError`] shape.
///
/// `name` and `message` must be strings; `statusCode` must be absent, null or
/// an integer that fits a `u16` status; `code` and `requestId` must be absent, null or
/// strings. Anything else (including non-objects) is not a command error.
pub fn is_command_error(value: &JsonValue) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let is_string = |key: &str| obj.get(key).is_some_and(JsonValue::is_string);
    let is_optional_string = |key: &str| match obj.get(key) {
        None | Some(JsonValue::Null) => true,
        Some(v) => v.is_string(),
    };
    let status_ok = match obj.get("statusCode") {
        None | Some(JsonValue::Null) => true,
        Some(v) => v.as_u64().is_some_and(|s| u16::try_from(s).is_ok()),
    };

    is_string("name")
        && is_string("message")
        && status_ok
        && is_optional_string("code")
        && is_optional_string("requestId")
}

/// Failure raised by a middleware hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("middleware '{middleware}' failed: {message}")]
pub struct MiddlewareError {
    pub middleware: String,
    pub message: String,
}

impl MiddlewareError {
    pub fn new(middleware: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            middleware: middleware.into(),
            message: message.into(),
        }
    }
}

/// Error returned by command execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Middleware(#[from] MiddlewareError),
}

impl CommandError {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            CommandError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.api_error().and_then(|e| e.status_code)
    }

    /// Short label of the error kind, used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Validation(_) => "validation",
            CommandError::Api(_) => "api",
            CommandError::Middleware(_) => "middleware",
        }
    }
}
