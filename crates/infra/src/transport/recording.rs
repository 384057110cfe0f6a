use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde_json::json;

use corebank_core::HttpMethod;

use super::{HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    Failure(TransportError),
}

#[derive(Debug, Clone)]
struct Route {
    method: HttpMethod,
    path: String,
    reply: Reply,
}

/// Scripted in-memory transport that records every request it receives.
///
/// Routes match on method and exact URL path; the most recently registered
/// match wins. Unmatched requests get a `404` with a JSON error body.
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    routes: RwLock<Vec<Route>>,
    calls: RwLock<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `response`.
    pub fn respond(self, method: HttpMethod, path: &str, response: HttpResponse) -> Self {
        self.route(method, path, Reply::Response(response))
    }

    /// Fail `method path` with a transport error.
    pub fn fail(self, method: HttpMethod, path: &str, error: TransportError) -> Self {
        self.route(method, path, Reply::Failure(error))
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace (or add) the answer of a route after construction.
    pub fn set_response(&self, method: HttpMethod, path: &str, response: HttpResponse) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Route {
                method,
                path: path.to_string(),
                reply: Reply::Response(response),
            });
    }

    fn route(self, method: HttpMethod, path: &str, reply: Reply) -> Self {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Route {
                method,
                path: path.to_string(),
                reply,
            });
        self
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of requests received for `method path`.
    pub fn calls_to(&self, method: HttpMethod, path: &str) -> usize {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.method == method && r.url.path() == path)
            .count()
    }

    /// The most recent request, if any.
    pub fn last_call(&self) -> Option<HttpRequest> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self
            .routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|r| r.method == request.method && r.path == request.url.path())
            .map(|r| r.reply.clone());

        let unmatched = format!("no route for {} {}", request.method, request.url.path());
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(error)) => Err(error),
            None => Ok(HttpResponse::json(404, &json!({ "message": unmatched }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn get(path: &str) -> HttpRequest {
        let url = Url::parse("http://bank.test").unwrap().join(path).unwrap();
        HttpRequest::new(HttpMethod::Get, url)
    }

    #[tokio::test]
    async fn answers_matching_route_and_records_calls() {
        let transport = RecordingTransport::new().respond(
            HttpMethod::Get,
            "/clients/1",
            HttpResponse::json(200, &json!({ "id": "1" })),
        );

        let response = transport.send(get("/clients/1")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.calls_to(HttpMethod::Get, "/clients/1"), 1);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn unmatched_requests_get_404() {
        let transport = RecordingTransport::new();
        let response = transport.send(get("/nope")).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(response.text().contains("/nope"));
    }

    #[tokio::test]
    async fn latest_route_wins_and_failures_are_returned() {
        let transport = RecordingTransport::new()
            .respond(HttpMethod::Get, "/x", HttpResponse::empty(200))
            .fail(HttpMethod::Get, "/x", TransportError::Connect("refused".to_string()));

        let err = transport.send(get("/x")).await.unwrap_err();
        assert_eq!(err, TransportError::Connect("refused".to_string()));

        transport.set_response(HttpMethod::Get, "/x", HttpResponse::empty(204));
        assert_eq!(transport.send(get("/x")).await.unwrap().status, 204);
    }
}
