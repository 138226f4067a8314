//! In-process mock of the DuckDB REST wrapper.
//!
//! Routes are matched on method and raw (still percent-encoded) path.
//! Every request is recorded, including ones that hit no route.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use duckrest_core::{ClientConfig, ClientOptions, DuckRestClient};
use parking_lot::Mutex;
use serde_json::Value;

pub const TOKEN: &str = "test-token";

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct MockRoute {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<HashMap<(Method, String), MockRoute>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for a mock server.
#[derive(Default)]
pub struct MockServerBuilder {
    routes: HashMap<(Method, String), MockRoute>,
}

impl MockServerBuilder {
    pub fn route(mut self, method: Method, path: &str, status: StatusCode, body: Value) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            MockRoute { status, body: body.to_string(), delay: None },
        );
        self
    }

    pub fn json(self, method: Method, path: &str, body: Value) -> Self {
        self.route(method, path, StatusCode::OK, body)
    }

    pub fn text(mut self, method: Method, path: &str, status: StatusCode, body: &str) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            MockRoute { status, body: body.to_string(), delay: None },
        );
        self
    }

    pub fn slow(mut self, method: Method, path: &str, delay: Duration, body: Value) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            MockRoute { status: StatusCode::OK, body: body.to_string(), delay: Some(delay) },
        );
        self
    }

    pub async fn start(self) -> MockServer {
        let state = MockState { routes: Arc::new(self.routes), requests: Arc::default() };
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer { base_url: format!("http://{addr}"), requests: state.requests }
    }
}

/// A running mock server.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder::default()
    }

    pub fn client(&self) -> DuckRestClient {
        DuckRestClient::new(&self.base_url, TOKEN)
    }

    pub fn client_with(&self, options: ClientOptions) -> DuckRestClient {
        DuckRestClient::with_options(ClientConfig::new(&self.base_url, TOKEN), options)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests.lock().last().cloned().unwrap()
    }
}

async fn handle(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header_str = |name: header::HeaderName| {
        parts.headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
    };
    let path = parts.uri.path().to_string();

    state.requests.lock().push(RecordedRequest {
        method: parts.method.clone(),
        path: path.clone(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        user_agent: header_str(header::USER_AGENT),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    let Some(route) = state.routes.get(&(parts.method, path)).cloned() else {
        return json_response(StatusCode::NOT_FOUND, r#"{"detail":"Not Found"}"#.to_string());
    };
    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }
    json_response(route.status, route.body)
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Body::from(body)).into_response()
}

/// A base URL on which nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
