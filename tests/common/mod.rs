//! Shared test harness: an in-process mock Claviz server.
//!
//! The server records every request it receives and answers through a
//! caller-supplied responder, so tests can assert on exact verbs, paths,
//! query strings and bodies.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use claviz_client::{ClavizClient, ClientConfig};

/// Token every mock-backed client is built with.
pub const TEST_TOKEN: &str = "Bearer test-token";

/// Poll interval used by mock-backed clients.
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when empty
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is(&self, method: &Method, path: &str) -> bool {
        self.method == *method && self.path == path
    }
}

/// Canned response.
pub struct MockResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl MockResponse {
    pub fn json(body: Value) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn with_status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }
}

type Responder = dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Arc<Responder>,
}

/// Mock server bound to an ephemeral local port.
pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        init_tracing();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: requests.clone(),
            responder: Arc::new(responder),
        };

        let app = Router::new().fallback(handle).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let url = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, requests }
    }

    /// Client pointed at this server with a short poll interval.
    pub fn client(&self) -> ClavizClient {
        let config =
            ClientConfig::new(self.url.clone(), TEST_TOKEN).with_poll_interval(TEST_POLL_INTERVAL);
        ClavizClient::with_config(config).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests matching `method` and `path`.
    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.is(method, path))
            .count()
    }

    /// The only request received; panics otherwise.
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request: {:?}", requests);
        requests.into_iter().next().unwrap()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };

    let request = RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        headers,
        body,
    };

    state.requests.lock().unwrap().push(request.clone());
    let response = (state.responder)(&request);

    match response.body {
        Some(body) => (response.status, Json(body)).into_response(),
        None => response.status.into_response(),
    }
}

/// Route test logs through the test writer; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
