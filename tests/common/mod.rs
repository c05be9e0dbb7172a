//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Response, StatusCode, Uri};
use axum::Router;
use laserkongen_proxy::{HttpServer, ProxyConfig, Shutdown};
use tokio::net::TcpListener;

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
struct BackendState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    reply: Arc<Mutex<(u16, String)>>,
}

/// A programmable backend double that records every call it receives.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: BackendState,
}

impl MockBackend {
    /// Start a backend answering every request with `status` and `body`.
    pub async fn start(status: u16, body: &str) -> Self {
        let state = BackendState {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(Mutex::new((status, body.to_string()))),
        };

        let app = Router::new().fallback(record).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_reply(&self, status: u16, body: &str) {
        *self.state.reply.lock().unwrap() = (status, body.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls().pop().expect("backend was never called")
    }
}

async fn record(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response<Body> {
    let text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.calls.lock().unwrap().push(RecordedCall {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: text(header::AUTHORIZATION),
        content_type: text(header::CONTENT_TYPE),
        request_id: text(header::HeaderName::from_static("x-request-id")),
        body,
    });

    let (status, body) = state.reply.lock().unwrap().clone();
    Response::builder()
        .status(StatusCode::from_u16(status).unwrap())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// A URL nothing is listening on.
pub async fn unreachable_backend_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// A running proxy pointed at `backend_url`.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub async fn start(backend_url: &str) -> Self {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.backend.base_url = backend_url.to_string();
        config.backend.timeout_secs = 5;
        config.observability.metrics_enabled = false;
        Self::start_with(config).await
    }

    pub async fn start_with(config: ProxyConfig) -> Self {
        let server = HttpServer::new(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Status and parsed JSON body of a proxy response.
pub async fn json(response: reqwest::Response) -> (u16, serde_json::Value) {
    let status = response.status().as_u16();
    let body = response.json().await.unwrap();
    (status, body)
}
