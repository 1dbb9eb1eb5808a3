//! Test helpers: router fixtures and a fake downstream webhook.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use axum_test::TestServer;
use serde_json::Value;
use taskrelay_core::{ForwardTarget, RelayConfig};

use crate::config::ApiConfig;
use crate::router::create_router;
use crate::state::AppState;

/// Router with no signature check, optionally forwarding to `endpoint`.
pub fn test_server(endpoint: Option<String>, api_key: Option<&str>) -> TestServer {
    let relay = RelayConfig::new(ForwardTarget {
        endpoint,
        api_key: api_key.map(str::to_string),
    });
    TestServer::new(create_router(AppState::new(ApiConfig::default(), relay))).unwrap()
}

/// Router that requires signatures under `secret`.
pub fn signed_server(endpoint: String, secret: &str) -> TestServer {
    let relay = RelayConfig::new(ForwardTarget::new(endpoint)).with_secret(secret);
    TestServer::new(create_router(AppState::new(ApiConfig::default(), relay))).unwrap()
}

#[derive(Clone)]
struct Inbox {
    status: StatusCode,
    bodies: Arc<Mutex<Vec<Value>>>,
    authorization: Arc<Mutex<Option<String>>>,
}

/// Fake downstream webhook bound to a local port.
pub struct Downstream {
    addr: String,
    inbox: Inbox,
}

impl Downstream {
    /// Starts a downstream answering every POST with `status`.
    pub async fn start(status: StatusCode) -> Self {
        let inbox = Inbox {
            status,
            bodies: Arc::new(Mutex::new(Vec::new())),
            authorization: Arc::new(Mutex::new(None)),
        };
        let app = Router::new()
            .route("/hook", post(accept))
            .with_state(inbox.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, inbox }
    }

    pub fn url(&self) -> String {
        format!("http://{}/hook", self.addr)
    }

    /// JSON bodies received so far.
    pub fn received(&self) -> Vec<Value> {
        self.inbox.bodies.lock().unwrap().clone()
    }

    /// Authorization header of the last request.
    pub fn authorization(&self) -> Option<String> {
        self.inbox.authorization.lock().unwrap().clone()
    }
}

async fn accept(
    State(inbox): State<Inbox>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    *inbox.authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    inbox.bodies.lock().unwrap().push(body);
    inbox.status
}
