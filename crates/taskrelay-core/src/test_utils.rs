//! Test helpers: a throwaway HTTP server that records what it receives.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;

/// One request seen by the capture server.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Canned reply chosen per request path.
pub type Responder = fn(&str) -> (StatusCode, String);

#[derive(Clone)]
struct CaptureState {
    seen: Arc<Mutex<Vec<Captured>>>,
    responder: Responder,
}

/// Handle to a running capture server.
pub struct CaptureServer {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureServer {
    /// Starts a server answering every request with `responder(path)`.
    pub async fn start(responder: Responder) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = CaptureState {
            seen: seen.clone(),
            responder,
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            seen,
        }
    }

    /// Starts a server that always replies with `status` and `body`.
    pub async fn replying(status: StatusCode) -> Self {
        match status.as_u16() {
            200 => Self::start(|_| (StatusCode::OK, "ok".to_string())).await,
            204 => Self::start(|_| (StatusCode::NO_CONTENT, String::new())).await,
            404 => Self::start(|_| (StatusCode::NOT_FOUND, "workflow not found".to_string())).await,
            502 => Self::start(|_| (StatusCode::BAD_GATEWAY, "upstream down".to_string())).await,
            other => panic!("no canned reply for {}", other),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<CaptureState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    let reply = (state.responder)(&path);
    state.seen.lock().unwrap().push(Captured {
        method,
        path,
        headers,
        body,
    });
    reply
}
