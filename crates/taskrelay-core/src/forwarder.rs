//! Delivery of canonical records to the downstream webhook.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

use crate::config::ForwardTarget;
use crate::error::{RelayError, Result};
use crate::record::CanonicalRecord;

/// User agent sent with every delivery.
const RELAY_USER_AGENT: &str = concat!("taskrelay/", env!("CARGO_PKG_VERSION"));

/// Successful downstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    /// 2xx status returned downstream.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: String,
}

/// Sends records to a [`ForwardTarget`].
///
/// Holds no per-record state; one instance can serve concurrent
/// requests. Failed deliveries are reported, never retried.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    target: ForwardTarget,
}

impl Forwarder {
    /// Creates a forwarder with a fresh HTTP client.
    pub fn new(target: ForwardTarget) -> Self {
        Self::with_client(reqwest::Client::new(), target)
    }

    /// Creates a forwarder reusing an existing client.
    pub fn with_client(client: reqwest::Client, target: ForwardTarget) -> Self {
        Self { client, target }
    }

    /// Returns the configured target.
    pub fn target(&self) -> &ForwardTarget {
        &self.target
    }

    /// Posts `record` as JSON to the target endpoint.
    ///
    /// # Errors
    /// - [`RelayError::Configuration`] if no usable endpoint is configured
    /// - [`RelayError::Transport`] if the request gets no response
    /// - [`RelayError::Delivery`] on a non-2xx response
    pub async fn forward(&self, record: &CanonicalRecord) -> Result<DeliveryResult> {
        let endpoint = endpoint_url(&self.target)?;

        let mut request = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, RELAY_USER_AGENT)
            .json(record);

        if let Some(key) = self.target.api_key.as_deref() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    status = status.as_u16(),
                    error = %e,
                    "Failed to read downstream response body"
                );
                String::new()
            }
        };

        if !status.is_success() {
            warn!(status = status.as_u16(), "Downstream rejected record");
            return Err(RelayError::Delivery {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Record delivered");
        Ok(DeliveryResult {
            status: status.as_u16(),
            body,
        })
    }
}

fn endpoint_url(target: &ForwardTarget) -> Result<Url> {
    let raw = target
        .endpoint
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| RelayError::Configuration("N8N_WEBHOOK_URL is required".to_string()))?;

    let url = Url::parse(raw)
        .map_err(|e| RelayError::Configuration(format!("invalid endpoint URL: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::Configuration(format!(
            "unsupported endpoint scheme: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Priority;
    use crate::test_utils::CaptureServer;
    use axum::http::{Method, StatusCode};

    fn record() -> CanonicalRecord {
        CanonicalRecord {
            project_name: "Launch".into(),
            project_description: "No description provided".into(),
            completion_date: "2024-06-30".into(),
            team_members: vec!["Ada".into()],
            deliverables: vec![],
            source_id: "abc".into(),
            source_url: "https://notion.so/abc".into(),
            priority: Priority::High,
            category: "general".into(),
        }
    }

    #[tokio::test]
    async fn test_forward_posts_json() {
        let server = CaptureServer::replying(StatusCode::OK).await;
        let forwarder = Forwarder::new(ForwardTarget::new(server.url("/webhook/done")));

        let result = forwarder.forward(&record()).await.unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.body, "ok");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/webhook/done");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.header("user-agent").unwrap().starts_with("taskrelay/"));
        assert!(req.header("authorization").is_none());

        let body = req.json();
        assert_eq!(body["projectName"], "Launch");
        assert_eq!(body["priority"], "high");
        assert_eq!(body["teamMembers"][0], "Ada");
    }

    #[tokio::test]
    async fn test_forward_sends_bearer_key() {
        let server = CaptureServer::replying(StatusCode::NO_CONTENT).await;
        let target = ForwardTarget::new(server.url("/hook")).with_api_key("n8n-key");
        let forwarder = Forwarder::new(target);

        let result = forwarder.forward(&record()).await.unwrap();
        assert_eq!(result.status, 204);
        assert_eq!(
            server.requests()[0].header("authorization"),
            Some("Bearer n8n-key")
        );
    }

    #[tokio::test]
    async fn test_non_2xx_is_delivery_error() {
        let server = CaptureServer::replying(StatusCode::NOT_FOUND).await;
        let forwarder = Forwarder::new(ForwardTarget::new(server.url("/hook")));

        match forwarder.forward(&record()).await {
            Err(RelayError::Delivery { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "workflow not found");
            }
            other => panic!("expected delivery error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Drain the full request so closing the socket does not reset it.
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            socket
                .write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\n\r\npartial")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let forwarder = Forwarder::new(ForwardTarget::new(format!("http://{}/hook", addr)));
        match forwarder.forward(&record()).await {
            Err(RelayError::Delivery { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.is_empty());
            }
            other => panic!("expected delivery error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_configuration_error() {
        let forwarder = Forwarder::new(ForwardTarget::default());
        let err = forwarder.forward(&record()).await.unwrap_err();
        assert!(matches!(err, RelayError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let forwarder = Forwarder::new(ForwardTarget::new(format!("http://{}/hook", addr)));
        let err = forwarder.forward(&record()).await.unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(endpoint_url(&ForwardTarget::new("https://n8n.example.com/webhook")).is_ok());
        assert!(matches!(
            endpoint_url(&ForwardTarget::new("   ")),
            Err(RelayError::Configuration(_))
        ));
        assert!(matches!(
            endpoint_url(&ForwardTarget::new("not a url")),
            Err(RelayError::Configuration(_))
        ));
        assert!(matches!(
            endpoint_url(&ForwardTarget::new("ftp://example.com/drop")),
            Err(RelayError::Configuration(_))
        ));
    }
}
