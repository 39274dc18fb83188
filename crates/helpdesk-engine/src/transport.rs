//! Wire contract with the remote assistant service.
//!
//! One `POST /api/chat` per submitted turn. Every failure mode is reported as
//! a [`TransportError`]; the controller decides what the user sees.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WidgetConfig;

/// Outbound body of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user text.
    pub message: String,
    /// Session to continue, or `null` for a new conversation.
    pub session_id: Option<String>,
}

/// Success body of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant text to display.
    pub response: String,
    /// Session id to carry forward.
    pub session_id: String,
    /// ISO-8601 time of the reply, used verbatim.
    pub timestamp: String,
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request could not be completed.
    Transport,
    /// The service answered with a non-success status.
    Service,
    /// The body did not match the response shape.
    Contract,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Service => write!(f, "service"),
            Self::Contract => write!(f, "contract"),
        }
    }
}

/// Errors that can occur when talking to the assistant service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Non-success HTTP status.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Success status, but the body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Failure raised by a non-HTTP transport.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Request(_) | Self::Other(_) => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Service,
            Self::Decode(_) => FailureKind::Contract,
        }
    }
}

/// Something that can carry a [`ChatRequest`] to the assistant.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver one turn and wait for the reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}

/// [`ChatTransport`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    chat_url: String,
    health_url: String,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: &WidgetConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Request)?;
        Ok(Self {
            client,
            chat_url: config.chat_url(),
            health_url: config.health_url(),
        })
    }

    /// Query the service health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(TransportError::Request)?;
        decode(response).await
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        debug!(url = %self.chat_url, has_session = request.session_id.is_some(), "sending chat turn");
        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(TransportError::Request)?;
        decode(response).await
    }
}

/// Check the status, then decode the body as `T`.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(TransportError::Request)?;
    serde_json::from_slice(&bytes).map_err(TransportError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_null_session() {
        let request = ChatRequest {
            message: "Hello".into(),
            session_id: None,
        };
        insta::assert_json_snapshot!(request, @r#"
        {
          "message": "Hello",
          "session_id": null
        }
        "#);
    }

    #[test]
    fn test_response_requires_all_fields() {
        let ok: Result<ChatResponse, _> = serde_json::from_str(
            r#"{"response":"Hi!","session_id":"s1","timestamp":"2024-05-01T10:00:00"}"#,
        );
        assert!(ok.is_ok());

        let missing: Result<ChatResponse, _> =
            serde_json::from_str(r#"{"response":"Hi!","timestamp":"2024-05-01T10:00:00"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_error_kinds() {
        let status = TransportError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(status.kind(), FailureKind::Service);
        assert!(status.to_string().contains("HTTP 500"));

        let decode = TransportError::Decode(serde_json::from_str::<ChatResponse>("{}").unwrap_err());
        assert_eq!(decode.kind(), FailureKind::Contract);

        assert_eq!(
            TransportError::Other("offline".into()).kind(),
            FailureKind::Transport
        );
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status":"healthy","service":"AI Customer Support Agent"}"#)
                .unwrap();
        assert!(health.is_healthy());
    }
}
