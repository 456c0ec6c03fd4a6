//! # NeXO Data Client
//!
//! Wrapper around the read-only NeXO data service. Every `Request` the
//! engine issues maps to one GET; bodies are decoded by the engine.

use nexo_core::{AppConfig, FetchFailure, NexoError, Request, Response};
use serde_json::Value;

/// Errors from the HTTP client layer.
#[derive(Debug)]
pub enum ClientError {
    /// The base URL cannot carry path segments.
    InvalidUrl(String),
    /// Cannot reach the data service.
    ConnectionFailed(String),
    /// The request did not complete in time.
    Timeout,
    /// The data service answered with a non-success status.
    Status(u16),
    /// Failed to parse response body.
    ParseError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "Invalid data service URL: {url}"),
            Self::ConnectionFailed(msg) => write!(f, "Cannot connect to data service: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Status(status) => write!(f, "Data service returned status {status}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ClientError> for FetchFailure {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Timeout => Self::Timeout,
            ClientError::InvalidUrl(msg) | ClientError::ConnectionFailed(msg) => Self::Network(msg),
            ClientError::Status(code) => Self::Status(code),
            ClientError::ParseError(msg) => Self::Malformed(msg),
        }
    }
}

/// HTTP client for the NeXO data endpoints.
#[derive(Debug, Clone)]
pub struct NexoClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
}

impl NexoClient {
    /// Create a client pointing at the given data service URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed =
            reqwest::Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build the URL for a list of path segments. Segments are
    /// percent-encoded, so ids like `GO:0005737` and multi-word queries
    /// stay intact.
    pub fn url(&self, segments: &[String]) -> Result<reqwest::Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document. An empty body reads as `null`.
    pub async fn get_json(&self, segments: &[String]) -> Result<Value, ClientError> {
        let url = self.url(segments)?;
        tracing::debug!(url = %url, "GET");

        let resp = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::ConnectionFailed(format!("{}: {e}", self.base_url))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::ParseError(e.to_string())
            }
        })?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::ParseError(e.to_string()))
    }

    /// Execute an engine request and decode its response.
    pub async fn execute(&self, request: &Request) -> Result<Response, FetchFailure> {
        let body = self.get_json(&request.segments()).await?;
        Response::decode(request, body)
    }

    /// GET /app-config.json → validated network configuration.
    pub async fn fetch_config(&self) -> Result<AppConfig, NexoError> {
        let body = self
            .get_json(&["app-config.json".to_string()])
            .await
            .map_err(|e| NexoError::Fetch(e.into()))?;
        let config: AppConfig = serde_json::from_value(body)
            .map_err(|e| NexoError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================
