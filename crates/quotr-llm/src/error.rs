use std::time::Duration;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no API key configured for {provider}")]
    MissingApiKey { provider: String },

    #[error("{provider} rejected the API key (status {status})")]
    Unauthorized { provider: String, status: StatusCode },

    #[error("rate limited")]
    RateLimited,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{provider} API request failed (status {status})")]
    Api { provider: String, status: StatusCode },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: String },

    #[error("{0}")]
    Other(String),
}

impl LlmError {
    /// Whether the failure happened before a response could be read
    /// (connect failure, transport timeout, broken body).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request() || e.is_body(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
