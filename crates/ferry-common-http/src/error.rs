//! HTTP errors.

use reqwest::StatusCode;
use std::io;

/// Boxed error returned by body handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failed exchange with the remote end: no response was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request body is a one-shot stream and cannot be resent")]
    NotReplayable,
}

impl TransportError {
    /// Whether sending the same request again could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotReplayable)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(e)
        }
    }
}

/// Errors surfaced by forwarding and its helpers.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("transport failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("response has status: {status} and body: {}", quote_body(body))]
    Status { status: StatusCode, body: Vec<u8> },

    #[error("failed to read error response body: {0}")]
    BodyRead(#[source] io::Error),

    #[error("response handler failed: {0}")]
    Handler(#[source] BoxError),

    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request canceled")]
    Cancelled,
}

/// Quote a response body for display, escaping control and invalid bytes.
fn quote_body(body: &[u8]) -> String {
    match std::str::from_utf8(body) {
        Ok(text) => format!("{text:?}"),
        Err(_) => format!("\"{}\"", body.escape_ascii()),
    }
}

impl HttpError {
    /// The response status, for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the operation stopped because its cancellation signal fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
