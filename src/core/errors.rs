use serde::Deserialize;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: status {status} - {body}")]
    ApiError { status: u16, body: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("WebSocket error: {0}")]
    WebSocketError(#[from] tungstenite::Error),

    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Read error: {0}")]
    ReadError(#[from] ReadError),

    #[error("Protocol error: unrecognized event type {event_type:?}")]
    ProtocolError { event_type: String },
}

impl ExchangeError {
    /// Structured error carried in the body of a non-2xx response, if the
    /// exchange sent one.
    pub fn api_error_body(&self) -> Option<ApiErrorBody> {
        match self {
            Self::ApiError { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when a stream read failed because the connection is gone.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ReadError(ReadError::Closed))
    }
}

/// Error payload returned by the exchange, e.g. `{"code":-1121,"msg":"Invalid symbol."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{record}: at least {expected} fields are expected but got {actual}")]
    FieldCount {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{record}: field {index} is not a valid integer: {token:?}")]
    InvalidInteger {
        record: &'static str,
        index: usize,
        token: String,
    },

    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("connection is closed")]
    Closed,

    #[error("socket failure: {0}")]
    Socket(#[source] tungstenite::Error),

    #[error("failed to decode frame: {0}")]
    Decode(#[from] serde_json::Error),
}
