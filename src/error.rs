use serde_json::{json, Value};
use thiserror::Error;

/// Failures of a single call through the transport adapter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a non-success status. `body` is the parsed
    /// error body, `Null` when there was none.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String, body: Value },
    #[error("Session expired: {message}")]
    SessionExpired { message: String },
    #[error("Request cancelled: {reason}")]
    Cancelled { reason: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// API error whose body carries only `message`.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        TransportError::Api {
            status,
            body: json!({ "message": message }),
            message,
        }
    }

    /// Status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Api { status, .. } => Some(*status),
            TransportError::SessionExpired { .. } => Some(401),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Decode(e.to_string())
    }
}

/// Shorthand for results coming back from the transport and services.
pub type ApiResult<T> = Result<T, TransportError>;

/// Errors surfaced by resource stores and the typed clients.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Errors from the admin login flow.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Please fill in all fields")]
    MissingCredentials,
    #[error("{0}")]
    Rejected(String),
    #[error("Access denied. Admin privileges required.")]
    NotAdmin,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}
