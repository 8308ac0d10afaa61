//! Client error types

use thiserror::Error;

/// Result type alias for dashboard client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error type for dashboard client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-success response returned by the API. `detail` is the message the
    /// server put in the error body, if any; `message` falls back to the raw
    /// body or the status reason.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    /// Request never produced a response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required form field is missing or blank
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// A protected action was attempted without a session token
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is an authentication error (401)
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. } | ClientError::Unauthenticated)
    }
}
