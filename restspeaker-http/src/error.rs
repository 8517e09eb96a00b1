//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors raised while building, sending or reading an HTTP exchange.
///
/// The REST layer forwards these unchanged.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A request option had an unusable shape or value.
    #[error("Invalid request option '{key}': {message}")]
    InvalidOption {
        /// Option key, e.g. `headers`.
        key: String,
        /// What was wrong with it.
        message: String,
    },

    /// Request building error.
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// Response body could not be decoded.
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// The mock transport ran out of queued replies.
    #[error("Mock transport has no queued response for {method} {uri}")]
    MockExhausted {
        /// Method of the unanswered request.
        method: String,
        /// URI of the unanswered request.
        uri: String,
    },

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TransportError {
    pub(crate) fn invalid_option(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_)) || matches!(self, Self::Http(e) if e.is_connect())
    }
}
