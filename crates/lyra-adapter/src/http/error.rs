/*
[INPUT]:  Error sources (HTTP, API, serialization, signing, WebSocket, chain)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Lyra adapter
#[derive(Error, Debug)]
pub enum LyraError {
    /// A signing precondition was violated (key material, fixed-point input, expiry)
    #[error("Signing precondition violated: {0}")]
    Signing(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request did not complete in time
    #[error("Request timed out after {duration}s")]
    Timeout { duration: u64 },

    /// On-chain call failed
    #[error("Chain error: {0}")]
    Chain(String),
}

impl LyraError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LyraError::Http(_)
                | LyraError::Timeout { .. }
                | LyraError::WebSocket(_)
                | LyraError::InvalidResponse(_)
        )
    }

    /// Check if error is the signing precondition kind
    pub fn is_signing_error(&self) -> bool {
        matches!(self, LyraError::Signing(_))
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        LyraError::Api {
            code: i64::from(status.as_u16()),
            message: message.into(),
        }
    }

    pub(crate) fn signing(message: impl Into<String>) -> Self {
        LyraError::Signing(message.into())
    }
}

/// Result type alias for Lyra operations
pub type Result<T> = std::result::Result<T, LyraError>;
