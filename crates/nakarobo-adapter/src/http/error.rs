/*
[INPUT]:  Error sources (HTTP transport, API envelopes, serialization, session storage)
[OUTPUT]: Structured error types with retry and auth hints
[POS]:    Error handling layer - unified error types for the API client
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the NakaRobo API client
#[derive(Error, Debug)]
pub enum NakaroboError {
    /// HTTP request could not be built or decoded
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request was sent but no response came back
    #[error("{0}")]
    Network(String),

    /// Server answered with an error envelope or a non-success status
    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// Server rejected the bearer token; local credentials have been cleared
    #[error("Session expired, please sign in again")]
    AuthorizationExpired,

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session file could not be read or written
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Request exceeded the client timeout
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl NakaroboError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NakaroboError::Http(_) | NakaroboError::Network(_) | NakaroboError::Timeout { .. }
        )
    }

    /// Check if error indicates the session is no longer valid
    pub fn is_auth_error(&self) -> bool {
        match self {
            NakaroboError::AuthorizationExpired => true,
            NakaroboError::Api { code, .. } => *code == 401,
            _ => false,
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        NakaroboError::Api {
            code: i64::from(status.as_u16()),
            message: message.into(),
        }
    }
}

/// Result type alias for NakaRobo client operations
pub type Result<T> = std::result::Result<T, NakaroboError>;
