//! Client error types

use thiserror::Error;

/// Transport-level error for requests against the restaurant API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a structured error body
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Reason suitable for showing to a user.
    ///
    /// Server-provided messages are returned verbatim; transport failures and
    /// bodies without a usable message fall back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = match self {
            ClientError::Api { message, .. } => Some(message.as_str()),
            ClientError::Validation(m) | ClientError::Forbidden(m) | ClientError::NotFound(m) => {
                Some(m.as_str())
            }
            _ => None,
        };
        match message.map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
