//! Error body returned by the REST backend
//!
//! The backend answers failed requests with a JSON object carrying at least a
//! `message`. Some handlers add a `code` or validation `details`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error response body
///
/// ```json
/// { "message": "Only 2 tables remain available for that slot." }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiErrorBody {
    /// Human-readable reason, surfaced verbatim to the user
    pub message: String,
    /// Optional machine-readable code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Optional validation details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Parse a response body, accepting only bodies with a non-blank message
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|b| !b.message.trim().is_empty())
    }
}
