//! Error types for the Claviz client.

use thiserror::Error;

/// Result type alias for Claviz client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Claviz client.
#[derive(Error, Debug)]
pub enum Error {
    // ===== Transport Errors =====
    #[error("API error: {status} {status_text} - {message}")]
    Api {
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // ===== Authentication Errors =====
    #[error("Authentication error: {0}")]
    Auth(String),

    // ===== Function Execution Errors =====
    #[error("Function execution failed: {0}")]
    FunctionFailed(serde_json::Value),

    #[error("Canceled")]
    Canceled,

    // ===== I/O Errors =====
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ===== Internal Errors =====
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an API error from HTTP response details.
    pub fn api(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            status_text: status_text.into(),
            message: message.into(),
        }
    }

    /// HTTP status code of a non-2xx response, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the caller's cancellation token ended the operation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Error payload reported by a failed remote function instance.
    pub fn function_error(&self) -> Option<&serde_json::Value> {
        match self {
            Self::FunctionFailed(payload) => Some(payload),
            _ => None,
        }
    }
}
