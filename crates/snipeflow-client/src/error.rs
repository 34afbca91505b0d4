//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-success status from the backend, tagged with the caller's operation
    #[error("ERROR: {operation}")]
    RequestFailed { operation: String },

    #[error("Unexpected response body for {operation}: not a page envelope")]
    UnexpectedBody { operation: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn request_failed(operation: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation: operation.into(),
        }
    }

    pub fn unexpected_body(operation: impl Into<String>) -> Self {
        Self::UnexpectedBody {
            operation: operation.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
