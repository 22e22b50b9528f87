// File: ./src/client/error.rs
use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: the access token was rejected")]
    Unauthorized,

    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Payload failed validation: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Access token is not a valid header value")]
    InvalidToken,

    #[error("TLS setup failed: {0}")]
    Tls(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}
