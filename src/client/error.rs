//! Errors from the recognition API client

use thiserror::Error;

/// Errors that can occur when talking to the recognition API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Recognition API unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Request timeout")]
    Timeout,
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
