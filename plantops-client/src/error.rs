//! Client error types
//!
//! Every variant is a transport-level failure: the exchange did not produce a
//! well-formed [`DataResponse`](shared::data::DataResponse). Business
//! rejections travel inside the envelope and are not errors here.

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Non-success status without a data service envelope
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body could not be decoded as a data service envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Partition could not be reached
    #[error("Partition unreachable: {0}")]
    Unreachable(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
