//! Store error types

use plantops_client::ClientError;
use shared::models::Plant;
use thiserror::Error;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data service could not be reached or answered garbage
    #[error("Data service error: {0}")]
    Transport(#[from] ClientError),

    /// The data service refused the request; message kept verbatim
    #[error("{0}")]
    Rejected(String),

    /// Request was malformed before any remote call
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown plant: {0}")]
    UnknownPlant(Plant),
}

impl StoreError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnknownPlant(_))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
