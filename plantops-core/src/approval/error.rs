//! Approval workflow errors

use shared::models::{ActionType, RequestStatus};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("A reason is required")]
    ReasonRequired,

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Role {role} may {action} directly, approval is not required")]
    ApprovalNotRequired { role: String, action: ActionType },

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Approval request {0} not found")]
    NotFound(String),

    /// Already resolved, or another decision on it is in progress
    #[error("Approval request {id} is not pending ({})", describe(.status))]
    NotPending {
        id: String,
        status: Option<RequestStatus>,
    },

    #[error("Request could not be recorded: {0}")]
    NotRecorded(#[source] StoreError),

    /// Approved but the mutation failed; the request stays pending
    #[error("Request {request_id} was approved but failed to apply: {source}")]
    ReplayFailed {
        request_id: String,
        #[source]
        source: StoreError,
    },

    /// Decision taken but not persisted. `applied` tells whether the
    /// mutation already reached the store.
    #[error("Resolution of request {request_id} could not be recorded: {source}")]
    ResolutionNotRecorded {
        request_id: String,
        applied: bool,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn describe(status: &Option<RequestStatus>) -> &'static str {
    match status {
        Some(status) => status.as_str(),
        None => "decision in progress",
    }
}

impl ApprovalError {
    pub fn is_validation(&self) -> bool {
        match self {
            Self::ReasonRequired
            | Self::InvalidTarget(_)
            | Self::ApprovalNotRequired { .. }
            | Self::NotPending { .. } => true,
            Self::Store(e) => e.is_validation(),
            _ => false,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }
}

/// Result type for approval operations
pub type ApprovalResult<T> = Result<T, ApprovalError>;
