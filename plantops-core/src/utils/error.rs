//! Conversions into the shared error code system

use plantops_client::ClientError;
use shared::error::{AppError, ErrorCode};

use crate::approval::ApprovalError;
use crate::store::StoreError;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Transport(ClientError::Timeout) => AppError::new(ErrorCode::TimeoutError),
            StoreError::Transport(e) => AppError::transport(e.to_string()),
            StoreError::Rejected(msg) => AppError::rejected(msg),
            StoreError::Validation(msg) => AppError::validation(msg),
            StoreError::UnknownPlant(plant) => {
                AppError::new(ErrorCode::UnknownPlant).with_detail("plant", plant.as_str())
            }
        }
    }
}

impl From<ApprovalError> for AppError {
    fn from(err: ApprovalError) -> Self {
        let message = err.to_string();
        match err {
            ApprovalError::ReasonRequired => AppError::new(ErrorCode::ReasonRequired),
            ApprovalError::InvalidTarget(_) => AppError::with_message(ErrorCode::ValidationFailed, message),
            ApprovalError::ApprovalNotRequired { action, .. } => {
                AppError::with_message(ErrorCode::ApprovalNotRequired, message)
                    .with_detail("action", action.as_str())
            }
            ApprovalError::Forbidden(_) => AppError::forbidden(message),
            ApprovalError::NotFound(id) => {
                AppError::with_message(ErrorCode::RequestNotFound, message).with_detail("request_id", id)
            }
            ApprovalError::NotPending { id, .. } => {
                AppError::with_message(ErrorCode::RequestNotPending, message).with_detail("request_id", id)
            }
            ApprovalError::NotRecorded(_) => AppError::with_message(ErrorCode::RequestNotRecorded, message),
            ApprovalError::ReplayFailed { request_id, .. } => {
                AppError::with_message(ErrorCode::ReplayFailed, message).with_detail("request_id", request_id)
            }
            ApprovalError::ResolutionNotRecorded {
                request_id, applied, ..
            } => AppError::with_message(ErrorCode::ResolutionNotRecorded, message)
                .with_detail("request_id", request_id)
                .with_detail("applied", applied),
            ApprovalError::Store(e) => e.into(),
        }
    }
}
