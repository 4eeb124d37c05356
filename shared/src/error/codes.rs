//! Unified error codes for PlantOps
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Approval workflow errors
//! - 5xxx: Plant routing errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for compact serialization
/// and cross-language compatibility with the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Role is view-only
    ViewOnlyRole = 2002,
    /// Reviewer lacks authority for this action
    ReviewNotAllowed = 2003,

    // ==================== 4xxx: Approval ====================
    /// Approval request not found
    RequestNotFound = 4001,
    /// Approval request already resolved
    RequestNotPending = 4002,
    /// Approval reason is required
    ReasonRequired = 4003,
    /// Actor may mutate directly, approval not required
    ApprovalNotRequired = 4004,
    /// Approval request could not be recorded
    RequestNotRecorded = 4005,
    /// Approved mutation failed to apply
    ReplayFailed = 4006,
    /// Resolution could not be persisted
    ResolutionNotRecorded = 4007,

    // ==================== 5xxx: Plant ====================
    /// Plant is not registered
    UnknownPlant = 5001,
    /// Record has no plant tag
    PlantRequired = 5002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Data service unreachable or malformed response
    TransportError = 9002,
    /// Data service rejected the request
    BackendRejected = 9003,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ViewOnlyRole => "Role is view-only",
            ErrorCode::ReviewNotAllowed => "Not allowed to review this request",

            // Approval
            ErrorCode::RequestNotFound => "Approval request not found",
            ErrorCode::RequestNotPending => "Approval request is no longer pending",
            ErrorCode::ReasonRequired => "A reason is required",
            ErrorCode::ApprovalNotRequired => "Approval is not required for this actor",
            ErrorCode::RequestNotRecorded => "Approval request could not be recorded",
            ErrorCode::ReplayFailed => "Request was approved but failed to apply",
            ErrorCode::ResolutionNotRecorded => "Resolution could not be recorded",

            // Plant
            ErrorCode::UnknownPlant => "Plant is not registered",
            ErrorCode::PlantRequired => "Record has no plant",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::TransportError => "Data service unreachable",
            ErrorCode::BackendRejected => "Data service rejected the request",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::ViewOnlyRole),
            2003 => Ok(ErrorCode::ReviewNotAllowed),

            // Approval
            4001 => Ok(ErrorCode::RequestNotFound),
            4002 => Ok(ErrorCode::RequestNotPending),
            4003 => Ok(ErrorCode::ReasonRequired),
            4004 => Ok(ErrorCode::ApprovalNotRequired),
            4005 => Ok(ErrorCode::RequestNotRecorded),
            4006 => Ok(ErrorCode::ReplayFailed),
            4007 => Ok(ErrorCode::ResolutionNotRecorded),

            // Plant
            5001 => Ok(ErrorCode::UnknownPlant),
            5002 => Ok(ErrorCode::PlantRequired),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::TransportError),
            9003 => Ok(ErrorCode::BackendRejected),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
