//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::RequestNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::RequestNotPending => StatusCode::CONFLICT,

            // 403 Forbidden
            Self::PermissionDenied | Self::ViewOnlyRole | Self::ReviewNotAllowed => {
                StatusCode::FORBIDDEN
            }

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::ReasonRequired
            | Self::ApprovalNotRequired
            | Self::UnknownPlant
            | Self::PlantRequired => StatusCode::BAD_REQUEST,

            // 422 Unprocessable Entity
            Self::BackendRejected => StatusCode::UNPROCESSABLE_ENTITY,

            // 502 Bad Gateway
            Self::TransportError
            | Self::RequestNotRecorded
            | Self::ReplayFailed
            | Self::ResolutionNotRecorded => StatusCode::BAD_GATEWAY,

            // 504 Gateway Timeout
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
        assert_eq!(ErrorCode::RequestNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::RequestNotPending.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ViewOnlyRole.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::ReasonRequired.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ReplayFailed.http_status(), StatusCode::BAD_GATEWAY);
    }
}
