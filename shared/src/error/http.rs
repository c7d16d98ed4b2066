//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::UserNotFound | Self::RequestNotFound | Self::SettingsNotFound => {
                StatusCode::NOT_FOUND
            }

            Self::UserLoginExists => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            Self::AdminRequired | Self::CannotModifySelf | Self::NotRequestOwner => {
                StatusCode::FORBIDDEN
            }

            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,

            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // Validation and business rules
            Self::ValidationFailed
            | Self::CurrentPasswordInvalid
            | Self::RequestNotDeletable
            | Self::SubmissionWindowClosed => StatusCode::BAD_REQUEST,
        }
    }
}
