//! Unified error handling.
//!
//! Every failure of the auth service is translated into one [`AppError`]
//! kind before it leaves the service. The HTTP transport maps each kind to a
//! status code; only `InvalidInput` and `BadRequest` carry caller-supplied
//! detail, everything else renders a fixed message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error kinds.
#[derive(Error, Debug)]
pub enum AppError {
    // Caller input
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    // Registration
    #[error("user with this email already exists")]
    DuplicateAccount,

    #[error("error while registering user")]
    RegistrationFailure,

    // Authentication
    #[error("invalid email or password")]
    AuthenticationFailure,

    #[error("invalid authorization token")]
    InvalidToken,

    #[error("error getting user")]
    LookupFailure,

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::DuplicateAccount => "DUPLICATE_ACCOUNT",
            AppError::RegistrationFailure => "REGISTRATION_FAILURE",
            AppError::AuthenticationFailure => "AUTHENTICATION_FAILURE",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::LookupFailure => "LOOKUP_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateAccount => StatusCode::CONFLICT,
            AppError::AuthenticationFailure | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::LookupFailure => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::InvalidInput(msg),
            DomainError::Password(_) => AppError::RegistrationFailure,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
