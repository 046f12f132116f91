//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use filedepot_core::auth::AuthError;
use filedepot_core::files::FileError;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identifier already registered")]
    IdentifierTaken,

    #[error("Invalid identifier or password")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            // The original service reports a taken identifier as a 400, not a 409.
            AppError::IdentifierTaken => (
                StatusCode::BAD_REQUEST,
                "identifier_taken",
                "A user with this email/phone already exists",
            ),
            // One message for unknown-identifier and wrong-password: no enumeration.
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email/phone or password",
            ),
            // One message for forged/expired/rotated/unknown refresh tokens.
            AppError::InvalidRefreshToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_refresh_token",
                "Refresh token not found or no longer valid",
            ),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Internal(detail) => {
                // Log the detail server-side; never echo it to the client.
                error!(detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        // Codec and store failures alike are server faults by the time they
        // reach the boundary; the structured 4xx variants are raised
        // explicitly by the session flows.
        AppError::Internal(e.to_string())
    }
}

impl From<FileError> for AppError {
    fn from(e: FileError) -> Self {
        AppError::Internal(e.to_string())
    }
}
