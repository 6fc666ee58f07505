//! Unified error handling with Sentry integration.
//!
//! Every failure leaves the server as `{"success": false, "message": ...}`
//! with an appropriate status code - a raw fault is never visible to the
//! client. Store-layer failures are captured to Sentry before responding and
//! their details are not exposed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use minimart_core::DomainError;

use crate::db::RepositoryError;
use crate::services::{AuthError, LedgerError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(AuthError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// No valid session token accompanied the request.
    #[error("authentication required")]
    AuthRequired,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        Self::Database(e)
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Domain(domain) => Self::Domain(domain),
            LedgerError::Repository(repo) => Self::Database(repo),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Repository(repo) => Self::Database(repo),
            other => Self::Auth(other),
        }
    }
}

/// Failure body shared by every error response.
#[derive(Serialize)]
struct ApiFailure {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Auth(AuthError::PasswordHash)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Domain(domain) => match domain {
                DomainError::InvalidQuantity | DomainError::EmptyCart => StatusCode::BAD_REQUEST,
                DomainError::ProductNotFound
                | DomainError::CustomerNotFound
                | DomainError::LineNotFound => StatusCode::NOT_FOUND,
                DomainError::InsufficientStock { .. }
                | DomainError::InsufficientBalance { .. }
                | DomainError::BelowMinimum { .. }
                | DomainError::DuplicateName(_) => StatusCode::CONFLICT,
            },
            Self::Auth(auth) => match auth {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::DuplicateLoginId | AuthError::DuplicateNickname => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash) => {
                "Internal server error".to_string()
            }
            Self::Domain(domain) => domain.to_string(),
            Self::Auth(auth) => auth.to_string(),
            Self::AuthRequired => "authentication required".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (
            status,
            Json(ApiFailure {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(ApiError::AuthRequired),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Domain(DomainError::LineNotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Domain(DomainError::InsufficientStock { available: 3 })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Domain(DomainError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::BadRequest("nope".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_domain_messages_pass_through() {
        let err = ApiError::Domain(DomainError::InsufficientStock { available: 2 });
        assert!(err.to_string().contains("2 unit(s) available"));
    }
}
