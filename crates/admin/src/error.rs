//! Unified error handling for the admin API.
//!
//! Same contract as the storefront: every failure is
//! `{"success": false, "message": ...}` plus a status code, with store-layer
//! details captured to Sentry and never exposed.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use minimart_core::DomainError;

use crate::db::RepositoryError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// No valid admin session accompanied the request.
    #[error("authentication required")]
    AuthRequired,

    /// Wrong admin credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The operation conflicts with current state (e.g., deleting a category
    /// that still has products).
    #[error("{0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
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
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
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
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AuthRequired | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
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
