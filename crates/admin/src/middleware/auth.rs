//! Admin authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::db::AdminSessionRepository;
use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires a live admin session.
///
/// Every back-office route except login takes this; a missing or expired
/// token is a uniform authentication-required failure.
#[derive(Debug)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::AuthRequired)?;

        let live = AdminSessionRepository::new(state.pool())
            .is_live(&token)
            .await?;

        if live { Ok(Self) } else { Err(ApiError::AuthRequired) }
    }
}

/// Pull the session token out of the `Authorization` header.
///
/// The UI sends the bare token; a conventional `Bearer ` prefix is accepted
/// and stripped.
#[must_use]
pub fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}
