//! Authentication extractors.
//!
//! The UI carries its session token as an opaque string in the
//! `Authorization` header on every authenticated call. These extractors
//! resolve it against the session directory; absence or expiry yields a
//! uniform authentication-required failure, never a partial result.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use minimart_core::CustomerId;

use crate::db::SessionRepository;
use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires an authenticated customer.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentCustomer(customer_id): CurrentCustomer,
/// ) -> impl IntoResponse {
///     format!("customer {customer_id}")
/// }
/// ```
pub struct CurrentCustomer(pub CustomerId);

impl FromRequestParts<AppState> for CurrentCustomer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::AuthRequired)?;

        let customer_id = SessionRepository::new(state.pool())
            .resolve(&token)
            .await?
            .ok_or(ApiError::AuthRequired)?;

        Ok(Self(customer_id))
    }
}

/// Extractor that optionally resolves the current customer.
///
/// Unlike `CurrentCustomer`, this does not reject unauthenticated requests;
/// handlers that render differently for guests use it.
pub struct OptionalCustomer(pub Option<CustomerId>);

impl FromRequestParts<AppState> for OptionalCustomer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };

        let customer_id = SessionRepository::new(state.pool()).resolve(&token).await?;
        Ok(Self(customer_id))
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
