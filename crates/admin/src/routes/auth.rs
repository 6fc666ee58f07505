//! Admin authentication route handlers.
//!
//! There is one admin principal; its login name and argon2 password hash
//! come from configuration, never from the database or source code.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use axum::{Json, extract::State, http::request::Parts};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::AdminSessionRepository;
use crate::error::{ApiError, Result};
use crate::middleware::bearer_token;
use crate::routes::{ApiSuccess, ok};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response carrying the freshly minted session token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub session_id: String,
    pub admin_name: String,
}

/// Admin login.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let config = state.config();

    if body.username != config.admin_username {
        return Err(ApiError::InvalidCredentials);
    }

    let parsed = PasswordHash::new(config.admin_password_hash.expose_secret())
        .map_err(|_| ApiError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token = AdminSessionRepository::new(state.pool()).create().await?;

    tracing::info!("admin logged in");
    Ok(Json(LoginResponse {
        success: true,
        session_id: token,
        admin_name: config.admin_username.clone(),
    }))
}

/// Logout. Succeeds whether or not the token was still live.
#[instrument(skip(state, parts))]
pub async fn logout(State(state): State<AppState>, parts: Parts) -> Result<Json<ApiSuccess>> {
    if let Some(token) = bearer_token(&parts) {
        AdminSessionRepository::new(state.pool()).delete(&token).await?;
    }
    Ok(ok("logged out"))
}
