//! Customer authentication and account route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use minimart_core::{CustomerId, Grade, Money};

use crate::db::CustomerRepository;
use crate::error::Result;
use crate::middleware::{CurrentCustomer, OptionalCustomer, bearer_token};
use crate::routes::{ApiSuccess, ok};
use crate::services::AuthService;
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub login_id: String,
    pub password: String,
    pub nickname: String,
}

/// Register a new customer.
#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<ApiSuccess>> {
    let auth = AuthService::new(state.pool());
    let customer = auth
        .signup(&body.login_id, &body.password, &body.nickname)
        .await?;

    tracing::info!(customer_id = %customer.id, "customer registered");
    Ok(ok("account created, please log in"))
}

/// Login id availability response.
#[derive(Debug, Serialize)]
pub struct CheckIdResponse {
    pub success: bool,
    pub available: bool,
}

/// Check whether a login id is still available.
#[instrument(skip(state))]
pub async fn check_login_id(
    State(state): State<AppState>,
    Path(login_id): Path<String>,
) -> Result<Json<CheckIdResponse>> {
    let available = AuthService::new(state.pool())
        .login_id_available(&login_id)
        .await?;

    Ok(Json(CheckIdResponse {
        success: true,
        available,
    }))
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

/// Login response carrying the freshly minted session token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub grade: Grade,
    pub session_id: String,
}

/// Login with login id and password.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool());
    let (customer, token) = auth.login(&body.login_id, &body.password).await?;

    tracing::info!(customer_id = %customer.id, "customer logged in");
    let grade = customer.grade();
    Ok(Json(LoginResponse {
        success: true,
        customer_id: customer.id,
        customer_name: customer.nickname,
        grade,
        session_id: token,
    }))
}

/// Logout. Succeeds whether or not the token was still live.
#[instrument(skip(state, parts))]
pub async fn logout(State(state): State<AppState>, parts: Parts) -> Result<Json<ApiSuccess>> {
    if let Some(token) = bearer_token(&parts) {
        AuthService::new(state.pool()).logout(&token).await?;
    }
    Ok(ok("logged out"))
}

/// Current-identity response. `logged_in: false` is the whole story for
/// guests; the remaining fields only appear for a live session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Money>,
}

impl MeResponse {
    const fn guest() -> Self {
        Self {
            logged_in: false,
            customer_id: None,
            login_id: None,
            customer_name: None,
            grade: None,
            balance: None,
        }
    }
}

/// Who am I. Guests get `{loggedIn: false}` rather than an auth failure so
/// the UI can render its login screen without special-casing a 401.
#[instrument(skip(state, customer))]
pub async fn me(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
) -> Result<Json<MeResponse>> {
    let Some(customer_id) = customer else {
        return Ok(Json(MeResponse::guest()));
    };

    let Some(customer) = CustomerRepository::new(state.pool()).get(customer_id).await? else {
        return Ok(Json(MeResponse::guest()));
    };

    Ok(Json(MeResponse {
        logged_in: true,
        customer_id: Some(customer.id),
        login_id: Some(customer.login_id.clone()),
        customer_name: Some(customer.nickname.clone()),
        grade: Some(customer.grade()),
        balance: Some(customer.balance),
    }))
}

/// Nickname change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNicknameRequest {
    pub new_nickname: String,
}

/// Change the current customer's nickname.
#[instrument(skip(state, body))]
pub async fn change_nickname(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Json(body): Json<ChangeNicknameRequest>,
) -> Result<Json<ApiSuccess>> {
    AuthService::new(state.pool())
        .change_nickname(customer_id, &body.new_nickname)
        .await?;

    Ok(ok("nickname updated"))
}

/// Password change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change the current customer's password.
#[instrument(skip(state, body))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<ApiSuccess>> {
    AuthService::new(state.pool())
        .change_password(customer_id, &body.current_password, &body.new_password)
        .await?;

    Ok(ok("password updated"))
}
