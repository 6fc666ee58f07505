//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Customer account
//! POST /api/customer/signup             - Register
//! GET  /api/customer/check-id/{loginId} - Login id availability
//! POST /api/customer/login              - Login, mints session token
//! POST /api/customer/logout             - Logout (idempotent)
//! GET  /api/customer/me                 - Current identity, grade, balance
//! POST /api/customer/change-nickname    - Uniqueness-checked rename
//! POST /api/customer/change-password    - Verify current, set new
//! POST /api/customer/charge             - Balance top-up (min 1,000)
//!
//! # Catalog
//! GET  /api/products                    - List (search/category/sortBy)
//! GET  /api/categories                  - Category names
//!
//! # Cart (requires auth)
//! GET    /api/cart                      - Cart lines with current prices
//! POST   /api/cart/add                  - Reserve units out of stock
//! PUT    /api/cart/update-with-stock    - Resize a line (signed stock delta)
//! DELETE /api/cart/clear-restore        - Empty cart, restore stock
//! DELETE /api/cart/{productId}          - Remove a line, restore stock
//!
//! # Checkout (requires auth)
//! POST /api/purchase/all                - Whole-cart checkout (pay-later)
//! POST /api/purchase/selected           - Single-line purchase, debits balance
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Success envelope for mutations that return no data.
#[derive(Debug, Serialize)]
pub struct ApiSuccess {
    pub success: bool,
    pub message: String,
}

/// Build a `{success: true, message}` response.
pub(crate) fn ok(message: impl Into<String>) -> Json<ApiSuccess> {
    Json(ApiSuccess {
        success: true,
        message: message.into(),
    })
}

/// Create the full storefront API router.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Customer account
        .route("/customer/signup", post(auth::signup))
        .route("/customer/check-id/{login_id}", get(auth::check_login_id))
        .route("/customer/login", post(auth::login))
        .route("/customer/logout", post(auth::logout))
        .route("/customer/me", get(auth::me))
        .route("/customer/change-nickname", post(auth::change_nickname))
        .route("/customer/change-password", post(auth::change_password))
        .route("/customer/charge", post(account::charge))
        // Catalog
        .route("/products", get(products::list))
        .route("/categories", get(products::categories))
        // Cart
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/update-with-stock", put(cart::update_with_stock))
        .route("/cart/clear-restore", delete(cart::clear_restore))
        .route("/cart/{product_id}", delete(cart::remove))
        // Checkout
        .route("/purchase/all", post(checkout::purchase_all))
        .route("/purchase/selected", post(checkout::purchase_selected))
}
