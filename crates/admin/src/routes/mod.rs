//! HTTP route handlers for the back-office JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                            - Liveness check
//! GET  /health/ready                      - Readiness check (DB ping)
//!
//! # Auth
//! POST /api/admin/login                   - Admin login, mints session token
//! POST /api/admin/logout                  - Logout (idempotent)
//!
//! # Categories
//! GET    /api/admin/categories            - List with product counts
//! POST   /api/admin/categories            - Create (id = max + 1)
//! DELETE /api/admin/categories/{id}       - Delete, refused while products remain
//!
//! # Products
//! GET    /api/admin/products              - List (search/category filters)
//! GET    /api/admin/products/{id}         - Detail
//! POST   /api/admin/products              - Create (derived id, see core ledger)
//! PUT    /api/admin/products/{id}         - Update name/price/stock/origin
//! DELETE /api/admin/products/{id}         - Delete, refused while carts hold it
//!
//! # Maintenance
//! POST /api/admin/maintenance/resync-grades - Destructive charge-total resync
//! ```

pub mod auth;
pub mod categories;
pub mod maintenance;
pub mod products;

use axum::{
    Json, Router,
    routing::{delete, get, post},
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

/// Create the full admin API router.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api/admin", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        // Categories
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/categories/{id}", delete(categories::remove))
        // Products
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::detail)
                .put(products::update)
                .delete(products::remove),
        )
        // Maintenance
        .route(
            "/maintenance/resync-grades",
            post(maintenance::resync_grades),
        )
}
