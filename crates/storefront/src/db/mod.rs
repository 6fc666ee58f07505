//! Database operations for the storefront.
//!
//! # Database: `minimart` (shared with the admin binary)
//!
//! ## Tables
//!
//! - `categories` - Product categories
//! - `products` - Catalog rows; `stock_quantity` is the sole source of truth
//!   for availability
//! - `customers` - Accounts, balances, cumulative charge totals
//! - `cart_lines` - Stock reservations, one row per (customer, product)
//! - `sessions` - Customer session tokens (24h TTL, lazily purged)
//! - `admin_sessions` - Back-office session tokens (admin binary only)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p minimart-cli -- migrate
//! ```
//!
//! Queries bind parameters at runtime (`sqlx::query_as` + `.bind`) rather
//! than using the compile-time-checked macros, so the workspace builds
//! without a reachable database.

pub mod cart;
pub mod customers;
pub mod products;
pub mod sessions;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use customers::CustomerRepository;
pub use products::{ProductRepository, ProductSort};
pub use sessions::SessionRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique login id). Carries the violated
    /// constraint name when the driver reports one.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Convert a sqlx error, turning unique violations into `Conflict` with
    /// the constraint name so callers can tell which field collided.
    pub(crate) fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(db_err.constraint().unwrap_or("unique").to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
