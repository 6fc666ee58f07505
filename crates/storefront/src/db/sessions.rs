//! Customer session directory.
//!
//! Opaque tokens mapped to customer ids with a fixed time-to-live. Expiry is
//! decided by the pure rule in `minimart_core::types::session`; expired rows
//! are purged lazily on the lookup that discovers them.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use minimart_core::{CustomerId, is_session_expired};

use super::RepositoryError;

/// Repository for the customer session directory.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Mint a session for a customer and return the opaque token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, customer_id: CustomerId) -> Result<String, RepositoryError> {
        let token = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO sessions (token, customer_id) VALUES ($1, $2)")
            .bind(&token)
            .bind(customer_id)
            .execute(self.pool)
            .await?;

        Ok(token)
    }

    /// Resolve a token to the customer it identifies.
    ///
    /// Returns `None` for unknown tokens and for expired ones; an expired
    /// session is deleted on the way out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn resolve(&self, token: &str) -> Result<Option<CustomerId>, RepositoryError> {
        let row = sqlx::query_as::<_, (CustomerId, DateTime<Utc>)>(
            "SELECT customer_id, created_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        let Some((customer_id, created_at)) = row else {
            return Ok(None);
        };

        if is_session_expired(created_at, Utc::now()) {
            self.delete(token).await?;
            return Ok(None);
        }

        Ok(Some(customer_id))
    }

    /// Delete a session. Deleting an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
