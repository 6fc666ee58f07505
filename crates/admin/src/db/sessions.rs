//! Admin session directory.
//!
//! Same shape as the storefront's customer sessions, but the single admin
//! principal needs no identity column - a live token *is* the identity.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use minimart_core::is_session_expired;

use super::RepositoryError;

/// Repository for the admin session directory.
pub struct AdminSessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminSessionRepository<'a> {
    /// Create a new admin session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Mint an admin session and return the opaque token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self) -> Result<String, RepositoryError> {
        let token = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO admin_sessions (token) VALUES ($1)")
            .bind(&token)
            .execute(self.pool)
            .await?;

        Ok(token)
    }

    /// Whether a token identifies a live admin session. Expired sessions are
    /// purged on the lookup that discovers them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn is_live(&self, token: &str) -> Result<bool, RepositoryError> {
        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM admin_sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        let Some(created_at) = created_at else {
            return Ok(false);
        };

        if is_session_expired(created_at, Utc::now()) {
            self.delete(token).await?;
            return Ok(false);
        }

        Ok(true)
    }

    /// Delete a session. Deleting an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM admin_sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
