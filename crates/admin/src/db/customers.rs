//! Customer maintenance operations.

use sqlx::PgPool;

use super::RepositoryError;

/// Repository for bulk customer maintenance.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Redefine every customer's cumulative charge total as their current
    /// balance. Grades follow automatically since they are derived from
    /// `total_charge` on read.
    ///
    /// This DISCARDS real charge history - it exists as a disaster-recovery
    /// tool, not a routine job. Returns the number of customers rewritten.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn resync_charge_totals(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE customers SET total_charge = balance")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
