//! Category maintenance.

use sqlx::PgPool;

use minimart_core::CategoryId;

use super::RepositoryError;

/// A category with how many products it currently holds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub id: CategoryId,
    pub name: String,
    pub product_count: i64,
}

/// Repository for category maintenance.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories with their product counts, in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, COUNT(p.id) AS product_count \
             FROM categories c \
             LEFT JOIN products p ON p.category_id = c.id \
             GROUP BY c.id, c.name \
             ORDER BY c.id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Create a category under the next free id (`max + 1`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the name is taken,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(&self, name: &str) -> Result<CategoryId, RepositoryError> {
        // Single statement so the id computation and the insert can't be
        // separated; a concurrent create loses with a key conflict instead
        // of silently sharing an id.
        let id = sqlx::query_scalar::<_, CategoryId>(
            "INSERT INTO categories (id, name) \
             SELECT COALESCE(MAX(id), 0) + 1, $1 FROM categories \
             RETURNING id",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(id)
    }

    /// How many products a category currently holds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count(&self, id: CategoryId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE category_id = $1",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete a category.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
