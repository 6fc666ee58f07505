//! Product catalog maintenance.
//!
//! Product ids are derived (`category * 100 + sequence`, see
//! `minimart_core::ledger::next_product_id`) and never client-supplied. The
//! allocation runs inside a transaction holding the category row, so two
//! concurrent creates in one category serialize instead of racing to the
//! same id.

use sqlx::{PgPool, Postgres, QueryBuilder};

use minimart_core::ledger::next_product_id;
use minimart_core::{CategoryId, Money, Product, ProductId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.price, p.stock_quantity, \
     p.category_id, c.name AS category_name, p.origin";

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: Money,
    pub stock_quantity: i32,
    pub origin: Option<String>,
}

impl ProductInput {
    fn origin_or_default(&self) -> &str {
        self.origin.as_deref().unwrap_or("unspecified")
    }
}

/// Repository for product catalog maintenance.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products for the back-office, optionally filtered by a name
    /// substring and/or category name, ordered by category then id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             JOIN categories c ON c.id = p.category_id WHERE 1=1"
        ));

        if let Some(search) = search {
            qb.push(" AND p.name ILIKE ");
            qb.push_bind(format!("%{search}%"));
        }
        if let Some(category) = category {
            qb.push(" AND c.name = ");
            qb.push_bind(category.to_owned());
        }
        qb.push(" ORDER BY p.category_id, p.id");

        let products = qb
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             JOIN categories c ON c.id = p.category_id WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product in a category, allocating its derived id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the category doesn't exist,
    /// `RepositoryError::Conflict` when the name (or, after a full category,
    /// the allocated id) collides, `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        category_id: CategoryId,
        input: &ProductInput,
    ) -> Result<ProductId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Hold the category row for the whole allocation.
        sqlx::query_scalar::<_, String>("SELECT name FROM categories WHERE id = $1 FOR UPDATE")
            .bind(category_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let current_max = sqlx::query_scalar::<_, Option<ProductId>>(
            "SELECT MAX(id) FROM products WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await?;

        let id = next_product_id(category_id, current_max);

        sqlx::query(
            "INSERT INTO products (id, category_id, name, price, stock_quantity, origin) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(category_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock_quantity)
        .bind(input.origin_or_default())
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        tx.commit().await?;
        Ok(id)
    }

    /// Update a product's name, price, stock, and origin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// `RepositoryError::Conflict` when the new name is taken.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET name = $1, price = $2, stock_quantity = $3, origin = $4 \
             WHERE id = $5",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock_quantity)
        .bind(input.origin_or_default())
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Whether any customer currently holds a cart reservation for this
    /// product. Deletion is refused while this is true (a soft precondition;
    /// there is deliberately no foreign key backing it).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_reserved(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let reserved = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM cart_lines WHERE product_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(reserved)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
