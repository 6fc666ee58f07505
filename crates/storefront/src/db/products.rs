//! Product catalog reads for the storefront.
//!
//! The storefront never writes product rows directly; all stock movement
//! happens inside the ledger service's transactions, and catalog maintenance
//! belongs to the admin binary.

use sqlx::{PgPool, Postgres, QueryBuilder};

use minimart_core::{Product, ProductId};

use super::RepositoryError;

/// Sort orders accepted by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Name ascending (the default).
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl ProductSort {
    /// Parse the `sortBy` query value; unknown values fall back to the default.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("name_desc") => Self::NameDesc,
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            _ => Self::NameAsc,
        }
    }

    const fn order_by(self) -> &'static str {
        match self {
            Self::NameAsc => "p.name ASC",
            Self::NameDesc => "p.name DESC",
            Self::PriceAsc => "p.price ASC",
            Self::PriceDesc => "p.price DESC",
        }
    }
}

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.price, p.stock_quantity, \
     p.category_id, c.name AS category_name, p.origin";

/// Repository for product catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by a name substring and/or a
    /// category name, in the requested order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        category: Option<&str>,
        sort: ProductSort,
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
        qb.push(format!(" ORDER BY {}", sort.order_by()));

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

    /// List the category names customers can filter by.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_names(&self) -> Result<Vec<String>, RepositoryError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM categories ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }
}
