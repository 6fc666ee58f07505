//! Cart reads for the storefront.
//!
//! Cart *mutations* all go through the ledger service so that every stock
//! movement happens inside one transaction; this repository only serves the
//! cart view, joined against current product prices (the UI re-renders from
//! store state and never trusts client-side totals).

use sqlx::PgPool;

use minimart_core::{CustomerId, Money, ProductId};

use super::RepositoryError;

/// One cart line joined with the product it reserves.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLineDetail {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub quantity: i32,
}

impl CartLineDetail {
    /// Line total at the current unit price.
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.price * self.quantity
    }
}

/// Repository for cart reads.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All cart lines for a customer with product names and current prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CartLineDetail>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLineDetail>(
            "SELECT cl.product_id, p.name AS product_name, p.price, cl.quantity \
             FROM cart_lines cl \
             JOIN products p ON p.id = cl.product_id \
             WHERE cl.customer_id = $1 \
             ORDER BY cl.product_id",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }
}
