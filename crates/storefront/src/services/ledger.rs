//! The inventory-ledger service: every operation that moves stock, cart
//! lines, or balance together.
//!
//! Each method runs as one database transaction. The rows the decision
//! depends on are read with `FOR UPDATE`, the decision itself is a pure
//! function from `minimart_core::ledger`, and the writes apply that plan
//! before the commit. Two requests touching the same product or customer
//! therefore serialize on the row locks, and a failure at any step rolls the
//! whole operation back - there is no partially-applied state.
//!
//! Lock order is customer, then product, then cart line, in every method
//! that takes more than one.

use sqlx::PgPool;
use thiserror::Error;

use minimart_core::ledger::{
    ChargeOutcome, charge_balance, reserve_line, resize_line, settle_line,
};
use minimart_core::{CustomerId, DomainError, Money, ProductId};

use crate::db::RepositoryError;

/// Errors from ledger operations: a business rule said no, or the store did.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The underlying store failed.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Service owning the cart/stock/purchase consistency operations.
pub struct LedgerService<'a> {
    pool: &'a PgPool,
}

impl<'a> LedgerService<'a> {
    /// Create a new ledger service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add `quantity` units of a product to a customer's cart, reserving
    /// them out of stock.
    ///
    /// Repeat adds accumulate onto the existing line; the reservation check
    /// is against the line's combined quantity.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidQuantity`, `DomainError::ProductNotFound`, or
    /// `DomainError::InsufficientStock`; store failures as
    /// `LedgerError::Repository`.
    pub async fn add_to_cart(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await?;

        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock_quantity FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::ProductNotFound)?;

        let existing = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM cart_lines \
             WHERE customer_id = $1 AND product_id = $2 FOR UPDATE",
        )
        .bind(customer_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .unwrap_or(0);

        let plan = reserve_line(stock, existing, quantity)?;

        sqlx::query(
            "INSERT INTO cart_lines (customer_id, product_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (customer_id, product_id) \
             DO UPDATE SET quantity = EXCLUDED.quantity",
        )
        .bind(customer_id)
        .bind(product_id)
        .bind(plan.line_quantity)
        .execute(&mut *tx)
        .await?;

        apply_stock_delta(&mut tx, product_id, plan.stock_delta).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove a cart line, restoring its full quantity to stock.
    ///
    /// # Errors
    ///
    /// `DomainError::LineNotFound` when the customer has no line for this
    /// product; store failures as `LedgerError::Repository`.
    pub async fn remove_from_cart(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await?;

        // Lock the product row first, same order as every other method. The
        // product may legitimately be gone (admin delete is only a soft
        // precondition); the reservation then has nowhere to return.
        let _stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock_quantity FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let quantity = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM cart_lines \
             WHERE customer_id = $1 AND product_id = $2 FOR UPDATE",
        )
        .bind(customer_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::LineNotFound)?;

        apply_stock_delta(&mut tx, product_id, quantity).await?;

        sqlx::query("DELETE FROM cart_lines WHERE customer_id = $1 AND product_id = $2")
            .bind(customer_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Set a cart line to a new quantity, adjusting stock by the signed
    /// difference. Growth and shrinkage share this one path; resizing to the
    /// current quantity issues no writes at all.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidQuantity` (use removal for zero),
    /// `DomainError::ProductNotFound`, `DomainError::LineNotFound`, or
    /// `DomainError::InsufficientStock` when growing past available stock.
    pub async fn resize_line(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        new_quantity: i32,
    ) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await?;

        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock_quantity FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::ProductNotFound)?;

        let old_quantity = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM cart_lines \
             WHERE customer_id = $1 AND product_id = $2 FOR UPDATE",
        )
        .bind(customer_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::LineNotFound)?;

        let plan = resize_line(stock, old_quantity, new_quantity)?;

        if plan.stock_delta != 0 {
            apply_stock_delta(&mut tx, product_id, plan.stock_delta).await?;

            sqlx::query(
                "UPDATE cart_lines SET quantity = $1 \
                 WHERE customer_id = $2 AND product_id = $3",
            )
            .bind(new_quantity)
            .bind(customer_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Empty a customer's cart, restoring every line's quantity to its
    /// product's stock. An already-empty cart is a successful no-op.
    ///
    /// Returns the number of lines cleared.
    ///
    /// # Errors
    ///
    /// Store failures as `LedgerError::Repository`.
    pub async fn clear_cart(&self, customer_id: CustomerId) -> Result<usize, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, (ProductId, i32)>(
            "SELECT product_id, quantity FROM cart_lines \
             WHERE customer_id = $1 ORDER BY product_id FOR UPDATE",
        )
        .bind(customer_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Ok(0);
        }

        for (product_id, quantity) in &lines {
            apply_stock_delta(&mut tx, *product_id, *quantity).await?;
        }

        sqlx::query("DELETE FROM cart_lines WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(lines.len())
    }

    /// Check out the whole cart: the reservations become permanent
    /// deductions and the lines disappear. Balance is not debited in this
    /// flow - whole-cart checkout is pay-later by design.
    ///
    /// # Errors
    ///
    /// `DomainError::EmptyCart` when there is nothing to check out.
    pub async fn checkout_all(&self, customer_id: CustomerId) -> Result<(), LedgerError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM cart_lines WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DomainError::EmptyCart.into());
        }

        tx.commit().await?;
        Ok(())
    }

    /// Purchase one cart line at a final quantity that may differ from the
    /// reservation, debiting the customer's balance.
    ///
    /// Buying more than reserved needs the extra units in stock; buying
    /// fewer releases the unbought remainder. Either way the line is
    /// consumed and the balance is debited for exactly the purchased
    /// quantity.
    ///
    /// Returns the amount debited.
    ///
    /// # Errors
    ///
    /// `DomainError::CustomerNotFound`, `DomainError::ProductNotFound`,
    /// `DomainError::LineNotFound`, `DomainError::InsufficientStock`, or
    /// `DomainError::InsufficientBalance`.
    pub async fn checkout_selected(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        purchase_quantity: i32,
    ) -> Result<Money, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let balance = sqlx::query_scalar::<_, Money>(
            "SELECT balance FROM customers WHERE id = $1 FOR UPDATE",
        )
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::CustomerNotFound)?;

        let (stock, unit_price) = sqlx::query_as::<_, (i32, Money)>(
            "SELECT stock_quantity, price FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::ProductNotFound)?;

        let cart_quantity = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM cart_lines \
             WHERE customer_id = $1 AND product_id = $2 FOR UPDATE",
        )
        .bind(customer_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::LineNotFound)?;

        let plan = settle_line(stock, cart_quantity, purchase_quantity, unit_price, balance)?;

        sqlx::query("UPDATE customers SET balance = balance - $1 WHERE id = $2")
            .bind(plan.total_price)
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        apply_stock_delta(&mut tx, product_id, plan.stock_delta).await?;

        sqlx::query("DELETE FROM cart_lines WHERE customer_id = $1 AND product_id = $2")
            .bind(customer_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(plan.total_price)
    }

    /// Top up a customer's balance. Grows both the spendable balance and the
    /// cumulative charge total; the returned outcome carries the recomputed
    /// grade and whether a tier boundary was crossed.
    ///
    /// # Errors
    ///
    /// `DomainError::CustomerNotFound` or `DomainError::BelowMinimum`.
    pub async fn charge(
        &self,
        customer_id: CustomerId,
        amount: Money,
    ) -> Result<ChargeOutcome, LedgerError> {
        let mut tx = self.pool.begin().await?;

        let (balance, total_charge) = sqlx::query_as::<_, (Money, Money)>(
            "SELECT balance, total_charge FROM customers WHERE id = $1 FOR UPDATE",
        )
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::CustomerNotFound)?;

        let outcome = charge_balance(balance, total_charge, amount)?;

        sqlx::query("UPDATE customers SET balance = $1, total_charge = $2 WHERE id = $3")
            .bind(outcome.new_balance)
            .bind(outcome.new_total_charge)
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(outcome)
    }
}

/// Apply a signed stock adjustment to a product row.
///
/// A delta of zero or a missing product row is a no-op (the latter only
/// happens when restoring a reservation for a product deleted out from under
/// it).
async fn apply_stock_delta(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: ProductId,
    stock_delta: i32,
) -> Result<(), sqlx::Error> {
    if stock_delta == 0 {
        return Ok(());
    }

    sqlx::query("UPDATE products SET stock_quantity = stock_quantity + $1 WHERE id = $2")
        .bind(stock_delta)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}
