//! Domain entities shared by the storefront and admin binaries.
//!
//! Both servers read the same tables, so the row shapes live here. These are
//! plain data carriers; the rules that mutate them are in [`crate::ledger`].
//! Purpose-built row shapes (cart lines joined with prices, categories with
//! product counts) stay next to the queries that produce them.

use chrono::{DateTime, Utc};

use super::grade::Grade;
use super::id::{CategoryId, CustomerId, ProductId};
use super::money::Money;

/// A product row, with its category name joined on read.
///
/// `category_name` is never stored on the product row; every read resolves it
/// through the category so the two can't drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub stock_quantity: i32,
    pub category_id: CategoryId,
    pub category_name: String,
    pub origin: String,
}

/// A customer account. The credential hash is deliberately not part of this
/// type; repositories hand it out separately where verification needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: CustomerId,
    pub login_id: String,
    pub nickname: String,
    pub balance: Money,
    pub total_charge: Money,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// The customer's current loyalty grade, derived from cumulative charge.
    #[must_use]
    pub fn grade(&self) -> Grade {
        Grade::for_total(self.total_charge)
    }
}
