//! Inventory-ledger rules: cart, stock, purchase, and charge consistency.
//!
//! A cart line is a *reservation* against product stock, not a separate pool:
//! for any product, `stock_quantity + sum(cart line quantities)` is constant
//! across cart mutations until a checkout turns a reservation into a sale.
//!
//! The functions here are pure decisions. Each takes the current values read
//! from the store and returns a *plan* - the new line quantity, the signed
//! stock delta, the price to debit. Callers apply the plan's writes inside a
//! single transaction, holding row locks on everything they read, so a plan
//! is never applied to state other than the state it was computed from.
//!
//! Stock deltas are signed and applied as `stock_quantity += stock_delta`.
//! Growth and shrinkage share one code path on purpose: a resize from 5 to 2
//! and a resize from 2 to 5 are the same computation with opposite signs.

use serde::Serialize;
use thiserror::Error;

use crate::types::{CategoryId, Grade, Money, ProductId};

/// Minimum balance top-up per charge.
pub const MIN_TOP_UP: i64 = 1_000;

/// Business-rule failures shared by both servers.
///
/// Store-layer failures are deliberately not part of this enum; each binary
/// wraps those separately so a broken database never masquerades as a
/// business outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Quantity below 1 where at least one unit is required.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// No product with the requested id.
    #[error("product not found")]
    ProductNotFound,

    /// No customer with the requested id.
    #[error("customer not found")]
    CustomerNotFound,

    /// No cart line for this customer and product.
    #[error("no such item in the cart")]
    LineNotFound,

    /// The customer's cart holds no lines.
    #[error("the cart is empty")]
    EmptyCart,

    /// Not enough unreserved stock to cover the request.
    #[error("insufficient stock: {available} unit(s) available")]
    InsufficientStock { available: i32 },

    /// The customer's balance does not cover the purchase.
    #[error("insufficient balance: {balance} available, {required} required")]
    InsufficientBalance { balance: Money, required: Money },

    /// Top-up below the minimum charge amount.
    #[error("minimum top-up is {minimum}")]
    BelowMinimum { minimum: Money },

    /// A name that must be unique is already taken.
    #[error("{0} is already in use")]
    DuplicateName(String),
}

/// Plan for adding units of a product to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    /// Quantity the cart line holds after the upsert.
    pub line_quantity: i32,
    /// Signed stock adjustment (always negative here).
    pub stock_delta: i32,
}

/// Add `requested` units to an existing reservation of `existing_line_quantity`
/// units (0 if the customer has no line for this product yet).
///
/// Fails with [`DomainError::InsufficientStock`] iff the combined reservation
/// would exceed the currently unreserved stock; nothing is changed on failure.
///
/// # Errors
///
/// Returns [`DomainError::InvalidQuantity`] when `requested < 1`, or
/// [`DomainError::InsufficientStock`] when the stock check fails.
pub fn reserve_line(
    stock_quantity: i32,
    existing_line_quantity: i32,
    requested: i32,
) -> Result<Reservation, DomainError> {
    if requested < 1 {
        return Err(DomainError::InvalidQuantity);
    }
    if existing_line_quantity + requested > stock_quantity {
        return Err(DomainError::InsufficientStock {
            available: stock_quantity,
        });
    }
    Ok(Reservation {
        line_quantity: existing_line_quantity + requested,
        stock_delta: -requested,
    })
}

/// Plan for resizing a cart line to a new quantity.
///
/// A `stock_delta` of 0 means the resize is a no-op and no writes should be
/// issued at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineResize {
    /// Signed stock adjustment; negative when the line grows, positive when
    /// it shrinks.
    pub stock_delta: i32,
}

/// Resize a line from `old_quantity` to `new_quantity` (use removal for 0).
///
/// Only the *growth* (`new > old`) needs unreserved stock; shrinkage releases
/// units back through the same signed-delta mechanism.
///
/// # Errors
///
/// Returns [`DomainError::InvalidQuantity`] when `new_quantity < 1`, or
/// [`DomainError::InsufficientStock`] when growth exceeds available stock.
pub fn resize_line(
    stock_quantity: i32,
    old_quantity: i32,
    new_quantity: i32,
) -> Result<LineResize, DomainError> {
    if new_quantity < 1 {
        return Err(DomainError::InvalidQuantity);
    }
    let diff = new_quantity - old_quantity;
    if diff > 0 && stock_quantity < diff {
        return Err(DomainError::InsufficientStock {
            available: stock_quantity,
        });
    }
    Ok(LineResize { stock_delta: -diff })
}

/// Plan for settling (purchasing) a single cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Signed stock adjustment relative to the quantity already reserved.
    pub stock_delta: i32,
    /// Amount to debit from the customer's balance.
    pub total_price: Money,
}

/// Settle a line: buy `purchase_quantity` units of a product of which
/// `cart_quantity` are already reserved in the cart.
///
/// The purchase quantity may differ from the reservation in either direction.
/// Buying more requires the extra units to be in stock; buying fewer releases
/// the unbought remainder back to stock via a positive delta. The balance
/// check is always against the full purchase price - the reservation holds
/// stock, never money.
///
/// # Errors
///
/// Returns [`DomainError::InvalidQuantity`], [`DomainError::InsufficientStock`]
/// (extra units not available), or [`DomainError::InsufficientBalance`].
pub fn settle_line(
    stock_quantity: i32,
    cart_quantity: i32,
    purchase_quantity: i32,
    unit_price: Money,
    balance: Money,
) -> Result<Settlement, DomainError> {
    if purchase_quantity < 1 {
        return Err(DomainError::InvalidQuantity);
    }
    let delta = purchase_quantity - cart_quantity;
    if delta > 0 && stock_quantity < delta {
        return Err(DomainError::InsufficientStock {
            available: stock_quantity,
        });
    }
    let total_price = unit_price * purchase_quantity;
    if balance < total_price {
        return Err(DomainError::InsufficientBalance {
            balance,
            required: total_price,
        });
    }
    Ok(Settlement {
        stock_delta: -delta,
        total_price,
    })
}

/// Outcome of a balance top-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChargeOutcome {
    pub new_balance: Money,
    pub new_total_charge: Money,
    pub grade: Grade,
    pub grade_changed: bool,
}

/// Charge `amount` onto a customer's balance.
///
/// Both the spendable balance and the lifetime charge total grow; the grade
/// is recomputed from the new total. Purchases never pass through here -
/// only explicit top-ups count toward the grade ladder.
///
/// # Errors
///
/// Returns [`DomainError::BelowMinimum`] when `amount` is under [`MIN_TOP_UP`].
pub fn charge_balance(
    balance: Money,
    total_charge: Money,
    amount: Money,
) -> Result<ChargeOutcome, DomainError> {
    let minimum = Money::from(MIN_TOP_UP);
    if amount < minimum {
        return Err(DomainError::BelowMinimum { minimum });
    }
    let new_total_charge = total_charge + amount;
    let grade = Grade::for_total(new_total_charge);
    Ok(ChargeOutcome {
        new_balance: balance + amount,
        new_total_charge,
        grade,
        grade_changed: grade != Grade::for_total(total_charge),
    })
}

/// Allocate the id for a new product in a category.
///
/// Ids follow `category * 100 + sequence`, sequence starting at 1. The
/// sequence continues from the category's current maximum id as long as that
/// id still carries the category as its decimal prefix; otherwise it restarts
/// at the category's base. A category therefore holds at most 99 products
/// before ids collide with the next category's range - acceptable at this
/// catalog's size.
#[must_use]
pub fn next_product_id(category: CategoryId, current_max: Option<ProductId>) -> ProductId {
    let base = category.as_i32() * 100 + 1;
    current_max.map_or(ProductId::new(base), |max| {
        if max.to_string().starts_with(&category.to_string()) {
            ProductId::new(max.as_i32() + 1)
        } else {
            ProductId::new(base)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------
    // Single-operation rules
    // -------------------------------------------------------------------

    #[test]
    fn test_reserve_accumulates_onto_existing_line() {
        let plan = reserve_line(10, 3, 4).expect("within stock");
        assert_eq!(plan.line_quantity, 7);
        assert_eq!(plan.stock_delta, -4);
    }

    #[test]
    fn test_reserve_fails_exactly_when_reservation_exceeds_stock() {
        // existing + requested == stock is still fine
        assert!(reserve_line(10, 6, 4).is_ok());
        // one more unit tips it over
        assert_eq!(
            reserve_line(10, 6, 5),
            Err(DomainError::InsufficientStock { available: 10 })
        );
    }

    #[test]
    fn test_reserve_rejects_non_positive_quantity() {
        assert_eq!(reserve_line(10, 0, 0), Err(DomainError::InvalidQuantity));
        assert_eq!(reserve_line(10, 0, -2), Err(DomainError::InvalidQuantity));
    }

    #[test]
    fn test_resize_equal_quantity_plans_zero_writes() {
        let plan = resize_line(5, 3, 3).expect("no-op resize");
        assert_eq!(plan.stock_delta, 0);
    }

    #[test]
    fn test_resize_growth_checks_only_the_difference() {
        // stock 2, line 5 -> 7 needs exactly 2 more
        assert_eq!(resize_line(2, 5, 7).expect("fits").stock_delta, -2);
        assert_eq!(
            resize_line(2, 5, 8),
            Err(DomainError::InsufficientStock { available: 2 })
        );
    }

    #[test]
    fn test_resize_shrink_releases_stock_without_a_check() {
        // even with zero stock left, shrinking must succeed
        let plan = resize_line(0, 5, 2).expect("shrink");
        assert_eq!(plan.stock_delta, 3);
    }

    #[test]
    fn test_resize_to_zero_is_rejected() {
        assert_eq!(resize_line(10, 5, 0), Err(DomainError::InvalidQuantity));
    }

    #[test]
    fn test_settle_buying_fewer_releases_remainder_and_debits_purchase_price() {
        let plan = settle_line(8, 5, 2, Money::from(1_000), Money::from(10_000)).expect("settle");
        assert_eq!(plan.stock_delta, 3);
        assert_eq!(plan.total_price, Money::from(2_000));
    }

    #[test]
    fn test_settle_buying_more_needs_extra_stock() {
        assert_eq!(
            settle_line(2, 4, 7, Money::from(100), Money::from(10_000)),
            Err(DomainError::InsufficientStock { available: 2 })
        );
        let plan = settle_line(3, 4, 7, Money::from(100), Money::from(10_000)).expect("fits");
        assert_eq!(plan.stock_delta, -3);
        assert_eq!(plan.total_price, Money::from(700));
    }

    #[test]
    fn test_settle_checks_balance_against_full_purchase_price() {
        assert_eq!(
            settle_line(10, 2, 5, Money::from(1_000), Money::from(4_999)),
            Err(DomainError::InsufficientBalance {
                balance: Money::from(4_999),
                required: Money::from(5_000),
            })
        );
        assert!(settle_line(10, 2, 5, Money::from(1_000), Money::from(5_000)).is_ok());
    }

    #[test]
    fn test_charge_below_minimum() {
        assert_eq!(
            charge_balance(Money::ZERO, Money::ZERO, Money::from(999)),
            Err(DomainError::BelowMinimum {
                minimum: Money::from(MIN_TOP_UP)
            })
        );
        assert!(charge_balance(Money::ZERO, Money::ZERO, Money::from(1_000)).is_ok());
    }

    #[test]
    fn test_charge_crossing_a_tier_flags_the_change() {
        let outcome = charge_balance(Money::ZERO, Money::ZERO, Money::from(500_000))
            .expect("charge");
        assert_eq!(outcome.new_balance, Money::from(500_000));
        assert_eq!(outcome.new_total_charge, Money::from(500_000));
        assert_eq!(outcome.grade, Grade::Silver);
        assert!(outcome.grade_changed);
    }

    #[test]
    fn test_charge_within_a_tier_does_not_flag() {
        let outcome =
            charge_balance(Money::from(5_000), Money::from(600_000), Money::from(10_000))
                .expect("charge");
        assert_eq!(outcome.grade, Grade::Silver);
        assert!(!outcome.grade_changed);
    }

    #[test]
    fn test_next_product_id_first_in_category() {
        assert_eq!(next_product_id(CategoryId::new(7), None), ProductId::new(701));
    }

    #[test]
    fn test_next_product_id_continues_sequence() {
        assert_eq!(
            next_product_id(CategoryId::new(7), Some(ProductId::new(704))),
            ProductId::new(705)
        );
        assert_eq!(
            next_product_id(CategoryId::new(12), Some(ProductId::new(1203))),
            ProductId::new(1204)
        );
    }

    #[test]
    fn test_next_product_id_restarts_when_max_is_foreign() {
        // a stray id that does not carry the category prefix restarts the run
        assert_eq!(
            next_product_id(CategoryId::new(7), Some(ProductId::new(42))),
            ProductId::new(701)
        );
    }

    // -------------------------------------------------------------------
    // Conservation across operation sequences
    // -------------------------------------------------------------------

    /// One product's stock and one customer's line for it, with the plans
    /// applied the way the service applies them.
    struct Shelf {
        stock: i32,
        line: Option<i32>,
    }

    impl Shelf {
        const fn new(stock: i32) -> Self {
            Self { stock, line: None }
        }

        fn add(&mut self, qty: i32) -> Result<(), DomainError> {
            let existing = self.line.unwrap_or(0);
            let plan = reserve_line(self.stock, existing, qty)?;
            self.line = Some(plan.line_quantity);
            self.stock += plan.stock_delta;
            Ok(())
        }

        fn resize(&mut self, new_qty: i32) -> Result<(), DomainError> {
            let old = self.line.ok_or(DomainError::LineNotFound)?;
            let plan = resize_line(self.stock, old, new_qty)?;
            if plan.stock_delta != 0 {
                self.stock += plan.stock_delta;
                self.line = Some(new_qty);
            }
            Ok(())
        }

        fn remove(&mut self) -> Result<(), DomainError> {
            let qty = self.line.take().ok_or(DomainError::LineNotFound)?;
            self.stock += qty;
            Ok(())
        }

        fn reserved(&self) -> i32 {
            self.line.unwrap_or(0)
        }
    }

    #[test]
    fn test_conservation_across_mutation_sequences() {
        let initial = 10;
        let mut shelf = Shelf::new(initial);

        shelf.add(4).expect("add 4");
        assert_eq!(shelf.stock, 6);
        shelf.resize(7).expect("grow to 7");
        assert_eq!(shelf.stock, 3);
        shelf.resize(2).expect("shrink to 2");
        assert_eq!(shelf.stock, 8);
        shelf.add(3).expect("add 3 more");
        shelf.remove().expect("remove line");

        assert_eq!(shelf.stock + shelf.reserved(), initial);
        assert_eq!(shelf.stock, initial);
    }

    #[test]
    fn test_conservation_holds_through_failures() {
        let initial = 5;
        let mut shelf = Shelf::new(initial);

        shelf.add(4).expect("add 4");
        // both of these must fail without touching anything
        assert!(shelf.add(2).is_err());
        assert!(shelf.resize(8).is_err());
        assert_eq!(shelf.stock + shelf.reserved(), initial);
        assert_eq!(shelf.reserved(), 4);
    }

    #[test]
    fn test_spec_scenario_add_resize_settle() {
        // stock=10, cart empty
        let mut shelf = Shelf::new(10);
        shelf.add(4).expect("add 4");
        assert_eq!((shelf.stock, shelf.reserved()), (6, 4));

        shelf.resize(2).expect("resize to 2");
        assert_eq!((shelf.stock, shelf.reserved()), (8, 2));

        // buy 5 of the 2 reserved: needs 3 more from stock
        let unit_price = Money::from(1_500);
        let balance = Money::from(100_000);
        let plan = settle_line(shelf.stock, shelf.reserved(), 5, unit_price, balance)
            .expect("settle");
        assert_eq!(plan.stock_delta, -3);
        assert_eq!(plan.total_price, Money::from(7_500));

        shelf.stock += plan.stock_delta;
        shelf.line = None;
        assert_eq!(shelf.stock, 5);
    }
}
