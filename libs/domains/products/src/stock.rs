//! Stock rules.
//!
//! Two thresholds coexist on purpose: a product is flagged `isLowStock` on read
//! while `0 < quantity < 10`, but the low-stock listing selects
//! `0 < quantity <= 10`. A product with exactly 10 units shows up in the listing
//! without the flag.

use crate::error::{ProductError, ProductResult};

/// Exclusive upper bound for the read-time `isLowStock` flag
pub const LOW_STOCK_READ_LIMIT: i64 = 10;

/// Inclusive upper bound for the low-stock listing
pub const LOW_STOCK_QUERY_THRESHOLD: i64 = 10;

pub fn derive_stock(quantity: i64) -> bool {
    quantity > 0
}

pub fn is_low_stock(quantity: i64) -> bool {
    quantity > 0 && quantity < LOW_STOCK_READ_LIMIT
}

pub fn check_amount(amount: i64) -> ProductResult<()> {
    if amount < 1 {
        return Err(ProductError::validation("Amount must be at least 1"));
    }
    Ok(())
}

/// Quantity left after removing `amount`, refusing non-positive amounts and overdrafts
pub fn check_reduction(quantity: i64, amount: i64) -> ProductResult<i64> {
    check_amount(amount)?;
    if amount > quantity {
        return Err(insufficient(quantity, amount));
    }
    Ok(quantity - amount)
}

/// Refusal for a reduction of `requested` units.
///
/// `available` may come from a read taken after the refused write; a restock in
/// between is reported as `requested - 1` so the payload stays consistent.
pub fn insufficient(available: i64, requested: i64) -> ProductError {
    ProductError::InsufficientStock {
        available: available.clamp(0, requested.saturating_sub(1).max(0)),
        requested,
    }
}
