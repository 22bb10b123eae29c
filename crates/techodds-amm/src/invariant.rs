//! Invariant and validation helpers shared by the Core AMM and the pool.
//!
//! ```text
//! pre:  yes > 0, no > 0, amount > 0
//! post: |yes' * no' - k| / k <= tolerance
//!       0 <= yes_price, no_price <= 1, yes_price + no_price == 1
//! ```
//!
//! A failed post-condition is never repaired: the caller gets an error and
//! keeps its previous state.

use rust_decimal::Decimal;
use techodds_types::{PriceQuote, ReservePair, Result, TechoddsError};

/// Reject zero and negative trade or deposit amounts.
pub fn ensure_positive_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(TechoddsError::InvalidAmount { amount });
    }
    Ok(())
}

/// Reject reserve pairs that can no longer be traded against.
///
/// A non-positive reserve means previously persisted state was already
/// broken, so this is [`TechoddsError::CorruptState`], not a caller error.
pub fn ensure_tradable(reserves: &ReservePair) -> Result<()> {
    if reserves.is_tradable() {
        return Ok(());
    }
    tracing::error!(
        yes = %reserves.yes_reserve,
        no = %reserves.no_reserve,
        "Refusing to operate on non-positive reserves"
    );
    Err(TechoddsError::CorruptState {
        reason: format!("reserves must be positive, got {reserves}"),
    })
}

/// `|actual - expected| / |expected|`, or `|actual|` when `expected` is zero.
#[must_use]
pub fn relative_deviation(expected: Decimal, actual: Decimal) -> Decimal {
    let diff = (actual - expected).abs();
    if expected.is_zero() {
        diff
    } else {
        diff / expected.abs()
    }
}

/// Check that `after` conserves `k_before` within `tolerance` (relative).
pub fn check_constant_product(
    k_before: Decimal,
    after: &ReservePair,
    tolerance: Decimal,
) -> Result<()> {
    let k_after = after.constant_product()?;
    let deviation = relative_deviation(k_before, k_after);
    if deviation > tolerance {
        tracing::error!(
            k_before = %k_before,
            k_after = %k_after,
            deviation = %deviation,
            "Constant product not conserved"
        );
        return Err(TechoddsError::InvariantViolation {
            reason: format!(
                "k moved from {k_before} to {k_after} (deviation {deviation} > {tolerance})"
            ),
        });
    }
    Ok(())
}

/// Check that a quote is normalised and inside `[0, 1]`.
pub fn check_price_bounds(quote: &PriceQuote) -> Result<()> {
    let in_range = |p: Decimal| p >= Decimal::ZERO && p <= Decimal::ONE;
    if !in_range(quote.yes_price) || !in_range(quote.no_price) || quote.sum() != Decimal::ONE {
        return Err(TechoddsError::InvariantViolation {
            reason: format!("quote out of bounds: {quote}"),
        });
    }
    Ok(())
}
