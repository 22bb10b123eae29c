//! Constant-product swap math.
//!
//! Buying an outcome pays the cost into the reserve of the *opposite*
//! outcome and draws shares from the reserve of the outcome bought. For a
//! YES purchase of `amount`:
//!
//! ```text
//! k         = yes * no
//! no'       = no + amount
//! yes'      = k / no'
//! shares    = yes - yes'
//! yes_price = no' / (yes' + no')      -- strictly higher than before
//! ```
//!
//! NO purchases are the mirror image. The pool reuses this function with
//! the fee already taken off `amount`.

use rust_decimal::Decimal;
use techodds_types::{EngineConfig, PriceQuote, ReservePair, Result, Side, TechoddsError};

use crate::invariant::{
    check_constant_product, check_price_bounds, ensure_positive_amount, ensure_tradable,
};
use crate::quote::quote;

/// Bounds a swap must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapLimits {
    /// Highest post-trade price of the bought outcome.
    pub max_outcome_price: Decimal,
    /// Relative tolerance on `k` conservation.
    pub invariant_tolerance: Decimal,
}

impl From<&EngineConfig> for SwapLimits {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_outcome_price: config.max_outcome_price,
            invariant_tolerance: config.invariant_tolerance,
        }
    }
}

impl Default for SwapLimits {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// Result of a raw swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub new_reserves: ReservePair,
    pub shares_out: Decimal,
    pub new_quote: PriceQuote,
}

/// Swap `amount_in` for shares of `side` against `reserves`.
///
/// # Errors
/// - [`TechoddsError::CorruptState`] if `reserves` are not strictly positive
/// - [`TechoddsError::InvalidAmount`] if `amount_in <= 0`, or so small that
///   it buys no shares
/// - [`TechoddsError::InsufficientLiquidity`] if the trade would empty a
///   reserve or push the bought outcome across `max_outcome_price`
///
/// The ceiling only stops a trade that crosses it. A pair seeded with one
/// side already above it stays tradable on both sides.
/// - [`TechoddsError::InvariantViolation`] if `k` is not conserved
pub fn swap(
    side: Side,
    amount_in: Decimal,
    reserves: &ReservePair,
    limits: &SwapLimits,
) -> Result<Swap> {
    ensure_tradable(reserves)?;
    ensure_positive_amount(amount_in)?;

    let k = reserves.constant_product()?;
    let bought = reserves.reserve(side);
    let paid_into = reserves
        .reserve(side.opposite())
        .checked_add(amount_in)
        .ok_or(TechoddsError::Overflow {
            context: "reserve deposit",
        })?;
    let remaining = k.checked_div(paid_into).ok_or(TechoddsError::Overflow {
        context: "reserve division",
    })?;
    let shares_out = bought - remaining;

    if remaining <= Decimal::ZERO {
        return Err(TechoddsError::InsufficientLiquidity {
            reason: format!("buying {side} for {amount_in} would drain the {side} reserve"),
        });
    }
    // Dust below the reserves' precision buys nothing and moves no price.
    if shares_out <= Decimal::ZERO {
        return Err(TechoddsError::InvalidAmount { amount: amount_in });
    }

    let new_reserves = match side {
        Side::Yes => ReservePair::new(remaining, paid_into),
        Side::No => ReservePair::new(paid_into, remaining),
    };
    let new_quote = quote(&new_reserves);
    check_price_bounds(&new_quote)?;
    let old_price = quote(reserves).price(side);
    let new_price = new_quote.price(side);
    if new_price > limits.max_outcome_price && old_price <= limits.max_outcome_price {
        return Err(TechoddsError::InsufficientLiquidity {
            reason: format!(
                "amount {amount_in} too large for current liquidity: {side} price would reach \
                 {new_price} (ceiling {})",
                limits.max_outcome_price
            ),
        });
    }

    check_constant_product(k, &new_reserves, limits.invariant_tolerance)?;

    Ok(Swap {
        new_reserves,
        shares_out,
        new_quote,
    })
}
