//! Persisted decimal strings.
//!
//! Storage keeps currency amounts at 2 decimal places and prices at 4,
//! rounded half away from zero. Engine arithmetic runs at full precision;
//! this module is the only place values are cut down or parsed back.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use techodds_types::constants::{AMOUNT_DP, PRICE_DP};
use techodds_types::{LiquidityPool, PriceQuote, ReservePair, Result, TechoddsError};

/// Round an amount to storage precision.
#[must_use]
pub fn round_amount(value: Decimal) -> Decimal {
    round_to(value, AMOUNT_DP)
}

/// Round a price to storage precision.
#[must_use]
pub fn round_price(value: Decimal) -> Decimal {
    round_to(value, PRICE_DP)
}

fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Parse a persisted decimal string.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| TechoddsError::Parse {
        field,
        reason: format!("{raw:?}: {e}"),
    })
}

/// Stored form of a Core AMM reserve pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedReserves {
    pub yes_reserve: String,
    pub no_reserve: String,
}

impl PersistedReserves {
    #[must_use]
    pub fn encode(reserves: &ReservePair) -> Self {
        Self {
            yes_reserve: round_amount(reserves.yes_reserve).to_string(),
            no_reserve: round_amount(reserves.no_reserve).to_string(),
        }
    }

    pub fn decode(&self) -> Result<ReservePair> {
        Ok(ReservePair::new(
            parse_decimal("yes_reserve", &self.yes_reserve)?,
            parse_decimal("no_reserve", &self.no_reserve)?,
        ))
    }
}

/// Stored form of a liquidity pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPool {
    pub yes_liquidity: String,
    pub no_liquidity: String,
    pub total_fees: String,
}

impl PersistedPool {
    #[must_use]
    pub fn encode(pool: &LiquidityPool) -> Self {
        Self {
            yes_liquidity: round_amount(pool.yes_liquidity).to_string(),
            no_liquidity: round_amount(pool.no_liquidity).to_string(),
            total_fees: round_amount(pool.total_fees).to_string(),
        }
    }

    pub fn decode(&self) -> Result<LiquidityPool> {
        Ok(LiquidityPool {
            yes_liquidity: parse_decimal("yes_liquidity", &self.yes_liquidity)?,
            no_liquidity: parse_decimal("no_liquidity", &self.no_liquidity)?,
            total_fees: parse_decimal("total_fees", &self.total_fees)?,
        })
    }
}

/// Stored form of a price quote.
///
/// The NO price is written as the complement of the rounded YES price, so
/// the stored pair still sums to exactly 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedQuote {
    pub yes_price: String,
    pub no_price: String,
}

impl PersistedQuote {
    #[must_use]
    pub fn encode(quote: &PriceQuote) -> Self {
        let yes = round_price(quote.yes_price);
        Self {
            yes_price: yes.to_string(),
            no_price: (Decimal::ONE - yes).to_string(),
        }
    }

    pub fn decode(&self) -> Result<PriceQuote> {
        Ok(PriceQuote {
            yes_price: parse_decimal("yes_price", &self.yes_price)?,
            no_price: parse_decimal("no_price", &self.no_price)?,
        })
    }
}
