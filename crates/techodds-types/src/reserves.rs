//! The reserve pair backing a market, and the price quote derived from it.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{Result, Side, TechoddsError};

/// YES/NO reserves of a constant-product market.
///
/// Both values must be strictly positive for the market to be tradable.
/// Every trade conserves `k = yes_reserve * no_reserve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservePair {
    pub yes_reserve: Decimal,
    pub no_reserve: Decimal,
}

impl ReservePair {
    #[must_use]
    pub fn new(yes_reserve: Decimal, no_reserve: Decimal) -> Self {
        Self {
            yes_reserve,
            no_reserve,
        }
    }

    /// Reserve on one side.
    #[must_use]
    pub fn reserve(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.yes_reserve,
            Side::No => self.no_reserve,
        }
    }

    /// Sum of both reserves.
    pub fn total(&self) -> Result<Decimal> {
        self.yes_reserve
            .checked_add(self.no_reserve)
            .ok_or(TechoddsError::Overflow {
                context: "reserve total",
            })
    }

    /// Whether both reserves are strictly positive.
    #[must_use]
    pub fn is_tradable(&self) -> bool {
        self.yes_reserve > Decimal::ZERO && self.no_reserve > Decimal::ZERO
    }

    /// The constant product `k`.
    pub fn constant_product(&self) -> Result<Decimal> {
        self.yes_reserve
            .checked_mul(self.no_reserve)
            .ok_or(TechoddsError::Overflow {
                context: "constant product",
            })
    }
}

impl fmt::Display for ReservePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "YES {} / NO {}", self.yes_reserve, self.no_reserve)
    }
}

/// Random tradable pairs for property tests.
#[cfg(any(test, feature = "test-helpers"))]
impl ReservePair {
    /// Both reserves uniform in `[1.00, 100_000.00]`.
    pub fn random<R: rand::Rng>(rng: &mut R) -> Self {
        Self {
            yes_reserve: Decimal::new(rng.gen_range(100..=10_000_000), 2),
            no_reserve: Decimal::new(rng.gen_range(100..=10_000_000), 2),
        }
    }
}

/// Prices of the two outcomes. Derived from a [`ReservePair`], never
/// stored on its own.
///
/// `yes_price + no_price == 1` and both lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub yes_price: Decimal,
    pub no_price: Decimal,
}

impl PriceQuote {
    /// Maximum-uncertainty quote used when there is no liquidity.
    pub const FALLBACK: Self = Self {
        yes_price: Decimal::from_parts(5, 0, 0, false, 1),
        no_price: Decimal::from_parts(5, 0, 0, false, 1),
    };

    /// Quote a single outcome at certainty, as after resolution.
    #[must_use]
    pub fn certain(winner: Side) -> Self {
        match winner {
            Side::Yes => Self {
                yes_price: Decimal::ONE,
                no_price: Decimal::ZERO,
            },
            Side::No => Self {
                yes_price: Decimal::ZERO,
                no_price: Decimal::ONE,
            },
        }
    }

    /// Price of one side.
    #[must_use]
    pub fn price(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.yes_price,
            Side::No => self.no_price,
        }
    }

    /// `yes_price + no_price`; equal to one for every valid quote.
    #[must_use]
    pub fn sum(&self) -> Decimal {
        self.yes_price + self.no_price
    }

    /// Prices as `f64` for display.
    #[must_use]
    pub fn to_f64(&self) -> (f64, f64) {
        (
            self.yes_price.to_f64().unwrap_or(0.5),
            self.no_price.to_f64().unwrap_or(0.5),
        )
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "YES @ {} / NO @ {}", self.yes_price, self.no_price)
    }
}
