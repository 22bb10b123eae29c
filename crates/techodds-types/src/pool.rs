//! Liquidity pool state and provider positions.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::{ReservePair, Result, TechoddsError};

/// A fee-bearing liquidity pool. One per market, created on the first
/// deposit.
///
/// `total_fees` is a separate accumulator: it is not tradable and does not
/// enter the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPool {
    pub yes_liquidity: Decimal,
    pub no_liquidity: Decimal,
    pub total_fees: Decimal,
}

impl LiquidityPool {
    /// A pool with no liquidity and no fees.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            yes_liquidity: Decimal::ZERO,
            no_liquidity: Decimal::ZERO,
            total_fees: Decimal::ZERO,
        }
    }

    /// The tradable reserves of this pool.
    #[must_use]
    pub fn reserves(&self) -> ReservePair {
        ReservePair::new(self.yes_liquidity, self.no_liquidity)
    }

    /// Both sides at zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yes_liquidity.is_zero() && self.no_liquidity.is_zero()
    }

    /// A pool is either empty or has both sides positive; fees are never
    /// negative.
    pub fn validate(&self) -> Result<()> {
        if self.total_fees < Decimal::ZERO {
            return Err(TechoddsError::CorruptState {
                reason: format!("negative fee accumulator {}", self.total_fees),
            });
        }
        if self.is_empty() || self.reserves().is_tradable() {
            return Ok(());
        }
        Err(TechoddsError::CorruptState {
            reason: format!(
                "pool liquidity YES {} / NO {} is neither empty nor positive",
                self.yes_liquidity, self.no_liquidity
            ),
        })
    }

    /// LP supply implied by the pool: `sqrt(yes * no)`.
    pub fn lp_supply(&self) -> Result<Decimal> {
        let k = self.reserves().constant_product()?;
        k.sqrt().ok_or_else(|| TechoddsError::CorruptState {
            reason: format!("cannot take square root of {k}"),
        })
    }
}

impl Default for LiquidityPool {
    fn default() -> Self {
        Self::empty()
    }
}

/// A provider's proportional slice of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPosition {
    /// Fraction of the pool owned, in `[0, 1]`.
    pub share: Decimal,
    pub yes_tokens: Decimal,
    pub no_tokens: Decimal,
    pub fees_earned: Decimal,
}

impl LiquidityPosition {
    #[must_use]
    pub fn zero() -> Self {
        Self {
            share: Decimal::ZERO,
            yes_tokens: Decimal::ZERO,
            no_tokens: Decimal::ZERO,
            fees_earned: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(yes: i64, no: i64, fees: i64) -> LiquidityPool {
        LiquidityPool {
            yes_liquidity: Decimal::new(yes, 0),
            no_liquidity: Decimal::new(no, 0),
            total_fees: Decimal::new(fees, 0),
        }
    }

    #[test]
    fn empty_pool_is_valid() {
        let p = LiquidityPool::default();
        assert!(p.is_empty());
        assert!(p.validate().is_ok());
        assert_eq!(p.lp_supply().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn half_empty_pool_is_corrupt() {
        let err = pool(100, 0, 0).validate().unwrap_err();
        assert!(matches!(err, TechoddsError::CorruptState { .. }));
    }

    #[test]
    fn negative_fees_are_corrupt() {
        assert!(pool(100, 100, -1).validate().is_err());
    }

    #[test]
    fn lp_supply_is_geometric_mean() {
        let p = pool(400, 900, 0);
        let diff = (p.lp_supply().unwrap() - Decimal::new(600, 0)).abs();
        assert!(diff < Decimal::new(1, 18), "diff {diff}");
    }

    #[test]
    fn reserves_exclude_fees() {
        let p = pool(10, 20, 5);
        assert_eq!(p.reserves().total().unwrap(), Decimal::new(30, 0));
    }
}
