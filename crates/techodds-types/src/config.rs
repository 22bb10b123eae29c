//! Engine configuration.
//!
//! Seed reserves, the pool fee and the safety bounds are policy, not
//! structure, so they live here rather than as literals in the math.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, TechoddsError, constants};

/// Configuration shared by the Core AMM and the Liquidity Pool Manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// YES reserve a new market is seeded with.
    pub initial_yes_reserve: Decimal,
    /// NO reserve a new market is seeded with.
    pub initial_no_reserve: Decimal,
    /// Fraction of each pool trade kept as a fee (0.003 = 0.3%).
    pub fee_rate: Decimal,
    /// Highest price a single trade may push the bought outcome to.
    pub max_outcome_price: Decimal,
    /// Relative tolerance for `k` conservation after a trade.
    pub invariant_tolerance: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_yes_reserve: Decimal::new(constants::DEFAULT_SEED_RESERVE, 0),
            initial_no_reserve: Decimal::new(constants::DEFAULT_SEED_RESERVE, 0),
            fee_rate: Decimal::new(constants::DEFAULT_FEE_BPS, constants::BPS_SCALE),
            max_outcome_price: Decimal::new(
                constants::DEFAULT_MAX_OUTCOME_PRICE_BPS,
                constants::BPS_SCALE,
            ),
            invariant_tolerance: Decimal::new(1, constants::DEFAULT_INVARIANT_TOLERANCE_SCALE),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config document. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Same config with a different pool fee.
    #[must_use]
    pub fn with_fee_rate(mut self, fee_rate: Decimal) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// Check every field is inside its legal range.
    pub fn validate(&self) -> Result<()> {
        if self.initial_yes_reserve <= Decimal::ZERO || self.initial_no_reserve <= Decimal::ZERO {
            return Err(TechoddsError::Configuration(format!(
                "seed reserves must be positive, got {}/{}",
                self.initial_yes_reserve, self.initial_no_reserve
            )));
        }
        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return Err(TechoddsError::Configuration(format!(
                "fee_rate must be in [0, 1), got {}",
                self.fee_rate
            )));
        }
        let half = Decimal::new(5, 1);
        if self.max_outcome_price <= half || self.max_outcome_price >= Decimal::ONE {
            return Err(TechoddsError::Configuration(format!(
                "max_outcome_price must be in (0.5, 1), got {}",
                self.max_outcome_price
            )));
        }
        if self.invariant_tolerance <= Decimal::ZERO {
            return Err(TechoddsError::Configuration(format!(
                "invariant_tolerance must be positive, got {}",
                self.invariant_tolerance
            )));
        }
        Ok(())
    }
}
