//! Per-provider LP token ledger.
//!
//! Tracks how many LP tokens each provider holds. Burning more than a
//! provider holds fails, which closes the double-withdrawal hole of
//! trusting the caller for `total_lp_supply`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use techodds_amm::invariant::ensure_positive_amount;
use techodds_types::{ProviderId, Result, TechoddsError};

/// LP balances per provider, plus their sum.
#[derive(Debug, Clone, Default)]
pub struct LpLedger {
    balances: HashMap<ProviderId, Decimal>,
    total_supply: Decimal,
}

impl LpLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit freshly minted tokens to `provider`.
    pub fn mint(&mut self, provider: ProviderId, amount: Decimal) -> Result<()> {
        ensure_positive_amount(amount)?;
        let overflow = || TechoddsError::Overflow { context: "LP mint" };
        let balance = self
            .balance_of(provider)
            .checked_add(amount)
            .ok_or_else(overflow)?;
        let total_supply = self.total_supply.checked_add(amount).ok_or_else(overflow)?;
        self.balances.insert(provider, balance);
        self.total_supply = total_supply;
        Ok(())
    }

    /// Burn tokens held by `provider`.
    ///
    /// # Errors
    /// Returns `InsufficientLpBalance` if the provider holds fewer than
    /// `amount`; the ledger is unchanged.
    pub fn burn(&mut self, provider: ProviderId, amount: Decimal) -> Result<()> {
        ensure_positive_amount(amount)?;
        let available = self.balance_of(provider);
        if available < amount {
            return Err(TechoddsError::InsufficientLpBalance {
                provider,
                needed: amount,
                available,
            });
        }
        let remaining = available - amount;
        if remaining.is_zero() {
            self.balances.remove(&provider);
        } else {
            self.balances.insert(provider, remaining);
        }
        self.total_supply -= amount;
        if self.balances.is_empty() {
            // Rounding dust from summing balances.
            self.total_supply = Decimal::ZERO;
        }
        Ok(())
    }

    /// Tokens held by `provider` (zero if unknown).
    #[must_use]
    pub fn balance_of(&self, provider: ProviderId) -> Decimal {
        self.balances
            .get(&provider)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.total_supply
    }

    /// Number of providers with a non-zero balance.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.balances.len()
    }

    /// Whether no tokens are outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// All `(provider, balance)` entries, for persistence.
    pub fn entries(&self) -> impl Iterator<Item = (ProviderId, Decimal)> + '_ {
        self.balances.iter().map(|(p, b)| (*p, *b))
    }
}
