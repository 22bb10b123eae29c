//! A pool bundled with its LP ledger.
//!
//! Withdrawals are checked against the provider's own balance and priced
//! against the ledger's total supply, so a caller cannot burn tokens it does
//! not hold or pass a wrong supply.
//!
//! Every method computes the full transition first and commits pool and
//! ledger together; on error neither changes.

use rust_decimal::Decimal;
use techodds_amm::invariant::relative_deviation;
use techodds_types::{LiquidityPool, LiquidityPosition, ProviderId, Result, Side, TechoddsError};

use crate::ledger::LpLedger;
use crate::manager::{LiquidityDeposit, LiquidityWithdrawal, PoolManager, PoolTrade};

/// Pool state plus the ledger of who owns it.
#[derive(Debug, Clone, Default)]
pub struct ManagedPool {
    pool: LiquidityPool,
    ledger: LpLedger,
}

impl ManagedPool {
    /// An empty pool with no providers. The pool itself comes into being on
    /// the first [`deposit`](Self::deposit).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pool(&self) -> &LiquidityPool {
        &self.pool
    }

    #[must_use]
    pub fn ledger(&self) -> &LpLedger {
        &self.ledger
    }

    /// Whether the pool holds tradable liquidity.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pool.reserves().is_tradable()
    }

    /// Deposit on behalf of `provider` and credit the minted LP tokens.
    pub fn deposit(
        &mut self,
        manager: &PoolManager,
        provider: ProviderId,
        yes_amount: Decimal,
        no_amount: Decimal,
    ) -> Result<LiquidityDeposit> {
        let deposit = manager.add_liquidity(yes_amount, no_amount, &self.pool)?;
        let mut ledger = self.ledger.clone();
        ledger.mint(provider, deposit.lp_tokens_minted)?;

        self.pool = deposit.new_pool;
        self.ledger = ledger;
        Ok(deposit)
    }

    /// Burn `lp_tokens` held by `provider`.
    pub fn withdraw(
        &mut self,
        manager: &PoolManager,
        provider: ProviderId,
        lp_tokens: Decimal,
    ) -> Result<LiquidityWithdrawal> {
        let mut ledger = self.ledger.clone();
        ledger.burn(provider, lp_tokens)?;
        let supply = self.ledger.total_supply();
        // The last provider out takes everything left, dust included.
        let burned = if ledger.is_empty() { supply } else { lp_tokens };
        let withdrawal = manager.remove_liquidity(burned, &self.pool, supply)?;

        self.pool = withdrawal.new_pool;
        self.ledger = ledger;
        Ok(withdrawal)
    }

    /// Trade against the pool, accruing the fee.
    pub fn trade(
        &mut self,
        manager: &PoolManager,
        side: Side,
        amount: Decimal,
    ) -> Result<PoolTrade> {
        let trade = manager.execute_pool_trade(side, amount, &self.pool)?;
        self.pool = trade.new_pool;
        Ok(trade)
    }

    /// Current slice of the pool owned by `provider`.
    pub fn position_of(
        &self,
        manager: &PoolManager,
        provider: ProviderId,
    ) -> Result<LiquidityPosition> {
        manager.position(
            self.ledger.balance_of(provider),
            self.ledger.total_supply(),
            &self.pool,
        )
    }

    /// Check the ledger's supply against `sqrt(yes * no)` of the pool.
    ///
    /// Trades conserve `k` and withdrawals shrink both sides by the same
    /// share, so the two stay equal up to rounding.
    pub fn check_supply(&self, tolerance: Decimal) -> Result<()> {
        let implied = self.pool.lp_supply()?;
        let recorded = self.ledger.total_supply();
        if relative_deviation(implied, recorded) > tolerance {
            return Err(TechoddsError::InvariantViolation {
                reason: format!("ledger supply {recorded} != pool supply {implied}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn tol() -> Decimal {
        Decimal::new(1, 12)
    }

    #[test]
    fn first_deposit_creates_pool() {
        let pm = PoolManager::default();
        let mut mp = ManagedPool::new();
        assert!(!mp.is_active());
        let alice = ProviderId::new();
        let d = mp.deposit(&pm, alice, dec(500), dec(500)).unwrap();
        assert!(mp.is_active());
        assert_eq!(mp.ledger().balance_of(alice), d.lp_tokens_minted);
        mp.check_supply(tol()).unwrap();
    }

    #[test]
    fn withdraw_more_than_held_is_refused() {
        let pm = PoolManager::default();
        let mut mp = ManagedPool::new();
        let alice = ProviderId::new();
        let bob = ProviderId::new();
        mp.deposit(&pm, alice, dec(500), dec(500)).unwrap();
        mp.deposit(&pm, bob, dec(100), dec(100)).unwrap();

        let before = *mp.pool();
        let bob_lp = mp.ledger().balance_of(bob);
        let err = mp.withdraw(&pm, bob, bob_lp + dec(1)).unwrap_err();
        assert!(matches!(err, TechoddsError::InsufficientLpBalance { .. }));
        assert_eq!(*mp.pool(), before);
        assert_eq!(mp.ledger().balance_of(bob), bob_lp);
    }

    #[test]
    fn double_withdrawal_is_refused() {
        let pm = PoolManager::default();
        let mut mp = ManagedPool::new();
        let alice = ProviderId::new();
        let bob = ProviderId::new();
        mp.deposit(&pm, alice, dec(500), dec(500)).unwrap();
        mp.deposit(&pm, bob, dec(100), dec(100)).unwrap();
        let bob_lp = mp.ledger().balance_of(bob);

        mp.withdraw(&pm, bob, bob_lp).unwrap();
        let err = mp.withdraw(&pm, bob, bob_lp).unwrap_err();
        assert!(matches!(err, TechoddsError::InsufficientLpBalance { .. }));
    }

    #[test]
    fn fees_go_to_providers_pro_rata() {
        let pm = PoolManager::default();
        let mut mp = ManagedPool::new();
        let alice = ProviderId::new();
        let bob = ProviderId::new();
        mp.deposit(&pm, alice, dec(300), dec(300)).unwrap();
        mp.deposit(&pm, bob, dec(100), dec(100)).unwrap();

        mp.trade(&pm, Side::Yes, dec(100)).unwrap();
        mp.trade(&pm, Side::No, dec(100)).unwrap();
        assert_eq!(mp.pool().total_fees, Decimal::new(6, 1));

        let alice_pos = mp.position_of(&pm, alice).unwrap();
        let bob_pos = mp.position_of(&pm, bob).unwrap();
        assert!((alice_pos.fees_earned - Decimal::new(45, 2)).abs() < tol());
        assert!((bob_pos.fees_earned - Decimal::new(15, 2)).abs() < tol());
        mp.check_supply(Decimal::new(1, 9)).unwrap();
    }

    #[test]
    fn last_provider_out_empties_pool() {
        let pm = PoolManager::default();
        let mut mp = ManagedPool::new();
        let alice = ProviderId::new();
        mp.deposit(&pm, alice, dec(200), dec(300)).unwrap();
        mp.trade(&pm, Side::No, dec(10)).unwrap();
        let lp = mp.ledger().balance_of(alice);
        let w = mp.withdraw(&pm, alice, lp).unwrap();
        assert!(mp.pool().is_empty());
        assert!(mp.ledger().is_empty());
        assert_eq!(w.fees_share, Decimal::new(3, 2));
    }

    #[test]
    fn failed_trade_leaves_pool_untouched() {
        let pm = PoolManager::default();
        let mut mp = ManagedPool::new();
        mp.deposit(&pm, ProviderId::new(), dec(50), dec(50)).unwrap();
        let before = *mp.pool();
        assert!(mp.trade(&pm, Side::Yes, dec(1_000_000)).is_err());
        assert_eq!(*mp.pool(), before);
    }
}
