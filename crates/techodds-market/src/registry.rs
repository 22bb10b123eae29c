//! Market registry: the calling layer around the pure engine.
//!
//! Owns every market's state. Each mutating call computes the full
//! transition first and commits it in one step, so a failed call leaves the
//! market exactly as it was. Concurrent callers are serialized by `&mut self`
//! plus an optimistic version check on trades: a caller quotes from a
//! [`MarketSnapshot`], then passes its `version` back to [`MarketRegistry::buy`].

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use techodds_amm::ConstantProductAmm;
use techodds_pool::{LiquidityDeposit, LiquidityWithdrawal, PoolManager};
use techodds_types::{
    EngineConfig, LiquidityPosition, MarketId, PriceQuote, PriceSample, ProviderId, ReservePair,
    Result, Side, TechoddsError, TradeId, TradeRequest,
};

use crate::journal::{TradeRecord, Venue, compute_journal_root, replay_amm_trades};
use crate::market::{Market, MarketSnapshot};

/// Result of a committed trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    pub record: TradeRecord,
    pub new_quote: PriceQuote,
    /// Market version after the trade.
    pub version: u64,
}

/// All markets, plus the engine components that price them.
#[derive(Debug)]
pub struct MarketRegistry {
    amm: ConstantProductAmm,
    pools: PoolManager,
    markets: HashMap<MarketId, Market>,
}

impl MarketRegistry {
    /// Build a registry from a validated config.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let pools = PoolManager::new(&config)?;
        let amm = ConstantProductAmm::new(config)?;
        Ok(Self {
            amm,
            pools,
            markets: HashMap::new(),
        })
    }

    #[must_use]
    pub fn amm(&self) -> &ConstantProductAmm {
        &self.amm
    }

    #[must_use]
    pub fn pool_manager(&self) -> &PoolManager {
        &self.pools
    }

    #[must_use]
    pub fn market_count(&self) -> usize {
        self.markets.len()
    }

    /// Open a market seeded with `seed`.
    pub fn create_market(&mut self, seed: ReservePair) -> Result<MarketId> {
        let seed = self.amm.initialize(seed.yes_reserve, seed.no_reserve)?;
        let id = MarketId::new();
        let market = Market::new(id, seed);
        tracing::info!(
            market = %id,
            yes = %seed.yes_reserve,
            no = %seed.no_reserve,
            yes_price = %market.quote().yes_price,
            "Market created"
        );
        self.markets.insert(id, market);
        Ok(id)
    }

    /// Open a market with the configured default seed.
    pub fn create_default_market(&mut self) -> Result<MarketId> {
        let seed = self.amm.initialize_default();
        self.create_market(seed)
    }

    pub fn market(&self, id: MarketId) -> Result<&Market> {
        self.markets
            .get(&id)
            .ok_or(TechoddsError::MarketNotFound(id))
    }

    fn market_mut(&mut self, id: MarketId) -> Result<&mut Market> {
        self.markets
            .get_mut(&id)
            .ok_or(TechoddsError::MarketNotFound(id))
    }

    pub fn snapshot(&self, id: MarketId) -> Result<MarketSnapshot> {
        Ok(self.market(id)?.snapshot())
    }

    /// Buy shares of `request.side` in market `id`.
    ///
    /// Routed to the market's pool while it holds liquidity, otherwise to the
    /// Core AMM reserves.
    ///
    /// # Errors
    /// `VersionConflict` if `expected_version` is stale, `MarketNotOpen` if
    /// the market is closed or resolved, and any trade error from the engine.
    /// State is unchanged on every error.
    pub fn buy(
        &mut self,
        id: MarketId,
        request: &TradeRequest,
        expected_version: u64,
    ) -> Result<TradeReceipt> {
        let market = self
            .markets
            .get_mut(&id)
            .ok_or(TechoddsError::MarketNotFound(id))?;

        if market.version != expected_version {
            tracing::warn!(
                market = %id,
                expected = expected_version,
                current = market.version,
                "Trade rejected: stale market version"
            );
            return Err(TechoddsError::VersionConflict {
                market: id,
                expected: expected_version,
                current: market.version,
            });
        }
        market.gate.check_trading().inspect_err(|err| {
            tracing::warn!(market = %id, error = %err, "Trade rejected: market not open");
        })?;

        let (venue, shares, fees, new_quote) = if market.pool.is_active() {
            let trade = market
                .pool
                .trade(&self.pools, request.side, request.amount)?;
            (Venue::Pool, trade.shares_received, trade.fees, trade.new_quote)
        } else {
            let outcome = self.amm.execute(request, &market.reserves)?;
            market.reserves = outcome.new_reserves;
            (
                Venue::Amm,
                outcome.shares_received,
                Decimal::ZERO,
                outcome.new_quote,
            )
        };

        let sequence = market.next_sequence();
        let record = TradeRecord {
            trade_id: TradeId::deterministic(id, sequence),
            market_id: id,
            sequence,
            side: request.side,
            venue,
            cost: request.amount,
            shares,
            fees,
            yes_price_after: new_quote.yes_price,
            executed_at: Utc::now(),
        };
        market.bump_version();
        market.history.push(PriceSample::at(new_quote, record.executed_at));
        market.journal.push(record.clone());

        tracing::info!(
            market = %id,
            trade = %record.trade_id,
            side = %request.side,
            ?venue,
            cost = %request.amount,
            shares = %shares,
            yes_price = %new_quote.yes_price,
            "Trade committed"
        );

        Ok(TradeReceipt {
            record,
            new_quote,
            version: market.version,
        })
    }

    /// Deposit liquidity into market `id`'s pool on behalf of `provider`.
    /// Open markets only.
    pub fn add_liquidity(
        &mut self,
        id: MarketId,
        provider: ProviderId,
        yes_amount: Decimal,
        no_amount: Decimal,
    ) -> Result<LiquidityDeposit> {
        let market = self
            .markets
            .get_mut(&id)
            .ok_or(TechoddsError::MarketNotFound(id))?;
        market.gate.check_trading().inspect_err(|err| {
            tracing::warn!(market = %id, error = %err, "Deposit rejected: market not open");
        })?;

        let deposit = market
            .pool
            .deposit(&self.pools, provider, yes_amount, no_amount)?;
        market.bump_version();
        market.sample_if_moved();

        tracing::info!(
            market = %id,
            %provider,
            lp = %deposit.lp_tokens_minted,
            "Liquidity deposited"
        );
        Ok(deposit)
    }

    /// Burn `lp_tokens` held by `provider` in market `id`'s pool. Allowed in
    /// any lifecycle state.
    pub fn remove_liquidity(
        &mut self,
        id: MarketId,
        provider: ProviderId,
        lp_tokens: Decimal,
    ) -> Result<LiquidityWithdrawal> {
        let market = self
            .markets
            .get_mut(&id)
            .ok_or(TechoddsError::MarketNotFound(id))?;

        let withdrawal = market.pool.withdraw(&self.pools, provider, lp_tokens)?;
        market.bump_version();
        market.sample_if_moved();

        tracing::info!(
            market = %id,
            %provider,
            lp = %lp_tokens,
            fees = %withdrawal.fees_share,
            "Liquidity withdrawn"
        );
        Ok(withdrawal)
    }

    /// `provider`'s current slice of market `id`'s pool.
    pub fn position(&self, id: MarketId, provider: ProviderId) -> Result<LiquidityPosition> {
        self.market(id)?.pool.position_of(&self.pools, provider)
    }

    /// Halt trading in market `id`.
    pub fn close(&mut self, id: MarketId) -> Result<()> {
        let market = self.market_mut(id)?;
        market.gate.close()?;
        market.bump_version();
        tracing::info!(market = %id, "Market closed");
        Ok(())
    }

    /// Resolve market `id` to `outcome` and record the settlement price.
    pub fn resolve(&mut self, id: MarketId, outcome: Side) -> Result<PriceQuote> {
        let market = self.market_mut(id)?;
        let settlement = market.gate.resolve(outcome)?;
        market.bump_version();
        market.history.push(PriceSample::now(settlement));
        tracing::info!(
            market = %id,
            %outcome,
            trades = market.journal.len(),
            "Market resolved"
        );
        Ok(settlement)
    }

    pub fn price_history(&self, id: MarketId) -> Result<&[PriceSample]> {
        Ok(&self.market(id)?.history)
    }

    pub fn journal(&self, id: MarketId) -> Result<&[TradeRecord]> {
        Ok(&self.market(id)?.journal)
    }

    pub fn journal_root(&self, id: MarketId) -> Result<[u8; 32]> {
        Ok(compute_journal_root(self.journal(id)?))
    }

    /// Check a market's stored state against its journal and ledger.
    ///
    /// Replays the AMM trades from the seed and requires the exact stored
    /// reserves, then checks the LP ledger against the pool.
    pub fn audit(&self, id: MarketId) -> Result<()> {
        let market = self.market(id)?;
        let replayed = replay_amm_trades(&self.amm, market.seed, &market.journal)?;
        if replayed != market.reserves {
            tracing::error!(
                market = %id,
                stored = %market.reserves,
                %replayed,
                "Reserves diverge from journal"
            );
            return Err(TechoddsError::InvariantViolation {
                reason: format!(
                    "market {id}: stored reserves {} != replayed {replayed}",
                    market.reserves
                ),
            });
        }
        if market.pool.is_active() {
            market
                .pool
                .check_supply(self.amm.config().invariant_tolerance)?;
        }
        Ok(())
    }
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self {
            amm: ConstantProductAmm::default(),
            pools: PoolManager::default(),
            markets: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use techodds_types::MarketStatus;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn buy(
        reg: &mut MarketRegistry,
        id: MarketId,
        side: Side,
        amount: i64,
    ) -> Result<TradeReceipt> {
        let version = reg.snapshot(id)?.version;
        reg.buy(id, &TradeRequest::new(side, dec(amount)), version)
    }

    #[test]
    fn unknown_market_is_not_found() {
        let mut reg = MarketRegistry::default();
        let id = MarketId::new();
        assert!(matches!(
            reg.snapshot(id),
            Err(TechoddsError::MarketNotFound(_))
        ));
        let err = reg
            .buy(id, &TradeRequest::new(Side::Yes, dec(1)), 0)
            .unwrap_err();
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn create_rejects_bad_seed() {
        let mut reg = MarketRegistry::default();
        let err = reg
            .create_market(ReservePair::new(dec(0), dec(500)))
            .unwrap_err();
        assert!(matches!(err, TechoddsError::InvalidAmount { .. }));
        assert_eq!(reg.market_count(), 0);
    }

    #[test]
    fn buy_commits_and_bumps_version() {
        let mut reg = MarketRegistry::default();
        let id = reg.create_default_market().unwrap();
        let receipt = buy(&mut reg, id, Side::Yes, 100).unwrap();
        assert_eq!(receipt.version, 1);
        assert_eq!(receipt.record.sequence, 1);
        assert_eq!(receipt.record.venue, Venue::Amm);
        assert_eq!(receipt.record.trade_id, TradeId::deterministic(id, 1));

        let snap = reg.snapshot(id).unwrap();
        assert_eq!(snap.reserves.no_reserve, dec(600));
        assert_eq!(snap.trade_count, 1);
        assert_eq!(reg.price_history(id).unwrap().len(), 2);
    }

    #[test]
    fn stale_version_is_rejected_without_change() {
        let mut reg = MarketRegistry::default();
        let id = reg.create_default_market().unwrap();
        buy(&mut reg, id, Side::Yes, 10).unwrap();
        let before = reg.snapshot(id).unwrap();

        let err = reg
            .buy(id, &TradeRequest::new(Side::No, dec(10)), 0)
            .unwrap_err();
        assert!(matches!(
            err,
            TechoddsError::VersionConflict {
                expected: 0,
                current: 1,
                ..
            }
        ));
        assert_eq!(err.http_status(), 409);
        assert_eq!(reg.snapshot(id).unwrap(), before);
    }

    #[test]
    fn failed_trade_does_not_bump_version() {
        let mut reg = MarketRegistry::default();
        let id = reg.create_default_market().unwrap();
        let err = buy(&mut reg, id, Side::Yes, 10_000).unwrap_err();
        assert!(matches!(err, TechoddsError::InsufficientLiquidity { .. }));
        let snap = reg.snapshot(id).unwrap();
        assert_eq!(snap.version, 0);
        assert_eq!(snap.trade_count, 0);
        assert_eq!(reg.price_history(id).unwrap().len(), 1);
    }

    #[test]
    fn closed_market_rejects_trades_and_deposits() {
        let mut reg = MarketRegistry::default();
        let id = reg.create_default_market().unwrap();
        reg.close(id).unwrap();
        assert_eq!(reg.snapshot(id).unwrap().status, MarketStatus::Closed);

        let err = buy(&mut reg, id, Side::Yes, 10).unwrap_err();
        assert!(matches!(err, TechoddsError::MarketNotOpen { .. }));
        assert!(
            reg.add_liquidity(id, ProviderId::new(), dec(10), dec(10))
                .is_err()
        );
    }

    #[test]
    fn pool_takes_over_pricing_once_funded() {
        let mut reg = MarketRegistry::default();
        let id = reg.create_default_market().unwrap();
        let lp = ProviderId::new();
        reg.add_liquidity(id, lp, dec(300), dec(700)).unwrap();
        // Pool ratio now sets the quote.
        assert_eq!(reg.snapshot(id).unwrap().quote.yes_price, Decimal::new(7, 1));

        let receipt = buy(&mut reg, id, Side::No, 100).unwrap();
        assert_eq!(receipt.record.venue, Venue::Pool);
        assert_eq!(receipt.record.fees, Decimal::new(3, 1));
        // AMM reserves untouched by a pool trade.
        assert_eq!(reg.snapshot(id).unwrap().reserves, reg.amm().initialize_default());
        reg.audit(id).unwrap();
    }

    #[test]
    fn resolve_appends_settlement_sample() {
        let mut reg = MarketRegistry::default();
        let id = reg.create_default_market().unwrap();
        buy(&mut reg, id, Side::Yes, 50).unwrap();
        let settlement = reg.resolve(id, Side::Yes).unwrap();
        assert_eq!(settlement, PriceQuote::certain(Side::Yes));

        let last = *reg.price_history(id).unwrap().last().unwrap();
        assert_eq!(last.yes_price, Decimal::ONE);
        assert_eq!(last.no_price, Decimal::ZERO);
        assert!(matches!(
            reg.close(id),
            Err(TechoddsError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn audit_catches_tampered_reserves() {
        let mut reg = MarketRegistry::default();
        let id = reg.create_default_market().unwrap();
        buy(&mut reg, id, Side::No, 25).unwrap();
        reg.audit(id).unwrap();

        reg.market_mut(id).unwrap().reserves.yes_reserve += Decimal::ONE;
        assert!(matches!(
            reg.audit(id),
            Err(TechoddsError::InvariantViolation { .. })
        ));
    }
}
