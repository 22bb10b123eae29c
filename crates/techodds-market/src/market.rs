//! Per-market state owned by the registry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use techodds_amm::quote;
use techodds_pool::ManagedPool;
use techodds_types::{
    LiquidityPool, MarketId, MarketStatus, PriceQuote, PriceSample, ReservePair, Side,
};

use crate::gate::TradingGate;
use crate::journal::TradeRecord;

/// Everything the engine knows about one market.
#[derive(Debug, Clone)]
pub struct Market {
    pub(crate) id: MarketId,
    pub(crate) gate: TradingGate,
    /// Reserves the market was created with; the journal replays from here.
    pub(crate) seed: ReservePair,
    pub(crate) reserves: ReservePair,
    pub(crate) pool: ManagedPool,
    /// Bumped on every committed mutation.
    pub(crate) version: u64,
    pub(crate) history: Vec<PriceSample>,
    pub(crate) journal: Vec<TradeRecord>,
    pub(crate) created_at: DateTime<Utc>,
}

impl Market {
    pub(crate) fn new(id: MarketId, seed: ReservePair) -> Self {
        let mut market = Self {
            id,
            gate: TradingGate::new(id),
            seed,
            reserves: seed,
            pool: ManagedPool::new(),
            version: 0,
            history: Vec::new(),
            journal: Vec::new(),
            created_at: Utc::now(),
        };
        market.history.push(PriceSample::now(market.quote()));
        market
    }

    #[must_use]
    pub fn id(&self) -> MarketId {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> MarketStatus {
        self.gate.status()
    }

    #[must_use]
    pub fn reserves(&self) -> ReservePair {
        self.reserves
    }

    #[must_use]
    pub fn pool(&self) -> &ManagedPool {
        &self.pool
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The market's current price.
    ///
    /// A resolved market quotes its settlement; otherwise the pool prices
    /// trades while it holds liquidity, and the AMM reserves do when it does
    /// not.
    #[must_use]
    pub fn quote(&self) -> PriceQuote {
        if let Some(settlement) = self.gate.lifecycle().settlement_quote() {
            return settlement;
        }
        if self.pool.is_active() {
            quote(&self.pool.pool().reserves())
        } else {
            quote(&self.reserves)
        }
    }

    pub(crate) fn next_sequence(&self) -> u64 {
        self.journal.len() as u64 + 1
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Append a sample of the current quote if it moved since the last one.
    pub(crate) fn sample_if_moved(&mut self) {
        let current = self.quote();
        if self.history.last().map(PriceSample::quote) != Some(current) {
            self.history.push(PriceSample::now(current));
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> MarketSnapshot {
        let lifecycle = self.gate.lifecycle();
        MarketSnapshot {
            id: self.id,
            status: lifecycle.status,
            outcome: lifecycle.outcome,
            reserves: self.reserves,
            pool: *self.pool.pool(),
            lp_supply: self.pool.ledger().total_supply(),
            quote: self.quote(),
            version: self.version,
            trade_count: self.journal.len() as u64,
            created_at: self.created_at,
            resolved_at: lifecycle.resolved_at,
        }
    }
}

/// Read-only view of a market, handed to callers.
///
/// `version` is what a caller passes back to
/// [`MarketRegistry::buy`](crate::MarketRegistry::buy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: MarketId,
    pub status: MarketStatus,
    pub outcome: Option<Side>,
    pub reserves: ReservePair,
    pub pool: LiquidityPool,
    pub lp_supply: Decimal,
    pub quote: PriceQuote,
    pub version: u64,
    pub trade_count: u64,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}
