//! Lifecycle-aware trading gate.
//!
//! Blocks trades and deposits unless the market is OPEN. Withdrawals of
//! liquidity are not gated: providers may leave a closed or resolved market.

use techodds_types::{
    MarketId, MarketLifecycle, MarketStatus, PriceQuote, Result, Side, TechoddsError,
};

/// Gate in front of a single market's mutating operations.
#[derive(Debug, Clone, Copy)]
pub struct TradingGate {
    market: MarketId,
    lifecycle: MarketLifecycle,
}

impl TradingGate {
    /// A gate for a freshly opened market.
    #[must_use]
    pub fn new(market: MarketId) -> Self {
        Self {
            market,
            lifecycle: MarketLifecycle::open(),
        }
    }

    #[must_use]
    pub fn status(&self) -> MarketStatus {
        self.lifecycle.status
    }

    #[must_use]
    pub fn lifecycle(&self) -> &MarketLifecycle {
        &self.lifecycle
    }

    /// Whether trades are currently allowed.
    #[must_use]
    pub fn trading_allowed(&self) -> bool {
        self.lifecycle.status.is_tradable()
    }

    /// Guard a trade or deposit. Returns `Ok(())` if allowed,
    /// or [`TechoddsError::MarketNotOpen`] if blocked.
    pub fn check_trading(&self) -> Result<()> {
        if self.trading_allowed() {
            Ok(())
        } else {
            Err(TechoddsError::MarketNotOpen {
                market: self.market,
                status: self.lifecycle.status,
            })
        }
    }

    /// Halt trading.
    pub fn close(&mut self) -> Result<()> {
        self.lifecycle.close()
    }

    /// Decide the outcome and return the settlement quote.
    pub fn resolve(&mut self, outcome: Side) -> Result<PriceQuote> {
        self.lifecycle.resolve(outcome)?;
        Ok(PriceQuote::certain(outcome))
    }
}
