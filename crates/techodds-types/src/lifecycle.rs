//! Market lifecycle: `OPEN → CLOSED → RESOLVED`.
//!
//! The pricing engine itself is state-agnostic. The calling layer owns a
//! [`MarketLifecycle`] per market and must refuse trades unless the market
//! is [`MarketStatus::Open`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PriceQuote, Result, Side, TechoddsError};

/// Lifecycle status of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    /// Accepting trades and deposits.
    Open,
    /// Trading halted, outcome not yet known.
    Closed,
    /// Outcome decided; final.
    Resolved,
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Resolved => write!(f, "RESOLVED"),
        }
    }
}

impl MarketStatus {
    #[must_use]
    pub fn is_tradable(self) -> bool {
        self == Self::Open
    }

    /// Whether `self → to` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Open, Self::Closed) | (Self::Open | Self::Closed, Self::Resolved)
        )
    }
}

/// Lifecycle record of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketLifecycle {
    pub status: MarketStatus,
    /// Winning outcome, set on resolution.
    pub outcome: Option<Side>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl MarketLifecycle {
    /// A freshly created, open market.
    #[must_use]
    pub fn open() -> Self {
        Self {
            status: MarketStatus::Open,
            outcome: None,
            resolved_at: None,
        }
    }

    /// Halt trading without deciding the outcome.
    pub fn close(&mut self) -> Result<()> {
        self.transition(MarketStatus::Closed)
    }

    /// Decide the outcome. Final.
    pub fn resolve(&mut self, outcome: Side) -> Result<()> {
        self.transition(MarketStatus::Resolved)?;
        self.outcome = Some(outcome);
        self.resolved_at = Some(Utc::now());
        Ok(())
    }

    /// Settlement quote of a resolved market: the winner at 1, the loser at 0.
    #[must_use]
    pub fn settlement_quote(&self) -> Option<PriceQuote> {
        self.outcome.map(PriceQuote::certain)
    }

    fn transition(&mut self, to: MarketStatus) -> Result<()> {
        if !self.status.can_transition_to(to) {
            return Err(TechoddsError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl Default for MarketLifecycle {
    fn default() -> Self {
        Self::open()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn only_open_is_tradable() {
        assert!(MarketStatus::Open.is_tradable());
        assert!(!MarketStatus::Closed.is_tradable());
        assert!(!MarketStatus::Resolved.is_tradable());
    }

    #[test]
    fn open_close_resolve() {
        let mut lc = MarketLifecycle::open();
        lc.close().unwrap();
        assert_eq!(lc.status, MarketStatus::Closed);
        lc.resolve(Side::No).unwrap();
        assert_eq!(lc.status, MarketStatus::Resolved);
        assert_eq!(lc.outcome, Some(Side::No));
        assert!(lc.resolved_at.is_some());
    }

    #[test]
    fn resolve_directly_from_open() {
        let mut lc = MarketLifecycle::open();
        lc.resolve(Side::Yes).unwrap();
        let q = lc.settlement_quote().unwrap();
        assert_eq!(q.yes_price, Decimal::ONE);
        assert_eq!(q.no_price, Decimal::ZERO);
    }

    #[test]
    fn resolved_is_final() {
        let mut lc = MarketLifecycle::open();
        lc.resolve(Side::Yes).unwrap();
        let err = lc.resolve(Side::No).unwrap_err();
        assert!(matches!(err, TechoddsError::InvalidTransition { .. }));
        assert!(lc.close().is_err());
        assert_eq!(lc.outcome, Some(Side::Yes));
    }

    #[test]
    fn closed_cannot_close_again() {
        let mut lc = MarketLifecycle::open();
        lc.close().unwrap();
        assert!(lc.close().is_err());
    }

    #[test]
    fn open_market_has_no_settlement_quote() {
        assert!(MarketLifecycle::open().settlement_quote().is_none());
    }
}
