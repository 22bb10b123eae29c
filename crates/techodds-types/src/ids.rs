//! Identifiers used throughout TechOdds.
//!
//! Markets and liquidity providers use UUIDv7 for time-ordered sorting.
//! Trade ids are derived deterministically from the market and the trade's
//! position in that market's journal, so replaying a journal reproduces them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// MarketId
// ---------------------------------------------------------------------------

/// Unique identifier for a binary prediction market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MarketId(pub Uuid);

impl MarketId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for MarketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mkt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ProviderId
// ---------------------------------------------------------------------------

/// Identity of a liquidity provider (the user who owns LP tokens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ProviderId(pub Uuid);

impl ProviderId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lp:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TradeId
// ---------------------------------------------------------------------------

/// Trade identifier, deterministic from `(market_id, sequence)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TradeId(pub Uuid);

impl TradeId {
    /// Derive the id of the `sequence`-th trade in a market.
    #[must_use]
    pub fn deterministic(market_id: MarketId, sequence: u64) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"techodds:trade_id:v1:");
        hasher.update(market_id.0.as_bytes());
        hasher.update(sequence.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hash[..16]);
        Self(Uuid::from_bytes(bytes))
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trade:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_ids_are_unique() {
        let a = MarketId::new();
        let b = MarketId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn market_ids_are_time_ordered() {
        let a = MarketId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = MarketId::new();
        assert!(a < b);
    }

    #[test]
    fn trade_id_deterministic() {
        let market = MarketId::from_bytes([7; 16]);
        let a = TradeId::deterministic(market, 0);
        let b = TradeId::deterministic(market, 0);
        assert_eq!(a, b);
        assert_ne!(a, TradeId::deterministic(market, 1));
        assert_ne!(a, TradeId::deterministic(MarketId::from_bytes([8; 16]), 0));
    }

    #[test]
    fn display_prefixes() {
        assert!(MarketId::new().to_string().starts_with("mkt:"));
        assert!(ProviderId::new().to_string().starts_with("lp:"));
        let t = TradeId::deterministic(MarketId::new(), 3);
        assert!(t.to_string().starts_with("trade:"));
    }

    #[test]
    fn provider_id_serde_roundtrip() {
        let id = ProviderId::from_bytes([9; 16]);
        let json = serde_json::to_string(&id).unwrap();
        let back: ProviderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
