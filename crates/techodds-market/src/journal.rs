//! Per-market trade journal.
//!
//! Every committed trade is appended as a [`TradeRecord`]. The journal root is
//! a SHA-256 over the records in order, so two copies of a market's history
//! can be compared without diffing them. Because the Core AMM is a pure
//! function, replaying the AMM records from the seed reserves must land on
//! exactly the stored reserves.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use techodds_amm::ConstantProductAmm;
use techodds_types::{MarketId, ReservePair, Result, Side, TechoddsError, TradeId};

/// Which component executed a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    /// The market's own reserve pair, no fee.
    Amm,
    /// The market's liquidity pool, fee-bearing.
    Pool,
}

/// One committed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: TradeId,
    pub market_id: MarketId,
    /// 1-based position in the market's journal.
    pub sequence: u64,
    pub side: Side,
    pub venue: Venue,
    /// Amount paid by the trader, fee included.
    pub cost: Decimal,
    pub shares: Decimal,
    pub fees: Decimal,
    pub yes_price_after: Decimal,
    pub executed_at: DateTime<Utc>,
}

/// Compute the journal root over a market's records.
///
/// Covers everything except `executed_at`; the same trades in the same order
/// always hash the same.
#[must_use]
pub fn compute_journal_root(records: &[TradeRecord]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"techodds:journal_root:v1:");
    hasher.update((records.len() as u64).to_le_bytes());

    for record in records {
        hasher.update(record.trade_id.0.as_bytes());
        hasher.update(record.market_id.0.as_bytes());
        hasher.update(record.sequence.to_le_bytes());
        hasher.update([match record.side {
            Side::Yes => 0u8,
            Side::No => 1u8,
        }]);
        hasher.update([match record.venue {
            Venue::Amm => 0u8,
            Venue::Pool => 1u8,
        }]);
        hasher.update(record.cost.to_string().as_bytes());
        hasher.update(record.shares.to_string().as_bytes());
        hasher.update(record.fees.to_string().as_bytes());
        hasher.update(record.yes_price_after.to_string().as_bytes());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Hex form of [`compute_journal_root`], for logs and storage.
#[must_use]
pub fn journal_root_hex(records: &[TradeRecord]) -> String {
    hex::encode(compute_journal_root(records))
}

/// Verify that `expected_root` matches the records.
#[must_use]
pub fn verify_journal_root(records: &[TradeRecord], expected_root: &[u8; 32]) -> bool {
    compute_journal_root(records) == *expected_root
}

/// Re-execute the AMM-venue records against `seed` and return the resulting
/// reserves. Pool-venue records do not touch the AMM reserves and are skipped.
///
/// # Errors
/// Propagates any trade error, and returns `InvariantViolation` if a replayed
/// trade yields different shares than were recorded.
pub fn replay_amm_trades(
    amm: &ConstantProductAmm,
    seed: ReservePair,
    records: &[TradeRecord],
) -> Result<ReservePair> {
    let mut reserves = seed;
    for record in records.iter().filter(|r| r.venue == Venue::Amm) {
        let outcome = amm.execute_trade(record.side, record.cost, &reserves)?;
        if outcome.shares_received != record.shares {
            return Err(TechoddsError::InvariantViolation {
                reason: format!(
                    "replay of {} produced {} shares, journal has {}",
                    record.trade_id, outcome.shares_received, record.shares
                ),
            });
        }
        reserves = outcome.new_reserves;
    }
    Ok(reserves)
}
