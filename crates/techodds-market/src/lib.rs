//! # techodds-market
//!
//! The **market shell** around the pure pricing engine.
//!
//! The Core AMM and the pool manager are functions from state to state; this
//! crate is where that state lives and where the rules the engine leaves to
//! its caller are enforced:
//!
//! - [`TradingGate`]: trades and deposits only while a market is OPEN
//! - [`MarketRegistry`]: per-market state, version-checked trades, price
//!   history, resolution
//! - [`journal`]: append-only trade records, a SHA-256 journal root, and
//!   deterministic replay of AMM trades
//! - [`codec`]: storage precision (amounts 2 dp, prices 4 dp)
//!
//! ## Trade flow
//!
//! ```text
//! snapshot(id) ─► buy(id, request, version)
//!                   ├─ version check   (VersionConflict)
//!                   ├─ gate            (MarketNotOpen)
//!                   ├─ pool if funded, else AMM
//!                   └─ commit: state, version+1, price sample, journal record
//! ```

pub mod codec;
pub mod gate;
pub mod journal;
pub mod market;
pub mod registry;

pub use codec::{PersistedPool, PersistedQuote, PersistedReserves};
pub use gate::TradingGate;
pub use journal::{TradeRecord, Venue, compute_journal_root, replay_amm_trades, verify_journal_root};
pub use market::{Market, MarketSnapshot};
pub use registry::{MarketRegistry, TradeReceipt};
