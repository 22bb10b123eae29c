//! # techodds-types
//!
//! Shared types, errors, and configuration for the **TechOdds** pricing
//! engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`MarketId`], [`ProviderId`], [`TradeId`]
//! - **Reserve model**: [`ReservePair`], [`PriceQuote`]
//! - **Trade model**: [`Side`], [`TradeRequest`], [`TradeOutcome`]
//! - **Pool model**: [`LiquidityPool`], [`LiquidityPosition`]
//! - **Lifecycle**: [`MarketStatus`], [`MarketLifecycle`]
//! - **History**: [`PriceSample`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`TechoddsError`] with `TO_ERR_` prefix codes
//! - **Constants**: seeds, fee and precision defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod ids;
pub mod lifecycle;
pub mod pool;
pub mod reserves;
pub mod trade;

pub use config::*;
pub use error::*;
pub use history::*;
pub use ids::*;
pub use lifecycle::*;
pub use pool::*;
pub use reserves::*;
pub use trade::*;

// Constants are accessed via `techodds_types::constants::FOO`.
