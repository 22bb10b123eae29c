//! # techodds-pool
//!
//! **Liquidity Pool Manager** for TechOdds markets.
//!
//! A pool is tradable like the Core AMM reserve, but every trade pays a
//! configurable fee into a separate accumulator, and third parties can
//! deposit and withdraw liquidity in exchange for LP tokens.
//!
//! - [`PoolManager`]: stateless pool operations (trade, add, remove, quote)
//! - [`LpLedger`]: per-provider LP token balances
//! - [`ManagedPool`]: a pool and its ledger, committed together
//!
//! ## LP accounting
//!
//! ```text
//! supply   = sqrt(yes * no)
//! minted   = sqrt(yes' * no') - sqrt(yes * no)
//! withdraw = (lp / supply) * {yes, no, total_fees}
//! ```

pub mod ledger;
pub mod managed;
pub mod manager;

pub use ledger::LpLedger;
pub use managed::ManagedPool;
pub use manager::{LiquidityDeposit, LiquidityWithdrawal, PoolInit, PoolManager, PoolTrade};
