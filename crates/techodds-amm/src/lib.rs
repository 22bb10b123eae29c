//! # techodds-amm
//!
//! **Core constant-product AMM for binary prediction markets.**
//!
//! The core is the pure compute layer. It takes a [`ReservePair`] and a
//! trade and produces the next state. It has:
//!
//! - **Zero side effects**: no storage, no balances, no lifecycle checks
//! - **Deterministic output**: same input -> same output, exact decimals
//! - **No partial application**: a trade either returns a full new state
//!   or an error
//! - **Shared invariants**: the pool crate reuses [`swap`] and the
//!   [`invariant`] helpers
//!
//! [`ReservePair`]: techodds_types::ReservePair

pub mod amm;
pub mod invariant;
pub mod quote;
pub mod swap;

pub use amm::ConstantProductAmm;
pub use quote::quote;
pub use swap::{Swap, SwapLimits, swap};
