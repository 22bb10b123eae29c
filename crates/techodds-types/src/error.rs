//! Error types for the TechOdds pricing engine.
//!
//! All errors use the `TO_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Trade errors
//! - 2xx: Liquidity / LP-share errors
//! - 3xx: Reserve state errors
//! - 4xx: Market lifecycle errors
//! - 9xx: General errors
//!
//! Every failure is synchronous and non-retryable: the same input always
//! fails the same way.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{MarketId, MarketStatus, ProviderId};

/// Central error enum for all TechOdds operations.
#[derive(Debug, Error)]
pub enum TechoddsError {
    // =================================================================
    // Trade Errors (1xx)
    // =================================================================
    /// Trade or deposit amount is zero or negative.
    #[error("TO_ERR_100: Invalid amount: {amount} (must be positive)")]
    InvalidAmount { amount: Decimal },

    /// The trade is too large for the current reserves.
    #[error("TO_ERR_101: Insufficient liquidity: {reason}")]
    InsufficientLiquidity { reason: String },

    /// A trade side string was neither "yes" nor "no".
    #[error("TO_ERR_102: Invalid side: {0:?}")]
    InvalidSide(String),

    // =================================================================
    // Liquidity Errors (2xx)
    // =================================================================
    /// LP tokens to burn are non-positive or exceed the supply.
    #[error("TO_ERR_200: Invalid LP share: {lp_tokens} of supply {total_supply}")]
    InvalidShare {
        lp_tokens: Decimal,
        total_supply: Decimal,
    },

    /// A provider tried to burn more LP tokens than the ledger holds for them.
    #[error("TO_ERR_201: Insufficient LP balance for {provider}: need {needed}, have {available}")]
    InsufficientLpBalance {
        provider: ProviderId,
        needed: Decimal,
        available: Decimal,
    },

    // =================================================================
    // State Errors (3xx)
    // =================================================================
    /// Input reserves were already invalid. Points at a persistence bug;
    /// the market must not be repaired silently.
    #[error("TO_ERR_300: Corrupt reserve state: {reason}")]
    CorruptState { reason: String },

    /// A computed state broke the constant-product or price invariant.
    #[error("TO_ERR_301: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// Decimal arithmetic overflowed.
    #[error("TO_ERR_302: Arithmetic overflow in {context}")]
    Overflow { context: &'static str },

    // =================================================================
    // Market Errors (4xx)
    // =================================================================
    /// No market with this id is registered.
    #[error("TO_ERR_400: Market not found: {0}")]
    MarketNotFound(MarketId),

    /// Trading or depositing was attempted on a market that is not open.
    #[error("TO_ERR_401: Market {market} is not open for trading (status {status})")]
    MarketNotOpen {
        market: MarketId,
        status: MarketStatus,
    },

    /// The requested lifecycle transition is not allowed.
    #[error("TO_ERR_402: Invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: MarketStatus, to: MarketStatus },

    /// The caller's view of the market is stale; another trade committed first.
    #[error("TO_ERR_403: Version conflict on {market}: expected {expected}, current {current}")]
    VersionConflict {
        market: MarketId,
        expected: u64,
        current: u64,
    },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// A persisted decimal field could not be parsed.
    #[error("TO_ERR_900: Parse error in field {field}: {reason}")]
    Parse { field: &'static str, reason: String },

    /// Configuration error (invalid values, malformed file).
    #[error("TO_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("TO_ERR_902: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TechoddsError>;

impl TechoddsError {
    /// Whether the error was caused by the caller's input rather than by
    /// broken state inside the engine or its persistence layer.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::InsufficientLiquidity { .. }
                | Self::InvalidSide(_)
                | Self::InvalidShare { .. }
                | Self::InsufficientLpBalance { .. }
                | Self::MarketNotFound(_)
                | Self::MarketNotOpen { .. }
                | Self::InvalidTransition { .. }
                | Self::VersionConflict { .. }
                | Self::Parse { .. }
        )
    }

    /// HTTP status code a handler should surface for this error.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MarketNotFound(_) => 404,
            Self::VersionConflict { .. } => 409,
            e if e.is_caller_error() => 400,
            _ => 500,
        }
    }
}

impl From<serde_json::Error> for TechoddsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
