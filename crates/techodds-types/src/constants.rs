//! System-wide constants for the TechOdds pricing engine.

/// Default seed for each side of a new market (500 YES / 500 NO).
pub const DEFAULT_SEED_RESERVE: i64 = 500;

/// Basis points scale (10,000 bps = 100%).
pub const BPS_SCALE: u32 = 4;

/// Default pool trading fee in basis points (30 bps = 0.3%).
pub const DEFAULT_FEE_BPS: i64 = 30;

/// Default ceiling on the post-trade price of the bought outcome (99%).
pub const DEFAULT_MAX_OUTCOME_PRICE_BPS: i64 = 9_900;

/// Default relative tolerance for the constant-product check, as a
/// power of ten (1e-6).
pub const DEFAULT_INVARIANT_TOLERANCE_SCALE: u32 = 6;

/// Decimal places for persisted currency amounts (reserves, fees, costs).
pub const AMOUNT_DP: u32 = 2;

/// Decimal places for persisted prices.
pub const PRICE_DP: u32 = 4;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TechOdds";
