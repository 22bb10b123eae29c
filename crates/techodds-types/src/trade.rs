//! Trade request and outcome types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PriceQuote, ReservePair, TechoddsError};

/// One of the two complementary outcomes of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// The complementary outcome.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

impl FromStr for Side {
    type Err = TechoddsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(TechoddsError::InvalidSide(s.to_string())),
        }
    }
}

/// A buy order against the AMM.
///
/// `amount` is what the trader pays in the base currency, not the number
/// of shares received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub side: Side,
    pub amount: Decimal,
}

impl TradeRequest {
    #[must_use]
    pub fn new(side: Side, amount: Decimal) -> Self {
        Self { side, amount }
    }
}

/// Result of a successful trade. The caller persists `new_reserves` and
/// records the rest as the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub new_reserves: ReservePair,
    pub shares_received: Decimal,
    pub cost_paid: Decimal,
    /// Quote derived from `new_reserves`.
    pub new_quote: PriceQuote,
}

impl TradeOutcome {
    /// Average price paid per share.
    #[must_use]
    pub fn average_price(&self) -> Option<Decimal> {
        self.cost_paid.checked_div(self.shares_received)
    }
}
