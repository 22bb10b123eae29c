//! Price-history samples appended after every committed trade.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PriceQuote;

/// One point on a market's price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    pub yes_price: Decimal,
    pub no_price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl PriceSample {
    /// Sample a quote now.
    #[must_use]
    pub fn now(quote: PriceQuote) -> Self {
        Self::at(quote, Utc::now())
    }

    #[must_use]
    pub fn at(quote: PriceQuote, timestamp: DateTime<Utc>) -> Self {
        Self {
            yes_price: quote.yes_price,
            no_price: quote.no_price,
            timestamp,
        }
    }

    #[must_use]
    pub fn quote(&self) -> PriceQuote {
        PriceQuote {
            yes_price: self.yes_price,
            no_price: self.no_price,
        }
    }
}
