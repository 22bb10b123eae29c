//! Price derivation from reserves.

use rust_decimal::Decimal;
use techodds_types::{PriceQuote, ReservePair};

/// Quote both outcomes from a reserve pair.
///
/// `yes_price = no_reserve / (yes_reserve + no_reserve)` and `no_price` is
/// its complement, so the two always sum to exactly one. With no liquidity
/// (or an unusable pair) the quote falls back to 0.5 / 0.5. Never fails.
#[must_use]
pub fn quote(reserves: &ReservePair) -> PriceQuote {
    if reserves.yes_reserve < Decimal::ZERO || reserves.no_reserve < Decimal::ZERO {
        tracing::warn!(
            yes = %reserves.yes_reserve,
            no = %reserves.no_reserve,
            "Negative reserve in quote; returning fallback prices"
        );
        return PriceQuote::FALLBACK;
    }
    let Ok(total) = reserves.total() else {
        return PriceQuote::FALLBACK;
    };
    if total.is_zero() {
        return PriceQuote::FALLBACK;
    }
    let yes_price = reserves.no_reserve / total;
    PriceQuote {
        yes_price,
        no_price: Decimal::ONE - yes_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(yes: i64, no: i64) -> ReservePair {
        ReservePair::new(Decimal::new(yes, 0), Decimal::new(no, 0))
    }

    #[test]
    fn equal_liquidity_equal_prices() {
        let q = quote(&pair(500, 500));
        assert_eq!(q.yes_price, Decimal::new(5, 1));
        assert_eq!(q.no_price, Decimal::new(5, 1));
    }

    #[test]
    fn unequal_liquidity() {
        let q = quote(&pair(300, 700));
        assert_eq!(q.yes_price, Decimal::new(7, 1));
        assert_eq!(q.no_price, Decimal::new(3, 1));
        assert_eq!(q.sum(), Decimal::ONE);
    }

    #[test]
    fn zero_liquidity_falls_back() {
        assert_eq!(quote(&pair(0, 0)), PriceQuote::FALLBACK);
    }

    #[test]
    fn one_sided_liquidity_is_certain() {
        let q = quote(&pair(0, 10));
        assert_eq!(q.yes_price, Decimal::ONE);
        assert_eq!(q.no_price, Decimal::ZERO);
    }

    #[test]
    fn negative_reserve_falls_back() {
        assert_eq!(quote(&pair(-5, 10)), PriceQuote::FALLBACK);
    }

    #[test]
    fn overflowing_total_falls_back() {
        let r = ReservePair::new(Decimal::MAX, Decimal::MAX);
        assert_eq!(quote(&r), PriceQuote::FALLBACK);
    }

    #[test]
    fn thirds_sum_to_one() {
        let q = quote(&pair(1, 2));
        assert_eq!(q.sum(), Decimal::ONE);
        assert!(q.yes_price > q.no_price);
    }
}
