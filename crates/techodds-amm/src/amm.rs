//! The Core AMM: stateless pricing and trade execution over a caller-owned
//! [`ReservePair`].

use rust_decimal::{Decimal, MathematicalOps};
use techodds_types::{
    EngineConfig, PriceQuote, ReservePair, Result, Side, TechoddsError, TradeOutcome, TradeRequest,
};

use crate::invariant::{ensure_positive_amount, ensure_tradable};
use crate::quote::quote;
use crate::swap::{SwapLimits, swap};

/// Constant-product market maker for a single YES/NO reserve pair.
///
/// Holds configuration only. Every call is a pure function from the input
/// reserves to a new state; persisting that state is the caller's job.
#[derive(Debug, Clone)]
pub struct ConstantProductAmm {
    config: EngineConfig,
    limits: SwapLimits,
}

impl ConstantProductAmm {
    /// Build an AMM from a validated config.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let limits = SwapLimits::from(&config);
        Ok(Self { config, limits })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seed a market. Any positive pair is legal; equal seeds quote 0.5 / 0.5.
    pub fn initialize(&self, initial_yes: Decimal, initial_no: Decimal) -> Result<ReservePair> {
        ensure_positive_amount(initial_yes)?;
        ensure_positive_amount(initial_no)?;
        Ok(ReservePair::new(initial_yes, initial_no))
    }

    /// Seed a market with the configured default reserves (500 / 500).
    #[must_use]
    pub fn initialize_default(&self) -> ReservePair {
        ReservePair::new(
            self.config.initial_yes_reserve,
            self.config.initial_no_reserve,
        )
    }

    /// Current prices. Never fails.
    #[must_use]
    pub fn quote(&self, reserves: &ReservePair) -> PriceQuote {
        quote(reserves)
    }

    /// Buy `side` for `amount` against `reserves`.
    ///
    /// On success the trader pays exactly `amount` and `k` is conserved.
    /// On failure nothing is returned and the caller's state stays valid.
    pub fn execute_trade(
        &self,
        side: Side,
        amount: Decimal,
        reserves: &ReservePair,
    ) -> Result<TradeOutcome> {
        let swap = swap(side, amount, reserves, &self.limits).inspect_err(|err| {
            tracing::debug!(%side, %amount, error = %err, "AMM trade rejected");
        })?;

        tracing::debug!(
            %side,
            cost = %amount,
            shares = %swap.shares_out,
            yes_price = %swap.new_quote.yes_price,
            "AMM trade executed"
        );

        Ok(TradeOutcome {
            new_reserves: swap.new_reserves,
            shares_received: swap.shares_out,
            cost_paid: amount,
            new_quote: swap.new_quote,
        })
    }

    /// [`execute_trade`](Self::execute_trade) taking a [`TradeRequest`].
    pub fn execute(&self, request: &TradeRequest, reserves: &ReservePair) -> Result<TradeOutcome> {
        self.execute_trade(request.side, request.amount, reserves)
    }

    /// Largest cost a single `side` purchase may have before the bought
    /// outcome reaches the price ceiling.
    ///
    /// Useful for the "try a smaller amount" hint callers show on
    /// [`TechoddsError::InsufficientLiquidity`]. `None` when `side` already
    /// quotes above the ceiling, so no purchase crosses it.
    pub fn max_trade_amount(&self, side: Side, reserves: &ReservePair) -> Result<Option<Decimal>> {
        ensure_tradable(reserves)?;
        let p = self.config.max_outcome_price;
        if quote(reserves).price(side) > p {
            return Ok(None);
        }
        // Price of `side` is p = paid' / (paid' + bought') with
        // paid' * bought' = k, so paid' = sqrt(k) * sqrt(p / (1 - p)).
        let overflow = || TechoddsError::Overflow {
            context: "max trade amount",
        };
        let root_k = reserves.constant_product()?.sqrt().ok_or_else(overflow)?;
        let root_odds = p
            .checked_div(Decimal::ONE - p)
            .and_then(|odds| odds.sqrt())
            .ok_or_else(overflow)?;
        let paid_max = root_k.checked_mul(root_odds).ok_or_else(overflow)?;
        let room = paid_max - reserves.reserve(side.opposite());
        Ok(Some(room.max(Decimal::ZERO)))
    }
}

impl Default for ConstantProductAmm {
    fn default() -> Self {
        let config = EngineConfig::default();
        let limits = SwapLimits::from(&config);
        Self { config, limits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn close(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn initialize_default_is_500_500_at_half() {
        let amm = ConstantProductAmm::default();
        let r = amm.initialize_default();
        assert_eq!(r, ReservePair::new(dec(500), dec(500)));
        let q = amm.quote(&r);
        assert_eq!(q.yes_price, Decimal::new(5, 1));
        assert_eq!(q.no_price, Decimal::new(5, 1));
    }

    #[test]
    fn initialize_accepts_any_positive_seed() {
        let amm = ConstantProductAmm::default();
        let r = amm.initialize(dec(200), dec(800)).unwrap();
        assert_eq!(amm.quote(&r).yes_price, Decimal::new(8, 1));
    }

    #[test]
    fn initialize_rejects_non_positive_seed() {
        let amm = ConstantProductAmm::default();
        assert!(matches!(
            amm.initialize(dec(0), dec(500)),
            Err(TechoddsError::InvalidAmount { .. })
        ));
        assert!(amm.initialize(dec(500), dec(-1)).is_err());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut cfg = EngineConfig::default();
        cfg.fee_rate = dec(2);
        assert!(ConstantProductAmm::new(cfg).is_err());
    }

    #[test]
    fn yes_trade_of_100_on_500_500() {
        let amm = ConstantProductAmm::default();
        let out = amm
            .execute_trade(Side::Yes, dec(100), &amm.initialize_default())
            .unwrap();

        // shares = 500 - 250000 / 600
        let expected_shares = Decimal::new(8_333_333, 5);
        assert!(close(out.shares_received, expected_shares, Decimal::new(1, 4)));
        assert_eq!(out.cost_paid, dec(100));
        assert_eq!(out.new_reserves.no_reserve, dec(600));
        assert!(out.new_quote.yes_price > Decimal::new(5, 1));
        assert!(out.new_quote.no_price < Decimal::new(5, 1));
        assert_eq!(out.new_quote.sum(), Decimal::ONE);
    }

    #[test]
    fn no_trade_raises_no_price() {
        let amm = ConstantProductAmm::default();
        let out = amm
            .execute_trade(Side::No, dec(100), &amm.initialize_default())
            .unwrap();
        assert!(out.new_quote.no_price > Decimal::new(5, 1));
        assert!(out.new_quote.yes_price < Decimal::new(5, 1));
    }

    #[test]
    fn constant_product_is_conserved() {
        let amm = ConstantProductAmm::default();
        let r = amm.initialize_default();
        let out = amm.execute_trade(Side::Yes, dec(100), &r).unwrap();
        let k_after = out.new_reserves.constant_product().unwrap();
        assert!(close(k_after, dec(250_000), Decimal::new(1, 12)));
    }

    #[test]
    fn non_positive_amount_is_invalid() {
        let amm = ConstantProductAmm::default();
        let r = amm.initialize_default();
        for amount in [dec(0), dec(-100), Decimal::new(-1, 10)] {
            let err = amm.execute_trade(Side::Yes, amount, &r).unwrap_err();
            assert!(matches!(err, TechoddsError::InvalidAmount { .. }));
        }
    }

    #[test]
    fn huge_trade_is_insufficient_liquidity() {
        let amm = ConstantProductAmm::default();
        let err = amm
            .execute_trade(Side::Yes, dec(10_000), &amm.initialize_default())
            .unwrap_err();
        assert!(matches!(err, TechoddsError::InsufficientLiquidity { .. }));
    }

    #[test]
    fn corrupt_reserves_are_refused() {
        let amm = ConstantProductAmm::default();
        let r = ReservePair::new(dec(0), dec(0));
        let err = amm.execute_trade(Side::No, dec(10), &r).unwrap_err();
        assert!(matches!(err, TechoddsError::CorruptState { .. }));
    }

    #[test]
    fn execute_with_request() {
        let amm = ConstantProductAmm::default();
        let req = TradeRequest::new(Side::No, dec(25));
        let out = amm.execute(&req, &amm.initialize_default()).unwrap();
        assert_eq!(out.new_reserves.yes_reserve, dec(525));
    }

    #[test]
    fn max_trade_amount_is_the_boundary() {
        let amm = ConstantProductAmm::default();
        let r = amm.initialize_default();
        let max = amm.max_trade_amount(Side::Yes, &r).unwrap().unwrap();
        // sqrt(250000 * 99) - 500 ~= 4474.94
        assert!(close(max, Decimal::new(447_494, 2), Decimal::new(1, 1)));
        assert!(amm.execute_trade(Side::Yes, max - dec(1), &r).is_ok());
        assert!(amm.execute_trade(Side::Yes, max + dec(1), &r).is_err());
    }

    #[test]
    fn max_trade_amount_on_deep_reserves() {
        let amm = ConstantProductAmm::default();
        let deep = Decimal::from(30_000_000_000_000_i64);
        let r = amm.initialize(deep, deep).unwrap();
        assert!(amm.execute_trade(Side::No, dec(1_000), &r).is_ok());
        let max = amm.max_trade_amount(Side::No, &r).unwrap().unwrap();
        assert!(max > Decimal::from(10_i64.pow(14)));
    }

    #[test]
    fn max_trade_amount_is_unbounded_past_the_ceiling() {
        let amm = ConstantProductAmm::default();
        let r = amm.initialize(dec(1), dec(200)).unwrap();
        assert_eq!(amm.max_trade_amount(Side::Yes, &r).unwrap(), None);
        assert!(amm.execute_trade(Side::Yes, Decimal::new(1, 2), &r).is_ok());
        // The cheap side is still bounded.
        assert!(amm.max_trade_amount(Side::No, &r).unwrap().is_some());
    }
}
