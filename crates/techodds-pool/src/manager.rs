//! Stateless pool operations.
//!
//! Every method takes the current [`LiquidityPool`] by reference and returns
//! the next one. Nothing is applied on error.

use rust_decimal::Decimal;
use techodds_amm::invariant::ensure_positive_amount;
use techodds_amm::{SwapLimits, quote, swap};
use techodds_types::{
    EngineConfig, LiquidityPool, LiquidityPosition, PriceQuote, Result, Side, TechoddsError,
};

/// Result of seeding a new pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolInit {
    pub pool: LiquidityPool,
    pub lp_tokens_minted: Decimal,
}

/// Result of a fee-bearing trade against a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTrade {
    pub new_pool: LiquidityPool,
    pub shares_received: Decimal,
    /// Fee taken from this trade and added to `total_fees`.
    pub fees: Decimal,
    pub new_quote: PriceQuote,
}

/// Result of a deposit.
///
/// A deposit into a non-empty pool is re-proportioned to the pool's ratio;
/// the unused part of the larger side is reported as a refund instead of
/// being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityDeposit {
    pub new_pool: LiquidityPool,
    pub lp_tokens_minted: Decimal,
    pub yes_deposited: Decimal,
    pub no_deposited: Decimal,
    pub yes_refund: Decimal,
    pub no_refund: Decimal,
}

/// Result of burning LP tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityWithdrawal {
    pub new_pool: LiquidityPool,
    pub yes_amount: Decimal,
    pub no_amount: Decimal,
    pub fees_share: Decimal,
}

/// Liquidity Pool Manager.
///
/// Trades pay `fee_rate` of their amount into the pool's fee accumulator;
/// the remainder goes through the same constant-product swap as the Core
/// AMM. LP tokens track `sqrt(yes * no)`.
#[derive(Debug, Clone)]
pub struct PoolManager {
    fee_rate: Decimal,
    limits: SwapLimits,
}

impl PoolManager {
    /// Build a manager from a validated config.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fee_rate: config.fee_rate,
            limits: SwapLimits::from(config),
        })
    }

    #[must_use]
    pub fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    /// Seed a pool. Mints `sqrt(initial_yes * initial_no)` LP tokens.
    pub fn initialize_pool(&self, initial_yes: Decimal, initial_no: Decimal) -> Result<PoolInit> {
        ensure_positive_amount(initial_yes)?;
        ensure_positive_amount(initial_no)?;
        let pool = LiquidityPool {
            yes_liquidity: initial_yes,
            no_liquidity: initial_no,
            total_fees: Decimal::ZERO,
        };
        let lp_tokens_minted = pool.lp_supply()?;
        tracing::info!(
            yes = %initial_yes,
            no = %initial_no,
            lp = %lp_tokens_minted,
            "Liquidity pool initialized"
        );
        Ok(PoolInit {
            pool,
            lp_tokens_minted,
        })
    }

    /// Buy `side` for `amount` against the pool, keeping the fee.
    pub fn execute_pool_trade(
        &self,
        side: Side,
        amount: Decimal,
        pool: &LiquidityPool,
    ) -> Result<PoolTrade> {
        pool.validate()?;
        ensure_positive_amount(amount)?;

        let fees = amount
            .checked_mul(self.fee_rate)
            .ok_or(TechoddsError::Overflow { context: "pool fee" })?;
        let amount_after_fees = amount - fees;
        let swap = swap(side, amount_after_fees, &pool.reserves(), &self.limits)?;

        let new_pool = LiquidityPool {
            yes_liquidity: swap.new_reserves.yes_reserve,
            no_liquidity: swap.new_reserves.no_reserve,
            total_fees: pool
                .total_fees
                .checked_add(fees)
                .ok_or(TechoddsError::Overflow {
                    context: "pool fee accumulator",
                })?,
        };

        tracing::debug!(
            %side,
            %amount,
            %fees,
            shares = %swap.shares_out,
            yes_price = %swap.new_quote.yes_price,
            "Pool trade executed"
        );

        Ok(PoolTrade {
            new_pool,
            shares_received: swap.shares_out,
            fees,
            new_quote: swap.new_quote,
        })
    }

    /// Deposit liquidity.
    ///
    /// Into an empty pool, any ratio becomes the new baseline. Otherwise the
    /// deposit is cut down to the pool's YES:NO ratio so the price does not
    /// move: if the NO amount implied by `yes_amount` is below `no_amount`,
    /// `yes_amount` is the base; otherwise `no_amount` is.
    pub fn add_liquidity(
        &self,
        yes_amount: Decimal,
        no_amount: Decimal,
        pool: &LiquidityPool,
    ) -> Result<LiquidityDeposit> {
        pool.validate()?;
        ensure_positive_amount(yes_amount)?;
        ensure_positive_amount(no_amount)?;

        let (yes_deposited, no_deposited) = if pool.is_empty() {
            (yes_amount, no_amount)
        } else {
            let implied_no = scale(yes_amount, pool.no_liquidity, pool.yes_liquidity)?;
            if implied_no < no_amount {
                (yes_amount, implied_no)
            } else {
                let implied_yes = scale(no_amount, pool.yes_liquidity, pool.no_liquidity)?;
                (implied_yes, no_amount)
            }
        };

        let deposit_overflow = || TechoddsError::Overflow {
            context: "pool deposit",
        };
        let new_pool = LiquidityPool {
            yes_liquidity: pool
                .yes_liquidity
                .checked_add(yes_deposited)
                .ok_or_else(deposit_overflow)?,
            no_liquidity: pool
                .no_liquidity
                .checked_add(no_deposited)
                .ok_or_else(deposit_overflow)?,
            total_fees: pool.total_fees,
        };
        let lp_tokens_minted = new_pool.lp_supply()? - pool.lp_supply()?;
        if lp_tokens_minted <= Decimal::ZERO {
            return Err(TechoddsError::InvalidAmount {
                amount: lp_tokens_minted,
            });
        }

        tracing::debug!(
            yes = %yes_deposited,
            no = %no_deposited,
            lp = %lp_tokens_minted,
            "Liquidity added"
        );

        Ok(LiquidityDeposit {
            new_pool,
            lp_tokens_minted,
            yes_deposited,
            no_deposited,
            yes_refund: yes_amount - yes_deposited,
            no_refund: no_amount - no_deposited,
        })
    }

    /// Burn `lp_tokens` out of `total_lp_supply`, returning the same share of
    /// both reserves and of the accrued fees.
    ///
    /// The manager does not know who holds the tokens; see
    /// [`ManagedPool`](crate::ManagedPool) for the ledger-backed variant.
    pub fn remove_liquidity(
        &self,
        lp_tokens: Decimal,
        pool: &LiquidityPool,
        total_lp_supply: Decimal,
    ) -> Result<LiquidityWithdrawal> {
        pool.validate()?;
        if lp_tokens <= Decimal::ZERO || lp_tokens > total_lp_supply {
            return Err(TechoddsError::InvalidShare {
                lp_tokens,
                total_supply: total_lp_supply,
            });
        }

        let share = lp_tokens / total_lp_supply;
        let yes_amount = pool.yes_liquidity * share;
        let no_amount = pool.no_liquidity * share;
        let fees_share = pool.total_fees * share;

        let new_pool = LiquidityPool {
            yes_liquidity: pool.yes_liquidity - yes_amount,
            no_liquidity: pool.no_liquidity - no_amount,
            total_fees: pool.total_fees - fees_share,
        };

        tracing::debug!(
            lp = %lp_tokens,
            %share,
            yes = %yes_amount,
            no = %no_amount,
            fees = %fees_share,
            "Liquidity removed"
        );

        Ok(LiquidityWithdrawal {
            new_pool,
            yes_amount,
            no_amount,
            fees_share,
        })
    }

    /// Prices implied by the pool reserves. Fees do not enter the price.
    #[must_use]
    pub fn pool_prices(&self, pool: &LiquidityPool) -> PriceQuote {
        quote(&pool.reserves())
    }

    /// The slice of `pool` owned by a holder of `user_lp` tokens.
    pub fn position(
        &self,
        user_lp: Decimal,
        total_lp: Decimal,
        pool: &LiquidityPool,
    ) -> Result<LiquidityPosition> {
        if total_lp <= Decimal::ZERO {
            return Ok(LiquidityPosition::zero());
        }
        if user_lp < Decimal::ZERO || user_lp > total_lp {
            return Err(TechoddsError::InvalidShare {
                lp_tokens: user_lp,
                total_supply: total_lp,
            });
        }
        let share = user_lp / total_lp;
        Ok(LiquidityPosition {
            share,
            yes_tokens: pool.yes_liquidity * share,
            no_tokens: pool.no_liquidity * share,
            fees_earned: pool.total_fees * share,
        })
    }
}

impl Default for PoolManager {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            fee_rate: config.fee_rate,
            limits: SwapLimits::from(&config),
        }
    }
}

/// `amount * numerator / denominator`, multiplying first.
fn scale(amount: Decimal, numerator: Decimal, denominator: Decimal) -> Result<Decimal> {
    amount
        .checked_mul(numerator)
        .and_then(|v| v.checked_div(denominator))
        .ok_or(TechoddsError::Overflow {
            context: "deposit ratio",
        })
}
