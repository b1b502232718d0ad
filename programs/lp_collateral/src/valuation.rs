//! Fair LP valuation
//!
//! Spot reserves can be pushed around inside a single transaction, so the LP
//! price is never derived from them directly. Instead the constant-product
//! invariant `k = R0 * R1` is rebalanced to the external price ratio and the
//! resulting fair reserves are valued at feed prices.

use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::CollateralError;
use crate::math::{mul_div, mul_fix, normalize_amount, sqrt_mul};
use crate::oracle::FeedObservation;

/// Raw pool state as read from the vaults and the LP mint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub reserve0: u64,
    pub reserve1: u64,
    pub total_supply: u64,
}

/// Pool state in `FIX_ONE` scaled whole tokens
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizedPool {
    pub reserve0: u128,
    pub reserve1: u128,
    pub supply: u128,
}

impl NormalizedPool {
    pub fn from_snapshot(
        snapshot: &PoolSnapshot,
        token0_decimals: u8,
        token1_decimals: u8,
        lp_decimals: u8,
    ) -> Result<Self> {
        Ok(Self {
            reserve0: normalize_amount(snapshot.reserve0, token0_decimals)?,
            reserve1: normalize_amount(snapshot.reserve1, token1_decimals)?,
            supply: normalize_amount(snapshot.total_supply, lp_decimals)?,
        })
    }
}

/// USD prices of the two pooled tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPrices {
    pub token0: u128,
    pub token1: u128,
}

/// Everything one call observes: pool state, feed readings and the clock
#[derive(Clone, Debug, Default)]
pub struct MarketSnapshot {
    pub pool: PoolSnapshot,
    pub token0_feeds: Vec<FeedObservation>,
    pub token1_feeds: Vec<FeedObservation>,
    pub target_feed: Option<FeedObservation>,
    pub now: i64,
}

/// A USD value that does not fit is a price problem, not an arithmetic one
fn out_of_range(_: Error) -> Error {
    error!(CollateralError::PriceOutsideRange)
}

/// `a * pa + b * pb` in USD
fn value_of(a: u128, price_a: u128, b: u128, price_b: u128) -> Result<u128> {
    mul_fix(a, price_a)
        .map_err(out_of_range)?
        .checked_add(mul_fix(b, price_b).map_err(out_of_range)?)
        .ok_or_else(|| error!(CollateralError::PriceOutsideRange))
}

/// USD value of the spot reserves: `R0 * p0 + R1 * p1`
pub fn total_liquidity(pool: &NormalizedPool, prices: &TokenPrices) -> Result<u128> {
    value_of(pool.reserve0, prices.token0, pool.reserve1, prices.token1)
}

/// Reserves rebalanced to the feed price ratio while keeping `k`.
///
/// `r0 * r1 = R0 * R1` and `r0 / r1 = p1 / p0`, i.e.
/// `r0 = sqrt(R0 * R1 * p1 / p0)` and `r1 = sqrt(R0 * R1 * p0 / p1)`.
pub fn fair_reserves(pool: &NormalizedPool, prices: &TokenPrices) -> Result<(u128, u128)> {
    require!(
        prices.token0 > 0 && prices.token1 > 0,
        CollateralError::PriceOutsideRange
    );

    let fair0 = sqrt_mul(
        mul_div(pool.reserve0, prices.token1, prices.token0).map_err(out_of_range)?,
        pool.reserve1,
    );
    let fair1 = sqrt_mul(
        mul_div(pool.reserve1, prices.token0, prices.token1).map_err(out_of_range)?,
        pool.reserve0,
    );
    Ok((fair0, fair1))
}

/// USD value of the fair reserves, `2 * sqrt(k * p0 * p1)` up to rounding
pub fn fair_value(pool: &NormalizedPool, prices: &TokenPrices) -> Result<u128> {
    let (fair0, fair1) = fair_reserves(pool, prices)?;
    value_of(fair0, prices.token0, fair1, prices.token1)
}

/// Manipulation-resistant USD price of one LP token
pub fn lp_token_price(pool: &NormalizedPool, prices: &TokenPrices) -> Result<u128> {
    let value = fair_value(pool, prices)?;
    if pool.supply == 0 {
        return Ok(0);
    }
    mul_div(value, FIX_ONE, pool.supply).map_err(out_of_range)
}

/// USD value of one sqrt(token0 * token1) basket unit
pub fn reference_unit_price(prices: &TokenPrices) -> u128 {
    sqrt_mul(prices.token0, prices.token1)
}

/// Reference units per LP token.
///
/// The fair value divided by the basket price reduces to `2 * sqrt(R0 * R1)`,
/// so the ratio depends on the pool alone and only falls if `k` per LP token
/// falls.
pub fn ref_per_tok(pool: &NormalizedPool) -> Result<u128> {
    if pool.supply == 0 {
        return Ok(0);
    }
    let units = sqrt_mul(pool.reserve0, pool.reserve1)
        .checked_mul(2)
        .ok_or_else(|| error!(CollateralError::MathOverflow))?;
    mul_div(units, FIX_ONE, pool.supply)
}
