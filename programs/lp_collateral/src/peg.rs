//! Peg monitoring
//!
//! Deviations are fractions scaled by `FIX_ONE` (5% = `FIX_ONE / 20`) and are
//! compared inclusively against the configured default threshold.

use anchor_lang::prelude::*;
use crate::errors::CollateralError;
use crate::math::{div_fix, mul_div};
use crate::constants::FIX_ONE;
use crate::valuation::{NormalizedPool, TokenPrices};

/// Which peg checks a collateral variant runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PegChecks {
    /// Each token's price against the target unit
    pub target_peg: bool,
    /// Pool-implied exchange rate against the feed-implied one
    pub cross_asset: bool,
}

/// `|a - b| / b`
pub fn deviation(a: u128, b: u128) -> Result<u128> {
    require!(b > 0, CollateralError::PriceOutsideRange);
    mul_div(a.abs_diff(b), FIX_ONE, b)
}

pub fn within_tolerance(a: u128, b: u128, threshold: u128) -> Result<bool> {
    Ok(deviation(a, b)? <= threshold)
}

/// Both tokens trade within `threshold` of the target unit's price
pub fn target_peg_holds(prices: &TokenPrices, peg_price: u128, threshold: u128) -> Result<bool> {
    for (token, price) in [(0, prices.token0), (1, prices.token1)] {
        if !within_tolerance(price, peg_price, threshold)? {
            msg!("Token{} off target peg: price {}, peg {}", token, price, peg_price);
            return Ok(false);
        }
    }
    Ok(true)
}

/// The pool's exchange rate (token1 per token0) agrees with the feeds.
///
/// An empty side has no exchange rate and fails with `PriceOutsideRange`.
pub fn cross_asset_peg_holds(
    pool: &NormalizedPool,
    prices: &TokenPrices,
    threshold: u128,
) -> Result<bool> {
    require!(
        pool.reserve0 > 0 && pool.reserve1 > 0,
        CollateralError::PriceOutsideRange
    );

    let pool_ratio = div_fix(pool.reserve1, pool.reserve0)?;
    let price_ratio = div_fix(prices.token0, prices.token1)?;

    let holds = within_tolerance(pool_ratio, price_ratio, threshold)?;
    if !holds {
        msg!("Pool ratio {} diverges from price ratio {}", pool_ratio, price_ratio);
    }
    Ok(holds)
}

/// Run the selected checks. `Ok(false)` means a deviation is present.
pub fn evaluate(
    checks: PegChecks,
    pool: &NormalizedPool,
    prices: &TokenPrices,
    peg_price: u128,
    threshold: u128,
) -> Result<bool> {
    if checks.target_peg && !target_peg_holds(prices, peg_price, threshold)? {
        return Ok(false);
    }
    if checks.cross_asset && !cross_asset_peg_holds(pool, prices, threshold)? {
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_PERCENT: u128 = FIX_ONE / 20;

    fn prices(token0: u128, token1: u128) -> TokenPrices {
        TokenPrices { token0, token1 }
    }

    fn pool(reserve0: u128, reserve1: u128) -> NormalizedPool {
        NormalizedPool { reserve0, reserve1, supply: FIX_ONE }
    }

    #[test]
    fn test_deviation() {
        assert_eq!(deviation(FIX_ONE, FIX_ONE).unwrap(), 0);
        // $0.80 against $1.00
        assert_eq!(deviation(FIX_ONE * 8 / 10, FIX_ONE).unwrap(), FIX_ONE / 5);
        // Relative to the second argument
        assert_eq!(deviation(2 * FIX_ONE, FIX_ONE).unwrap(), FIX_ONE);
        assert_eq!(deviation(FIX_ONE, 2 * FIX_ONE).unwrap(), FIX_ONE / 2);
    }

    #[test]
    fn test_deviation_zero_base() {
        assert_eq!(
            deviation(FIX_ONE, 0).unwrap_err(),
            CollateralError::PriceOutsideRange.into()
        );
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        let at_threshold = FIX_ONE + FIVE_PERCENT;
        assert!(within_tolerance(at_threshold, FIX_ONE, FIVE_PERCENT).unwrap());
        assert!(!within_tolerance(at_threshold + 1, FIX_ONE, FIVE_PERCENT).unwrap());
        assert!(within_tolerance(FIX_ONE - FIVE_PERCENT, FIX_ONE, FIVE_PERCENT).unwrap());
    }

    #[test]
    fn test_target_peg() {
        let peg = FIX_ONE;
        assert!(target_peg_holds(&prices(FIX_ONE, FIX_ONE * 99 / 100), peg, FIVE_PERCENT).unwrap());

        // DAI at $0.80
        assert!(!target_peg_holds(&prices(FIX_ONE * 8 / 10, FIX_ONE), peg, FIVE_PERCENT).unwrap());
        // Second token off peg
        assert!(!target_peg_holds(&prices(FIX_ONE, FIX_ONE * 12 / 10), peg, FIVE_PERCENT).unwrap());
    }

    #[test]
    fn test_target_peg_against_target_feed() {
        // Both tokens priced near ETH at $1,300
        let peg = 1_300 * FIX_ONE;
        let near = prices(1_310 * FIX_ONE, 1_290 * FIX_ONE);
        assert!(target_peg_holds(&near, peg, FIVE_PERCENT).unwrap());
        assert!(!target_peg_holds(&prices(FIX_ONE, FIX_ONE), peg, FIVE_PERCENT).unwrap());
    }

    #[test]
    fn test_cross_asset_peg() {
        // 100 ETH / 160,000 USDC, ETH at $1,600
        let balanced = pool(100 * FIX_ONE, 160_000 * FIX_ONE);
        let feeds = prices(1_600 * FIX_ONE, FIX_ONE);
        assert!(cross_asset_peg_holds(&balanced, &feeds, FIVE_PERCENT).unwrap());

        // Pool still quotes $1,600 while feeds say $2,000
        let moved = prices(2_000 * FIX_ONE, FIX_ONE);
        assert!(!cross_asset_peg_holds(&balanced, &moved, FIVE_PERCENT).unwrap());
    }

    #[test]
    fn test_cross_asset_peg_empty_side() {
        let feeds = prices(FIX_ONE, FIX_ONE);
        assert_eq!(
            cross_asset_peg_holds(&pool(0, 0), &feeds, FIVE_PERCENT).unwrap_err(),
            CollateralError::PriceOutsideRange.into()
        );
        assert!(cross_asset_peg_holds(&pool(FIX_ONE, 0), &feeds, FIVE_PERCENT).is_err());
    }

    #[test]
    fn test_evaluate_selects_checks() {
        // Stablecoins on peg, pool badly imbalanced
        let skewed = pool(1_000 * FIX_ONE, 500 * FIX_ONE);
        let on_peg = prices(FIX_ONE, FIX_ONE);

        let target_only = PegChecks { target_peg: true, cross_asset: false };
        let cross_only = PegChecks { target_peg: false, cross_asset: true };
        let both = PegChecks { target_peg: true, cross_asset: true };

        assert!(evaluate(target_only, &skewed, &on_peg, FIX_ONE, FIVE_PERCENT).unwrap());
        assert!(!evaluate(cross_only, &skewed, &on_peg, FIX_ONE, FIVE_PERCENT).unwrap());
        assert!(!evaluate(both, &skewed, &on_peg, FIX_ONE, FIVE_PERCENT).unwrap());

        let none = PegChecks { target_peg: false, cross_asset: false };
        assert!(evaluate(none, &pool(0, 0), &on_peg, FIX_ONE, FIVE_PERCENT).unwrap());
    }
}
