use anchor_lang::prelude::*;

pub mod contexts;
pub mod states;
pub mod errors;
pub mod constants;
pub mod events;
pub mod math;
pub mod oracle;
pub mod peg;
pub mod valuation;

#[cfg(test)]
mod fixtures;

use contexts::*;
use states::*;

declare_id!("EiWJ7xazmrEHcAEHUvQuwFr9LUg4cTjFehpQqPvMQkED");

#[program]
pub mod lp_collateral {
    use super::*;

    // Setup
    pub fn initialize_collateral(
        ctx: Context<InitializeCollateral>,
        params: CollateralParams,
    ) -> Result<()> {
        contexts::initialize_collateral(ctx, params)
    }

    // Default detection
    pub fn refresh<'info>(
        ctx: Context<'_, '_, '_, 'info, RefreshCollateral<'info>>,
    ) -> Result<()> {
        contexts::refresh(ctx)
    }

    // Valuation views (feed accounts as remaining accounts)
    pub fn price<'info>(
        ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>,
        allow_fallback: bool,
    ) -> Result<PriceQuote> {
        contexts::price(ctx, allow_fallback)
    }

    pub fn strict_price<'info>(
        ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>,
    ) -> Result<u128> {
        contexts::strict_price(ctx)
    }

    pub fn total_liquidity<'info>(
        ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>,
    ) -> Result<u128> {
        contexts::total_liquidity(ctx)
    }

    pub fn ref_per_tok(ctx: Context<ObserveCollateral>) -> Result<u128> {
        contexts::ref_per_tok(ctx)
    }

    pub fn peg_price<'info>(
        ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>,
    ) -> Result<u128> {
        contexts::peg_price(ctx)
    }

    pub fn price_per_target<'info>(
        ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>,
    ) -> Result<u128> {
        contexts::price_per_target(ctx)
    }

    // Status views
    pub fn target_per_ref(ctx: Context<ReadCollateral>) -> Result<u128> {
        contexts::target_per_ref(ctx)
    }

    pub fn status(ctx: Context<ReadCollateral>) -> Result<CollateralStatus> {
        contexts::status(ctx)
    }

    pub fn when_default(ctx: Context<ReadCollateral>) -> Result<i64> {
        contexts::when_default(ctx)
    }

    pub fn collateral_info(ctx: Context<ReadCollateral>) -> Result<CollateralInfo> {
        contexts::collateral_info(ctx)
    }

    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        contexts::claim_rewards(ctx)
    }
}
