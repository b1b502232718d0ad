// contexts/query_collateral.rs
//
// Views over live pool and feed data. Values are returned as instruction
// return data; nothing is written.
use anchor_lang::prelude::*;
use crate::contexts::ObserveCollateral;
use crate::states::PriceQuote;

pub fn price<'info>(
    ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>,
    allow_fallback: bool,
) -> Result<PriceQuote> {
    let market = ctx.accounts.market(ctx.remaining_accounts)?;
    ctx.accounts.collateral.price(&market, allow_fallback)
}

pub fn strict_price<'info>(ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>) -> Result<u128> {
    let market = ctx.accounts.market(ctx.remaining_accounts)?;
    ctx.accounts.collateral.strict_price(&market)
}

pub fn total_liquidity<'info>(ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>) -> Result<u128> {
    let market = ctx.accounts.market(ctx.remaining_accounts)?;
    ctx.accounts.collateral.total_liquidity(&market)
}

/// Needs no feed accounts
pub fn ref_per_tok(ctx: Context<ObserveCollateral>) -> Result<u128> {
    ctx.accounts.collateral.ref_per_tok(&ctx.accounts.pool_snapshot())
}

pub fn peg_price<'info>(ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>) -> Result<u128> {
    let market = ctx.accounts.market(ctx.remaining_accounts)?;
    ctx.accounts.collateral.peg_price(&market)
}

pub fn price_per_target<'info>(ctx: Context<'_, '_, '_, 'info, ObserveCollateral<'info>>) -> Result<u128> {
    let market = ctx.accounts.market(ctx.remaining_accounts)?;
    ctx.accounts.collateral.price_per_target(&market)
}
