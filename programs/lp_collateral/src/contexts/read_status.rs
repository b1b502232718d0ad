// contexts/read_status.rs
use anchor_lang::prelude::*;
use crate::states::{CollateralInfo, CollateralStatus, LpCollateral};
use crate::constants::*;

/// Views that need only the stored state
#[derive(Accounts)]
pub struct ReadCollateral<'info> {
    #[account(
        seeds = [COLLATERAL_SEED, collateral.authority.as_ref(), collateral.config.lp_mint.as_ref()],
        bump = collateral.bump,
    )]
    pub collateral: Box<Account<'info, LpCollateral>>,
}

pub fn status(ctx: Context<ReadCollateral>) -> Result<CollateralStatus> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx.accounts.collateral.status(now))
}

pub fn when_default(ctx: Context<ReadCollateral>) -> Result<i64> {
    Ok(ctx.accounts.collateral.when_default())
}

pub fn target_per_ref(ctx: Context<ReadCollateral>) -> Result<u128> {
    Ok(ctx.accounts.collateral.target_per_ref())
}

pub fn collateral_info(ctx: Context<ReadCollateral>) -> Result<CollateralInfo> {
    Ok(ctx.accounts.collateral.info())
}
