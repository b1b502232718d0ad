// contexts/refresh_collateral.rs
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};
use crate::contexts::load_market_snapshot;
use crate::states::LpCollateral;
use crate::valuation::PoolSnapshot;
use crate::errors::CollateralError;
use crate::constants::*;
use crate::events::*;

#[derive(Accounts)]
pub struct RefreshCollateral<'info> {
    #[account(
        mut,
        seeds = [COLLATERAL_SEED, collateral.authority.as_ref(), collateral.config.lp_mint.as_ref()],
        bump = collateral.bump,
    )]
    pub collateral: Box<Account<'info, LpCollateral>>,

    #[account(address = collateral.config.lp_mint @ CollateralError::InvalidPoolAccount)]
    pub lp_mint: Box<Account<'info, Mint>>,

    #[account(address = collateral.config.token0_vault @ CollateralError::InvalidPoolAccount)]
    pub token0_vault: Box<Account<'info, TokenAccount>>,

    #[account(address = collateral.config.token1_vault @ CollateralError::InvalidPoolAccount)]
    pub token1_vault: Box<Account<'info, TokenAccount>>,
}

impl<'info> RefreshCollateral<'info> {
    pub fn pool_snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            reserve0: self.token0_vault.amount,
            reserve1: self.token1_vault.amount,
            total_supply: self.lp_mint.supply,
        }
    }
}

pub fn refresh<'info>(ctx: Context<'_, '_, '_, 'info, RefreshCollateral<'info>>) -> Result<()> {
    let market = load_market_snapshot(
        &ctx.accounts.collateral.config,
        ctx.accounts.pool_snapshot(),
        ctx.remaining_accounts,
        Clock::get()?.unix_timestamp,
    )?;

    let collateral = &mut ctx.accounts.collateral;
    let outcome = collateral.refresh(&market);

    if let Some(transition) = outcome.transition {
        msg!(
            "Collateral status {:?} -> {:?}",
            transition.old_status,
            transition.new_status
        );
        emit!(DefaultStatusChanged {
            collateral: collateral.key(),
            old_status: transition.old_status,
            new_status: transition.new_status,
            when_default: collateral.when_default(),
            timestamp: market.now,
        });
    }

    emit!(CollateralRefreshed {
        collateral: collateral.key(),
        status: collateral.status(market.now),
        ref_per_tok: outcome.ref_per_tok,
        deviation: outcome.deviation,
        timestamp: market.now,
    });

    Ok(())
}
