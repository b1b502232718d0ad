// contexts/init_collateral.rs
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};
use crate::states::{CollateralConfig, CollateralParams, LpCollateral, PoolLayout, VaultLayout};
use crate::valuation::PoolSnapshot;
use crate::errors::CollateralError;
use crate::constants::*;
use crate::events::*;

#[derive(Accounts)]
#[instruction(params: CollateralParams)]
pub struct InitializeCollateral<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Collateral state PDA, one per (authority, LP mint)
    #[account(
        init,
        payer = authority,
        space = 8 + LpCollateral::INIT_SPACE,
        seeds = [COLLATERAL_SEED, authority.key().as_ref(), lp_mint.key().as_ref()],
        bump
    )]
    pub collateral: Box<Account<'info, LpCollateral>>,

    /// The LP token mint
    #[account(
        constraint = lp_mint.key() == params.pair @ CollateralError::InvalidPoolAccount
    )]
    pub lp_mint: Box<Account<'info, Mint>>,

    pub token0_mint: Box<Account<'info, Mint>>,
    pub token1_mint: Box<Account<'info, Mint>>,

    /// Pool reserve of token0, bound to the pool in `CollateralConfig::new`
    pub token0_vault: Box<Account<'info, TokenAccount>>,

    /// Pool reserve of token1
    pub token1_vault: Box<Account<'info, TokenAccount>>,

    pub system_program: Program<'info, System>,
}

impl<'info> InitializeCollateral<'info> {
    pub fn pool_layout(&self) -> PoolLayout {
        PoolLayout {
            token0_mint: self.token0_mint.key(),
            token1_mint: self.token1_mint.key(),
            token0_vault: VaultLayout {
                key: self.token0_vault.key(),
                mint: self.token0_vault.mint,
                owner: self.token0_vault.owner,
            },
            token1_vault: VaultLayout {
                key: self.token1_vault.key(),
                mint: self.token1_vault.mint,
                owner: self.token1_vault.owner,
            },
            token0_decimals: self.token0_mint.decimals,
            token1_decimals: self.token1_mint.decimals,
            lp_decimals: self.lp_mint.decimals,
        }
    }

    pub fn pool_snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            reserve0: self.token0_vault.amount,
            reserve1: self.token1_vault.amount,
            total_supply: self.lp_mint.supply,
        }
    }
}

pub fn initialize_collateral(
    ctx: Context<InitializeCollateral>,
    params: CollateralParams,
) -> Result<()> {
    msg!("Initializing LP collateral for {}", params.pair);

    let config = CollateralConfig::new(&params, ctx.accounts.pool_layout())?;
    let snapshot = ctx.accounts.pool_snapshot();
    let now = Clock::get()?.unix_timestamp;

    let collateral = &mut ctx.accounts.collateral;
    collateral.initialize(
        ctx.accounts.authority.key(),
        config,
        &snapshot,
        now,
        ctx.bumps.collateral,
    )?;

    msg!("Initial refPerTok: {}", collateral.default_state.last_ref_per_tok);

    emit!(CollateralInitialized {
        collateral: collateral.key(),
        authority: collateral.authority,
        lp_mint: config.lp_mint,
        pool: config.pool,
        variant: config.variant,
        ref_per_tok: collateral.default_state.last_ref_per_tok,
        timestamp: now,
    });

    Ok(())
}
