// contexts/claim_rewards.rs
use anchor_lang::prelude::*;
use crate::states::LpCollateral;
use crate::constants::*;

#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    pub caller: Signer<'info>,

    #[account(
        seeds = [COLLATERAL_SEED, collateral.authority.as_ref(), collateral.config.lp_mint.as_ref()],
        bump = collateral.bump,
    )]
    pub collateral: Box<Account<'info, LpCollateral>>,
}

/// LP positions in plain constant-product pools accrue no separate rewards
pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
    msg!("No rewards to claim for {}", ctx.accounts.collateral.erc20());
    Ok(())
}
