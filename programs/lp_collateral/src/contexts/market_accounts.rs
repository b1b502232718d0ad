// contexts/market_accounts.rs
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, TokenAccount};
use crate::oracle::{read_switchboard_feed, FeedObservation};
use crate::states::{CollateralConfig, FeedChain, LpCollateral};
use crate::valuation::{MarketSnapshot, PoolSnapshot};
use crate::errors::CollateralError;
use crate::constants::*;

/// Read-only view of one collateral and its pool.
///
/// Feed accounts follow as remaining accounts: the token0 chain, the token1
/// chain, then the target feed if one is configured.
#[derive(Accounts)]
pub struct ObserveCollateral<'info> {
    #[account(
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

impl<'info> ObserveCollateral<'info> {
    pub fn pool_snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            reserve0: self.token0_vault.amount,
            reserve1: self.token1_vault.amount,
            total_supply: self.lp_mint.supply,
        }
    }

    pub fn market(&self, feeds: &[AccountInfo<'info>]) -> Result<MarketSnapshot> {
        load_market_snapshot(
            &self.collateral.config,
            self.pool_snapshot(),
            feeds,
            Clock::get()?.unix_timestamp,
        )
    }
}

/// Pair the pool reserves with the configured feeds, checking every feed
/// account against the key stored at its position
pub fn load_market_snapshot(
    config: &CollateralConfig,
    pool: PoolSnapshot,
    feeds: &[AccountInfo],
    now: i64,
) -> Result<MarketSnapshot> {
    require!(
        feeds.len() == config.feed_account_count(),
        CollateralError::InvalidFeedAccount
    );

    let (token0_accounts, rest) = feeds.split_at(config.token0_feeds.len());
    let (token1_accounts, target_accounts) = rest.split_at(config.token1_feeds.len());

    let target_feed = match (config.target_feed, target_accounts.first()) {
        (Some(expected), Some(account)) => Some(read_feed(&expected, account)?),
        _ => None,
    };

    Ok(MarketSnapshot {
        pool,
        token0_feeds: read_chain(&config.token0_feeds, token0_accounts)?,
        token1_feeds: read_chain(&config.token1_feeds, token1_accounts)?,
        target_feed,
        now,
    })
}

fn read_chain(chain: &FeedChain, accounts: &[AccountInfo]) -> Result<Vec<FeedObservation>> {
    chain
        .keys()
        .iter()
        .zip(accounts)
        .map(|(expected, account)| read_feed(expected, account))
        .collect()
}

fn read_feed(expected: &Pubkey, account: &AccountInfo) -> Result<FeedObservation> {
    require_keys_eq!(*account.key, *expected, CollateralError::InvalidFeedAccount);
    read_switchboard_feed(account)
}
