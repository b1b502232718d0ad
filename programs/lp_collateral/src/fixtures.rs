//! Shared builders for unit tests

use anchor_lang::prelude::*;
use anchor_lang::Discriminator;
use switchboard_solana::{AggregatorAccountData, SwitchboardDecimal};
use crate::states::{CollateralParams, PoolLayout, VaultLayout};

/// Pool whose vaults hold the right mints and belong to `params.pool`
pub fn pool_layout(params: &CollateralParams, token0_decimals: u8, token1_decimals: u8) -> PoolLayout {
    let token0_mint = Pubkey::new_unique();
    let token1_mint = Pubkey::new_unique();
    PoolLayout {
        token0_mint,
        token1_mint,
        token0_vault: VaultLayout { key: Pubkey::new_unique(), mint: token0_mint, owner: params.pool },
        token1_vault: VaultLayout { key: Pubkey::new_unique(), mint: token1_mint, owner: params.pool },
        token0_decimals,
        token1_decimals,
        lp_decimals: 9,
    }
}

/// Owned backing storage for a Switchboard aggregator account
pub struct FeedAccount {
    pub key: Pubkey,
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

impl FeedAccount {
    pub fn new(key: Pubkey, mantissa: i128, scale: u32, updated_at: i64) -> Self {
        let mut feed = AggregatorAccountData::default();
        feed.latest_confirmed_round.result = SwitchboardDecimal { mantissa, scale };
        feed.latest_confirmed_round.round_open_timestamp = updated_at;

        let mut data = AggregatorAccountData::discriminator().to_vec();
        data.extend_from_slice(bytemuck::bytes_of(&feed));

        Self { key, owner: Pubkey::new_unique(), lamports: 1_000_000, data }
    }

    /// Account holding something other than an aggregator
    pub fn garbage(key: Pubkey) -> Self {
        Self { key, owner: Pubkey::new_unique(), lamports: 1_000_000, data: vec![7; 64] }
    }

    pub fn info(&mut self) -> AccountInfo<'_> {
        AccountInfo::new(
            &self.key,
            false,
            false,
            &mut self.lamports,
            &mut self.data,
            &self.owner,
            false,
            0,
        )
    }
}

pub fn infos(accounts: &mut [FeedAccount]) -> Vec<AccountInfo<'_>> {
    accounts.iter_mut().map(FeedAccount::info).collect()
}
