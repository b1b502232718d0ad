// events.rs
use anchor_lang::prelude::*;
use crate::states::{CollateralStatus, CollateralVariant};

#[event]
pub struct CollateralInitialized {
    pub collateral: Pubkey,
    pub authority: Pubkey,
    pub lp_mint: Pubkey,
    pub pool: Pubkey,
    pub variant: CollateralVariant,
    pub ref_per_tok: u128,
    pub timestamp: i64,
}

#[event]
pub struct DefaultStatusChanged {
    pub collateral: Pubkey,
    pub old_status: CollateralStatus,
    pub new_status: CollateralStatus,
    pub when_default: i64,
    pub timestamp: i64,
}

#[event]
pub struct CollateralRefreshed {
    pub collateral: Pubkey,
    pub status: CollateralStatus,
    pub ref_per_tok: Option<u128>,
    pub deviation: bool,
    pub timestamp: i64,
}
