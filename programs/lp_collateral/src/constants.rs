// constants.rs

// Collateral state seeds
pub const COLLATERAL_SEED: &[u8] = b"lp_collateral";

// Fixed-point scale shared by prices, amounts and ratios (18 decimals)
pub const FIX_DECIMALS: u32 = 18;
pub const FIX_ONE: u128 = 1_000_000_000_000_000_000;

// Feed chains compose at most three hops per token (e.g. WBTC/BTC -> BTC/USD)
pub const MAX_FEEDS_PER_TOKEN: usize = 3;

// Sanity ceiling for any single hop or composed price: 1e12 USD per token
pub const MAX_PRICE: u128 = FIX_ONE * 1_000_000_000_000;

// Sentinel for "no default scheduled"
pub const NEVER: i64 = i64::MAX;

// Target unit identifier width (bytes32 style, zero padded)
pub const TARGET_NAME_LEN: usize = 32;

// Buffer sizes
pub const RESERVE_SPACE: usize = 32; // Reserved space for future upgrades
