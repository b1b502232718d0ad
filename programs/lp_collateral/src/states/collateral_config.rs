// states/collateral_config.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::CollateralError;
use crate::peg::PegChecks;

/// Which flavour of LP collateral this instance is.
///
/// Each variant selects the peg checks that feed the soft-default signal and
/// whether a target feed may be configured.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum CollateralVariant {
    /// Both assets track a fiat-like target unit (e.g. DAI/USDC targeting USD)
    Fiat,
    /// Unpegged pair valued in a sqrt(token0 * token1) basket (e.g. WBTC/ETH)
    NonFiat,
    /// Pegged pair: pool ratio and each asset's target peg are both watched
    Stable,
    /// Volatile pair: pool ratio against the price-derived ratio only
    Volatile,
}

impl CollateralVariant {
    pub fn peg_checks(&self) -> PegChecks {
        match self {
            CollateralVariant::Fiat => PegChecks { target_peg: true, cross_asset: false },
            CollateralVariant::Stable => PegChecks { target_peg: true, cross_asset: true },
            CollateralVariant::NonFiat | CollateralVariant::Volatile => {
                PegChecks { target_peg: false, cross_asset: true }
            }
        }
    }

    /// Fiat-targeted variants value one target unit at the peg price; the
    /// others use the synthetic sqrt basket.
    pub fn is_fiat_targeted(&self) -> bool {
        matches!(self, CollateralVariant::Fiat | CollateralVariant::Stable)
    }

    pub fn accepts_target_feed(&self) -> bool {
        self.is_fiat_targeted()
    }
}

/// Ordered, fixed-capacity list of feed accounts composing one token's price
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedChain {
    pub feeds: [Pubkey; 3],
    pub len: u8,
}

impl anchor_lang::Space for FeedChain {
    const INIT_SPACE: usize =
        32 * MAX_FEEDS_PER_TOKEN +  // [Pubkey; 3] (feeds)
        1;                          // u8 (len)
}

impl FeedChain {
    /// Callers validate the length first
    pub fn from_keys(keys: &[Pubkey]) -> Self {
        let mut chain = FeedChain::default();
        for (slot, key) in chain.feeds.iter_mut().zip(keys) {
            *slot = *key;
        }
        chain.len = keys.len().min(MAX_FEEDS_PER_TOKEN) as u8;
        chain
    }

    pub fn keys(&self) -> &[Pubkey] {
        &self.feeds[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Construction parameters, supplied once to `initialize_collateral`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CollateralParams {
    pub variant: CollateralVariant,
    pub pool: Pubkey,                     // Pool authority, owner of both reserve vaults
    pub pair: Pubkey,                     // LP token mint
    pub token0_feeds: Vec<Pubkey>,        // token0 -> ... -> USD, at most 3 hops
    pub token1_feeds: Vec<Pubkey>,        // token1 -> ... -> USD, at most 3 hops
    pub target_feed: Option<Pubkey>,      // None targets 1.0 (fiat)
    pub target_name: [u8; 32],
    pub oracle_timeout: i64,              // Seconds an observation stays valid
    pub fallback_price: u128,             // Returned by price(true) when valuation fails
    pub max_trade_volume: u128,           // In unit of account
    pub default_threshold: u128,          // Deviation tolerance, FIX_ONE = 100%
    pub delay_until_default: i64,         // Seconds a deviation may persist before default
}

impl CollateralParams {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.target_name.iter().any(|b| *b != 0),
            CollateralError::TargetNameMissing
        );
        require_keys_neq!(self.pair, Pubkey::default(), CollateralError::MissingPairAddress);
        require_keys_neq!(self.pool, Pubkey::default(), CollateralError::MissingPoolAddress);

        require!(!self.token0_feeds.is_empty(), CollateralError::MissingToken0PriceFeed);
        require!(
            self.token0_feeds.len() <= MAX_FEEDS_PER_TOKEN,
            CollateralError::Token0PriceFeedsLimited
        );
        require!(!self.token1_feeds.is_empty(), CollateralError::MissingToken1PriceFeed);
        require!(
            self.token1_feeds.len() <= MAX_FEEDS_PER_TOKEN,
            CollateralError::Token1PriceFeedsLimited
        );

        require!(self.max_trade_volume > 0, CollateralError::InvalidMaxTradeVolume);
        require!(self.oracle_timeout > 0, CollateralError::OracleTimeoutZero);
        require!(self.default_threshold > 0, CollateralError::DefaultThresholdZero);
        require!(self.delay_until_default > 0, CollateralError::DelayUntilDefaultZero);

        if self.target_feed.is_some() {
            require!(
                self.variant.accepts_target_feed(),
                CollateralError::TargetFeedNotSupported
            );
        }

        Ok(())
    }
}

/// Accounts and decimals of the observed pool, read at initialization
#[derive(Clone, Copy, Debug)]
pub struct PoolLayout {
    pub token0_mint: Pubkey,
    pub token1_mint: Pubkey,
    pub token0_vault: VaultLayout,
    pub token1_vault: VaultLayout,
    pub token0_decimals: u8,
    pub token1_decimals: u8,
    pub lp_decimals: u8,
}

/// One reserve token account as found on chain
#[derive(Clone, Copy, Debug)]
pub struct VaultLayout {
    pub key: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
}

impl VaultLayout {
    /// The vault must hold `mint` and belong to the configured pool
    pub fn check(&self, mint: &Pubkey, pool: &Pubkey) -> Result<()> {
        require_keys_eq!(self.mint, *mint, CollateralError::VaultMintMismatch);
        require_keys_eq!(self.owner, *pool, CollateralError::InvalidPoolAccount);
        Ok(())
    }
}

/// Immutable configuration of one collateral instance
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct CollateralConfig {
    pub variant: CollateralVariant,
    pub pool: Pubkey,
    pub lp_mint: Pubkey,
    pub token0_mint: Pubkey,
    pub token1_mint: Pubkey,
    pub token0_vault: Pubkey,
    pub token1_vault: Pubkey,
    pub token0_decimals: u8,
    pub token1_decimals: u8,
    pub lp_decimals: u8,
    pub token0_feeds: FeedChain,
    pub token1_feeds: FeedChain,
    pub target_feed: Option<Pubkey>,
    pub target_name: [u8; 32],
    pub oracle_timeout: i64,
    pub fallback_price: u128,
    pub max_trade_volume: u128,
    pub default_threshold: u128,
    pub delay_until_default: i64,
}

impl CollateralConfig {
    pub fn new(params: &CollateralParams, layout: PoolLayout) -> Result<Self> {
        params.validate()?;
        layout.token0_vault.check(&layout.token0_mint, &params.pool)?;
        layout.token1_vault.check(&layout.token1_mint, &params.pool)?;

        Ok(Self {
            variant: params.variant,
            pool: params.pool,
            lp_mint: params.pair,
            token0_mint: layout.token0_mint,
            token1_mint: layout.token1_mint,
            token0_vault: layout.token0_vault.key,
            token1_vault: layout.token1_vault.key,
            token0_decimals: layout.token0_decimals,
            token1_decimals: layout.token1_decimals,
            lp_decimals: layout.lp_decimals,
            token0_feeds: FeedChain::from_keys(&params.token0_feeds),
            token1_feeds: FeedChain::from_keys(&params.token1_feeds),
            target_feed: params.target_feed,
            target_name: params.target_name,
            oracle_timeout: params.oracle_timeout,
            fallback_price: params.fallback_price,
            max_trade_volume: params.max_trade_volume,
            default_threshold: params.default_threshold,
            delay_until_default: params.delay_until_default,
        })
    }

    /// Number of feed accounts a caller must pass, in order
    pub fn feed_account_count(&self) -> usize {
        self.token0_feeds.len() + self.token1_feeds.len() + self.target_feed.map_or(0, |_| 1)
    }
}

/// Encode a short ASCII name as a zero padded bytes32 identifier
pub fn target_name(name: &str) -> [u8; TARGET_NAME_LEN] {
    let mut out = [0u8; TARGET_NAME_LEN];
    let len = name.len().min(TARGET_NAME_LEN);
    out[..len].copy_from_slice(&name.as_bytes()[..len]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CollateralParams {
        CollateralParams {
            variant: CollateralVariant::Fiat,
            pool: Pubkey::new_unique(),
            pair: Pubkey::new_unique(),
            token0_feeds: vec![Pubkey::new_unique()],
            token1_feeds: vec![Pubkey::new_unique()],
            target_feed: None,
            target_name: target_name("USD"),
            oracle_timeout: 86_400,
            fallback_price: FIX_ONE,
            max_trade_volume: 1_000_000,
            default_threshold: FIX_ONE / 20,
            delay_until_default: 86_400,
        }
    }

    fn rejects(p: CollateralParams, expected: CollateralError) {
        assert_eq!(p.validate().unwrap_err(), expected.into());
    }

    #[test]
    fn test_valid_params() {
        assert!(params().validate().is_ok());
    }

    #[test]
    fn test_target_name_required() {
        rejects(
            CollateralParams { target_name: [0; TARGET_NAME_LEN], ..params() },
            CollateralError::TargetNameMissing,
        );
    }

    #[test]
    fn test_pair_and_pool_required() {
        rejects(
            CollateralParams { pair: Pubkey::default(), ..params() },
            CollateralError::MissingPairAddress,
        );
        rejects(
            CollateralParams { pool: Pubkey::default(), ..params() },
            CollateralError::MissingPoolAddress,
        );
    }

    #[test]
    fn test_feed_chain_bounds() {
        let four = vec![Pubkey::new_unique(); 4];

        rejects(
            CollateralParams { token0_feeds: vec![], ..params() },
            CollateralError::MissingToken0PriceFeed,
        );
        rejects(
            CollateralParams { token0_feeds: four.clone(), ..params() },
            CollateralError::Token0PriceFeedsLimited,
        );
        rejects(
            CollateralParams { token1_feeds: vec![], ..params() },
            CollateralError::MissingToken1PriceFeed,
        );
        rejects(
            CollateralParams { token1_feeds: four, ..params() },
            CollateralError::Token1PriceFeedsLimited,
        );

        let three = vec![Pubkey::new_unique(); 3];
        assert!(CollateralParams { token0_feeds: three, ..params() }.validate().is_ok());
    }

    #[test]
    fn test_zero_parameters_rejected() {
        rejects(
            CollateralParams { max_trade_volume: 0, ..params() },
            CollateralError::InvalidMaxTradeVolume,
        );
        rejects(
            CollateralParams { oracle_timeout: 0, ..params() },
            CollateralError::OracleTimeoutZero,
        );
        rejects(
            CollateralParams { default_threshold: 0, ..params() },
            CollateralError::DefaultThresholdZero,
        );
        rejects(
            CollateralParams { delay_until_default: 0, ..params() },
            CollateralError::DelayUntilDefaultZero,
        );
        rejects(
            CollateralParams { delay_until_default: -1, ..params() },
            CollateralError::DelayUntilDefaultZero,
        );
    }

    #[test]
    fn test_target_feed_only_for_fiat_targeted_variants() {
        let feed = Some(Pubkey::new_unique());

        for variant in [CollateralVariant::Fiat, CollateralVariant::Stable] {
            assert!(CollateralParams { variant, target_feed: feed, ..params() }
                .validate()
                .is_ok());
        }
        for variant in [CollateralVariant::NonFiat, CollateralVariant::Volatile] {
            rejects(
                CollateralParams { variant, target_feed: feed, ..params() },
                CollateralError::TargetFeedNotSupported,
            );
        }
    }

    #[test]
    fn test_variant_peg_checks() {
        assert_eq!(
            CollateralVariant::Fiat.peg_checks(),
            PegChecks { target_peg: true, cross_asset: false }
        );
        assert_eq!(
            CollateralVariant::Stable.peg_checks(),
            PegChecks { target_peg: true, cross_asset: true }
        );
        assert_eq!(
            CollateralVariant::NonFiat.peg_checks(),
            PegChecks { target_peg: false, cross_asset: true }
        );
        assert_eq!(
            CollateralVariant::Volatile.peg_checks(),
            PegChecks { target_peg: false, cross_asset: true }
        );
    }

    #[test]
    fn test_config_records_vaults() {
        let p = params();
        let layout = crate::fixtures::pool_layout(&p, 8, 6);
        let config = CollateralConfig::new(&p, layout).unwrap();

        assert_eq!(config.token0_vault, layout.token0_vault.key);
        assert_eq!(config.token1_vault, layout.token1_vault.key);
        assert_eq!(config.lp_mint, p.pair);
        assert_eq!((config.token0_decimals, config.token1_decimals), (8, 6));
    }

    #[test]
    fn test_vault_must_hold_pool_mint() {
        let p = params();
        let mut layout = crate::fixtures::pool_layout(&p, 8, 6);
        layout.token1_vault.mint = Pubkey::new_unique();

        assert_eq!(
            CollateralConfig::new(&p, layout).unwrap_err(),
            CollateralError::VaultMintMismatch.into()
        );
    }

    #[test]
    fn test_vault_must_belong_to_pool() {
        // Token accounts owned by someone other than the configured pool
        let p = params();
        let mut layout = crate::fixtures::pool_layout(&p, 8, 6);
        layout.token0_vault.owner = Pubkey::new_unique();

        assert_eq!(
            CollateralConfig::new(&p, layout).unwrap_err(),
            CollateralError::InvalidPoolAccount.into()
        );
    }

    #[test]
    fn test_feed_chain_keeps_order() {
        let keys = [Pubkey::new_unique(), Pubkey::new_unique()];
        let chain = FeedChain::from_keys(&keys);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.keys(), &keys);
        assert!(FeedChain::default().is_empty());
    }

    #[test]
    fn test_target_name_encoding() {
        let name = target_name("UNIV2SQRTWBTCETH");
        assert_eq!(&name[..16], b"UNIV2SQRTWBTCETH");
        assert!(name[16..].iter().all(|b| *b == 0));
    }
}
