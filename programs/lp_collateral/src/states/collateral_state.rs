// states/collateral_state.rs
use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::CollateralError;
use crate::oracle::resolve_price;
use crate::peg;
use crate::states::{CollateralConfig, CollateralStatus, CollateralVariant, DefaultState, StatusTransition};
use crate::valuation::{self, MarketSnapshot, NormalizedPool, PoolSnapshot, TokenPrices};

#[account]
#[derive(InitSpace)]
pub struct LpCollateral {
    pub authority: Pubkey,
    pub config: CollateralConfig,
    pub default_state: DefaultState,

    pub created_at: i64,
    pub last_refresh: i64,

    // Administrative
    pub bump: u8,
    pub reserved: [u8; 32],
}

/// Result of `price(allow_fallback)`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceQuote {
    pub is_fallback: bool,
    pub value: u128,
}

/// Static description a host registry reads once
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CollateralInfo {
    pub is_collateral: bool,
    pub erc20: Pubkey,
    pub target_name: [u8; 32],
    pub variant: CollateralVariant,
    pub max_trade_volume: u128,
    pub fallback_price: u128,
    pub default_threshold: u128,
    pub delay_until_default: i64,
    pub oracle_timeout: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub transition: Option<StatusTransition>,
    pub ref_per_tok: Option<u128>,
    pub deviation: bool,
}

impl LpCollateral {
    /// One instance per (authority, LP mint)
    pub fn address(authority: &Pubkey, lp_mint: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[COLLATERAL_SEED, authority.as_ref(), lp_mint.as_ref()],
            &crate::ID,
        )
    }

    pub fn initialize(
        &mut self,
        authority: Pubkey,
        config: CollateralConfig,
        pool: &PoolSnapshot,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        self.authority = authority;
        self.config = config;
        let initial = valuation::ref_per_tok(&self.normalized_pool(pool)?)?;
        self.default_state = DefaultState::new(initial);
        self.created_at = now;
        self.last_refresh = now;
        self.bump = bump;
        self.reserved = [0; RESERVE_SPACE];
        Ok(())
    }

    pub fn normalized_pool(&self, pool: &PoolSnapshot) -> Result<NormalizedPool> {
        NormalizedPool::from_snapshot(
            pool,
            self.config.token0_decimals,
            self.config.token1_decimals,
            self.config.lp_decimals,
        )
    }

    pub fn token_prices(&self, market: &MarketSnapshot) -> Result<TokenPrices> {
        let timeout = self.config.oracle_timeout;
        Ok(TokenPrices {
            token0: resolve_price(&market.token0_feeds, timeout, market.now)?,
            token1: resolve_price(&market.token1_feeds, timeout, market.now)?,
        })
    }

    /// USD price of one target unit: 1.0 unless a target feed is configured
    pub fn peg_price(&self, market: &MarketSnapshot) -> Result<u128> {
        match (self.config.target_feed, market.target_feed) {
            (None, None) => Ok(FIX_ONE),
            (Some(_), Some(observation)) => {
                observation.checked_price(self.config.oracle_timeout, market.now)
            }
            _ => err!(CollateralError::InvalidFeedAccount),
        }
    }

    pub fn total_liquidity(&self, market: &MarketSnapshot) -> Result<u128> {
        let pool = self.normalized_pool(&market.pool)?;
        valuation::total_liquidity(&pool, &self.token_prices(market)?)
    }

    /// Fair LP token price, failing loudly on any feed problem
    pub fn strict_price(&self, market: &MarketSnapshot) -> Result<u128> {
        let pool = self.normalized_pool(&market.pool)?;
        valuation::lp_token_price(&pool, &self.token_prices(market)?)
    }

    pub fn price(&self, market: &MarketSnapshot, allow_fallback: bool) -> Result<PriceQuote> {
        match self.strict_price(market) {
            Ok(value) => Ok(PriceQuote { is_fallback: false, value }),
            Err(e) if allow_fallback => {
                msg!("Falling back to configured price: {}", e);
                Ok(PriceQuote { is_fallback: true, value: self.config.fallback_price })
            }
            Err(e) => Err(e),
        }
    }

    pub fn ref_per_tok(&self, pool: &PoolSnapshot) -> Result<u128> {
        valuation::ref_per_tok(&self.normalized_pool(pool)?)
    }

    pub fn target_per_ref(&self) -> u128 {
        FIX_ONE
    }

    /// USD per target unit
    pub fn price_per_target(&self, market: &MarketSnapshot) -> Result<u128> {
        if self.config.variant.is_fiat_targeted() {
            self.peg_price(market)
        } else {
            Ok(valuation::reference_unit_price(&self.token_prices(market)?))
        }
    }

    pub fn status(&self, now: i64) -> CollateralStatus {
        self.default_state.status_at(now)
    }

    pub fn when_default(&self) -> i64 {
        self.default_state.when_default
    }

    /// True when a peg check fails or when prices cannot be trusted at all
    pub fn soft_default_signal(&self, market: &MarketSnapshot) -> bool {
        match self.pegs_hold(market) {
            Ok(holds) => !holds,
            Err(e) => {
                msg!("Soft default: {}", e);
                true
            }
        }
    }

    fn pegs_hold(&self, market: &MarketSnapshot) -> Result<bool> {
        let pool = self.normalized_pool(&market.pool)?;
        let prices = self.token_prices(market)?;
        valuation::fair_value(&pool, &prices)?;

        let checks = self.config.variant.peg_checks();
        let peg_price = if checks.target_peg {
            self.peg_price(market)?
        } else {
            FIX_ONE
        };
        peg::evaluate(checks, &pool, &prices, peg_price, self.config.default_threshold)
    }

    /// Run one step of default detection. Never fails on valuation errors.
    pub fn refresh(&mut self, market: &MarketSnapshot) -> RefreshOutcome {
        let observed = self.ref_per_tok(&market.pool).ok();
        let deviation = self.soft_default_signal(market);

        let transition = self.default_state.apply(
            market.now,
            observed,
            deviation,
            self.config.delay_until_default,
        );
        self.last_refresh = market.now;

        RefreshOutcome { transition, ref_per_tok: observed, deviation }
    }

    pub fn is_collateral(&self) -> bool {
        true
    }

    pub fn erc20(&self) -> Pubkey {
        self.config.lp_mint
    }

    pub fn target_name(&self) -> [u8; TARGET_NAME_LEN] {
        self.config.target_name
    }

    pub fn max_trade_volume(&self) -> u128 {
        self.config.max_trade_volume
    }

    pub fn info(&self) -> CollateralInfo {
        CollateralInfo {
            is_collateral: self.is_collateral(),
            erc20: self.erc20(),
            target_name: self.target_name(),
            variant: self.config.variant,
            max_trade_volume: self.max_trade_volume(),
            fallback_price: self.config.fallback_price,
            default_threshold: self.config.default_threshold,
            delay_until_default: self.config.delay_until_default,
            oracle_timeout: self.config.oracle_timeout,
        }
    }
}
