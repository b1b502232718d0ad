// errors.rs
use anchor_lang::prelude::*;

#[error_code]
pub enum CollateralError {
    // Valuation failures
    #[msg("Oracle price is too stale")]
    StalePrice,

    #[msg("Oracle price is outside the accepted range")]
    PriceOutsideRange,

    #[msg("Math overflow occurred")]
    MathOverflow,

    // Construction-time configuration
    #[msg("targetName missing")]
    TargetNameMissing,

    #[msg("missing pair address")]
    MissingPairAddress,

    #[msg("missing pool address")]
    MissingPoolAddress,

    #[msg("missing token0 price feed")]
    MissingToken0PriceFeed,

    #[msg("token0 price feeds limited to 3")]
    Token0PriceFeedsLimited,

    #[msg("missing token1 price feed")]
    MissingToken1PriceFeed,

    #[msg("token1 price feeds limited to 3")]
    Token1PriceFeedsLimited,

    #[msg("invalid max trade volume")]
    InvalidMaxTradeVolume,

    #[msg("oracleTimeout zero")]
    OracleTimeoutZero,

    #[msg("defaultThreshold zero")]
    DefaultThresholdZero,

    #[msg("delayUntilDefault zero")]
    DelayUntilDefaultZero,

    #[msg("Target feed is not supported by this collateral variant")]
    TargetFeedNotSupported,

    #[msg("Pool vault does not hold the expected mint")]
    VaultMintMismatch,

    // Account wiring
    #[msg("Price feed account does not match configuration")]
    InvalidFeedAccount,

    #[msg("Pool account does not match configuration")]
    InvalidPoolAccount,
}
