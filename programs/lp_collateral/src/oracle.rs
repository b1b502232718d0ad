//! Feed chain resolution
//!
//! A token's USD price is the product of up to three chained observations
//! (e.g. WBTC/BTC then BTC/USD). Every hop is checked for staleness and range
//! on its own; a single bad hop fails the whole chain.

use anchor_lang::prelude::*;
use switchboard_solana::AggregatorAccountData;
use crate::constants::*;
use crate::errors::CollateralError;
use crate::math::{mul_fix, pow10};

/// One reading of a price feed: `mantissa / 10^scale`, observed at `updated_at`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedObservation {
    pub mantissa: i128,
    pub scale: u32,
    pub updated_at: i64,
}

impl FeedObservation {
    /// Observation value as a `FIX_ONE` scaled price, without freshness checks
    pub fn to_fix(&self) -> Result<u128> {
        require!(self.mantissa > 0, CollateralError::PriceOutsideRange);
        let mantissa = self.mantissa as u128;

        let value = if self.scale <= FIX_DECIMALS {
            mantissa.checked_mul(pow10(FIX_DECIMALS - self.scale)?)
        } else {
            pow10(self.scale - FIX_DECIMALS).ok().map(|d| mantissa / d)
        };

        match value {
            Some(v) if v > 0 && v <= MAX_PRICE => Ok(v),
            _ => err!(CollateralError::PriceOutsideRange),
        }
    }

    /// Price of this hop, rejecting stale or out-of-range readings
    pub fn checked_price(&self, timeout: i64, now: i64) -> Result<u128> {
        if now.saturating_sub(self.updated_at) > timeout {
            msg!(
                "Stale feed: updated at {}, now {}, timeout {}",
                self.updated_at,
                now,
                timeout
            );
            return err!(CollateralError::StalePrice);
        }

        self.to_fix().map_err(|e| {
            msg!("Feed value out of range: {}e-{}", self.mantissa, self.scale);
            e
        })
    }
}

/// Resolve a chain of observations into one USD price (`FIX_ONE` scaled).
///
/// Hops are folded left to right by fixed-point multiplication; each hop's
/// output unit is the next hop's input unit.
pub fn resolve_price(chain: &[FeedObservation], timeout: i64, now: i64) -> Result<u128> {
    require!(
        !chain.is_empty() && chain.len() <= MAX_FEEDS_PER_TOKEN,
        CollateralError::InvalidFeedAccount
    );

    chain.iter().try_fold(FIX_ONE, |price, hop| {
        let hop_price = hop.checked_price(timeout, now)?;
        let composed = mul_fix(price, hop_price)
            .map_err(|_| error!(CollateralError::PriceOutsideRange))?;
        require!(
            composed > 0 && composed <= MAX_PRICE,
            CollateralError::PriceOutsideRange
        );
        Ok(composed)
    })
}

/// Read the latest confirmed round of a Switchboard aggregator
pub fn read_switchboard_feed(feed_info: &AccountInfo) -> Result<FeedObservation> {
    let data = feed_info.try_borrow_data()?;
    let feed = AggregatorAccountData::new_from_bytes(&data[..])?;
    let round = feed.latest_confirmed_round;

    Ok(FeedObservation {
        mantissa: round.result.mantissa,
        scale: round.result.scale,
        updated_at: round.round_open_timestamp,
    })
}
