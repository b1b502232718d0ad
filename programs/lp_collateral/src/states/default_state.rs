// states/default_state.rs
use anchor_lang::prelude::*;
use crate::constants::NEVER;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum CollateralStatus {
    Sound,
    Iffy,
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTransition {
    pub old_status: CollateralStatus,
    pub new_status: CollateralStatus,
}

/// Durable default-tracking state of one collateral instance
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct DefaultState {
    pub status: CollateralStatus,
    pub when_default: i64,          // NEVER while sound
    pub last_ref_per_tok: u128,     // High-water mark of refPerTok
}

impl DefaultState {
    pub fn new(ref_per_tok: u128) -> Self {
        Self {
            status: CollateralStatus::Sound,
            when_default: NEVER,
            last_ref_per_tok: ref_per_tok,
        }
    }

    /// Status as of `now`. An IFFY collateral whose delay has run out reads as
    /// DISABLED even before the next refresh records it.
    pub fn status_at(&self, now: i64) -> CollateralStatus {
        match self.status {
            CollateralStatus::Iffy if now >= self.when_default => CollateralStatus::Disabled,
            status => status,
        }
    }

    /// Advance the state machine by one refresh.
    ///
    /// `observed` is this call's refPerTok, `None` when it could not be
    /// computed. `deviation` is the soft-default signal. Returns the
    /// transition when the status as seen at `now` changed.
    pub fn apply(
        &mut self,
        now: i64,
        observed: Option<u128>,
        deviation: bool,
        delay_until_default: i64,
    ) -> Option<StatusTransition> {
        let before = self.status_at(now);
        if before == CollateralStatus::Disabled {
            self.status = CollateralStatus::Disabled;
            return None;
        }

        // Hard default: value per token went down
        match observed {
            Some(current) if current < self.last_ref_per_tok => {
                msg!(
                    "refPerTok fell from {} to {}",
                    self.last_ref_per_tok,
                    current
                );
                self.status = CollateralStatus::Disabled;
                self.when_default = self.when_default.min(now);
            }
            Some(current) => {
                self.last_ref_per_tok = self.last_ref_per_tok.max(current);
                self.apply_soft(now, deviation, delay_until_default);
            }
            None => self.apply_soft(now, true, delay_until_default),
        }

        let after = self.status_at(now);
        (after != before).then_some(StatusTransition {
            old_status: before,
            new_status: after,
        })
    }

    fn apply_soft(&mut self, now: i64, deviation: bool, delay_until_default: i64) {
        match (self.status, deviation) {
            (CollateralStatus::Sound, true) => {
                self.status = CollateralStatus::Iffy;
                self.when_default = now.saturating_add(delay_until_default);
            }
            (CollateralStatus::Iffy, true) if now >= self.when_default => {
                self.status = CollateralStatus::Disabled;
            }
            (CollateralStatus::Iffy, false) => {
                self.status = CollateralStatus::Sound;
                self.when_default = NEVER;
            }
            _ => {}
        }
    }
}
