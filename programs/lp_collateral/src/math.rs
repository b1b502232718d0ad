//! Fixed-point arithmetic on `u128` with 256-bit intermediates.
//!
//! Values are scaled by `FIX_ONE` (1e18). Products of a reserve and a price
//! routinely exceed `u128`, so multiplication is carried out on a full
//! 256-bit product and only the final quotient has to fit.

use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::CollateralError;

const LOW_MASK: u128 = u64::MAX as u128;

/// Full product `a * b` as `(high, low)` 128-bit words.
fn full_mul(a: u128, b: u128) -> (u128, u128) {
    let (a_hi, a_lo) = (a >> 64, a & LOW_MASK);
    let (b_hi, b_lo) = (b >> 64, b & LOW_MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    // < 3 * 2^64, carries into the high word
    let mid = (ll >> 64) + (lh & LOW_MASK) + (hl & LOW_MASK);

    let low = (ll & LOW_MASK) | (mid << 64);
    let high = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (high, low)
}

/// Divide a 256-bit value by `divisor`. `None` when the quotient does not fit.
fn div_wide(high: u128, low: u128, divisor: u128) -> Option<u128> {
    if divisor == 0 || high >= divisor {
        return None;
    }
    if high == 0 {
        return Some(low / divisor);
    }

    // Restoring long division, one bit of `low` at a time
    let mut rem = high;
    let mut quot: u128 = 0;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((low >> i) & 1);
        quot <<= 1;
        if carry == 1 || rem >= divisor {
            rem = rem.wrapping_sub(divisor);
            quot |= 1;
        }
    }
    Some(quot)
}

/// `floor(a * b / divisor)`
pub fn mul_div(a: u128, b: u128, divisor: u128) -> Result<u128> {
    let (high, low) = full_mul(a, b);
    div_wide(high, low, divisor).ok_or_else(|| error!(CollateralError::MathOverflow))
}

/// Fixed-point multiply: `a * b / FIX_ONE`
pub fn mul_fix(a: u128, b: u128) -> Result<u128> {
    mul_div(a, b, FIX_ONE)
}

/// Fixed-point divide: `a * FIX_ONE / b`
pub fn div_fix(a: u128, b: u128) -> Result<u128> {
    mul_div(a, FIX_ONE, b)
}

/// Integer square root (floor), Newton's method
pub fn isqrt(x: u128) -> u128 {
    if x == 0 {
        return 0;
    }

    // ceil(x / 2) without overflowing at u128::MAX
    let mut z = x / 2 + (x & 1);
    let mut y = x;

    while z < y {
        y = z;
        z = (x / z + z) / 2;
    }

    y
}

/// `floor(sqrt(a * b))` over the full 256-bit product.
///
/// For two fixed-point inputs the result is again fixed-point, which is what
/// the geometric means in the valuation code rely on.
pub fn sqrt_mul(a: u128, b: u128) -> u128 {
    let (high, low) = full_mul(a, b);
    if high == 0 {
        return isqrt(low);
    }

    // Start above the root: N < 2^bits  =>  sqrt(N) < 2^ceil(bits / 2)
    let bits = 256 - high.leading_zeros();
    let mut x = if bits >= 255 {
        u128::MAX
    } else {
        1u128 << ((bits + 1) / 2)
    };

    loop {
        let q = match div_wide(high, low, x) {
            Some(q) => q,
            None => break,
        };
        // floor((x + q) / 2) without overflow
        let next = (x >> 1) + (q >> 1) + (x & q & 1);
        if next >= x {
            break;
        }
        x = next;
    }

    x
}

/// `10^exp`, failing past `u128`
pub fn pow10(exp: u32) -> Result<u128> {
    10u128
        .checked_pow(exp)
        .ok_or_else(|| error!(CollateralError::MathOverflow))
}

/// Raw token amount with `decimals` places as a `FIX_ONE` scaled whole-token amount
pub fn normalize_amount(raw: u64, decimals: u8) -> Result<u128> {
    mul_div(raw as u128, FIX_ONE, pow10(decimals as u32)?)
}
