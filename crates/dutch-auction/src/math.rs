//! Fixed-point helpers shared by the price curves and the amount conversions.

use soroban_sdk::{Env, U256};

use crate::error::AuctionError;

/// Fixed-point one.
pub const BASE: u128 = 1_000_000_000_000_000_000;

/// e scaled by `BASE`, rounded down.
pub const E: u128 = 2_718_281_828_459_045_235;

/// e^-1 scaled by `BASE`, rounded down.
pub const E_INV: u128 = BASE * BASE / E;

/// Amplified seconds that make up one unit of the decay exponent. With an
/// amplifier of 10 a one hour auction reaches e^-1 at its end.
pub const DECAY_SCALE: u128 = 36_000;

/// Past this integer exponent e^-x is below one unit of `BASE`.
const MAX_EXPONENT: u128 = 41;

/// Computes `a * b / c` rounding down, multiplying in a 256-bit accumulator.
pub fn mul_div(env: &Env, a: i128, b: i128, c: i128) -> Result<i128, AuctionError> {
    if c == 0 {
        return Err(AuctionError::DivisionByZero);
    }
    let a = u128::try_from(a).map_err(|_| AuctionError::InvalidAmount)?;
    let b = u128::try_from(b).map_err(|_| AuctionError::InvalidAmount)?;
    let c = u128::try_from(c).map_err(|_| AuctionError::InvalidAmount)?;

    let quotient = U256::from_u128(env, a)
        .mul(&U256::from_u128(env, b))
        .div(&U256::from_u128(env, c))
        .to_u128()
        .ok_or(AuctionError::ArithmeticOverflow)?;

    i128::try_from(quotient).map_err(|_| AuctionError::ArithmeticOverflow)
}

/// Approximates `e^(-amplified_seconds / DECAY_SCALE)` scaled by `BASE`.
///
/// The exponent is split into its integer part `n` and fractional part `f`.
/// `e^-n` is accumulated by repeated multiplication with `E_INV`, `e^-f` is
/// `BASE^2 / e^f` where `e^f` is a Taylor series of floored, non-negative
/// terms. Every step rounds down in the same direction, so the result is
/// exactly `BASE` at zero, never increases, and settles at zero.
pub fn decay_fraction(amplified_seconds: u128) -> u128 {
    let whole = amplified_seconds / DECAY_SCALE;
    if whole > MAX_EXPONENT {
        return 0;
    }
    let fraction = (amplified_seconds % DECAY_SCALE) * BASE / DECAY_SCALE;

    let mut integral = BASE;
    for _ in 0..whole {
        integral = integral * E_INV / BASE;
    }

    integral * (BASE * BASE / exp_fraction(fraction)) / BASE
}

/// `e^f` scaled by `BASE` for `0 <= f < BASE`. Never exceeds `E`.
fn exp_fraction(fraction: u128) -> u128 {
    let mut sum = BASE;
    let mut term = BASE;
    let mut k = 1;
    while term > 0 {
        term = term * fraction / (k * BASE);
        sum += term;
        k += 1;
    }
    sum
}
