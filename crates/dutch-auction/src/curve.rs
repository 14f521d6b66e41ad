//! Price curves over the auction window.
//!
//! A price is the purchasing-asset amount asked for the whole lot at a given
//! ledger time. Every curve is total: before the window it returns the
//! opening bound, from `ended_at` on it returns the closing bound.

use soroban_sdk::Env;

use crate::{
    error::AuctionError,
    math::{decay_fraction, mul_div, BASE},
    params::{validate_window, AuctionParameters, Curve, Direction},
};

/// Linear interpolation between the bounds.
pub fn linear_price(
    env: &Env,
    direction: Direction,
    max: i128,
    min: i128,
    started_at: u64,
    ended_at: u64,
    now: u64,
) -> Result<i128, AuctionError> {
    validate_window(started_at, ended_at)?;
    validate_range(max, min)?;

    if now < started_at {
        return Ok(opening_bound(direction, max, min));
    }
    if now >= ended_at {
        return Ok(closing_bound(direction, max, min));
    }

    let elapsed = i128::from(now - started_at);
    let duration = i128::from(ended_at - started_at);
    let step = mul_div(env, max - min, elapsed, duration)?;

    Ok(match direction {
        Direction::Decreasing => max - step,
        Direction::Increasing => min + step,
    })
}

/// Exponential decay (or its complement when increasing), floored at `min`.
#[allow(clippy::too_many_arguments)]
pub fn exponential_price(
    env: &Env,
    direction: Direction,
    max: i128,
    min: i128,
    started_at: u64,
    ended_at: u64,
    now: u64,
    amplifier: u32,
) -> Result<i128, AuctionError> {
    validate_window(started_at, ended_at)?;
    validate_range(max, min)?;
    if amplifier == 0 {
        return Err(AuctionError::InvalidBounds);
    }

    if now < started_at {
        return Ok(opening_bound(direction, max, min));
    }
    if now >= ended_at {
        return Ok(closing_bound(direction, max, min));
    }

    let amplified = u128::from(now - started_at) * u128::from(amplifier);
    let exp = decay_fraction(amplified) as i128;
    let base = BASE as i128;

    let padded = match direction {
        Direction::Decreasing => mul_div(env, max, exp, base)?,
        Direction::Increasing => mul_div(env, max, base - exp, base)?,
    };

    // The approximation undershoots in the tail; never go below the floor.
    Ok(padded.max(min))
}

/// Dispatches to the curve selected by `params`.
pub fn current_price(env: &Env, params: &AuctionParameters, now: u64) -> Result<i128, AuctionError> {
    params.validate()?;
    let direction = params.direction();
    let max = params.purchasing_asset_max;
    let min = params.purchasing_asset_min;

    match params.curve()? {
        Curve::Linear => linear_price(
            env,
            direction,
            max,
            min,
            params.started_at,
            params.ended_at,
            now,
        ),
        Curve::Exponential { amplifier } => exponential_price(
            env,
            direction,
            max,
            min,
            params.started_at,
            params.ended_at,
            now,
            amplifier,
        ),
    }
}

fn validate_range(max: i128, min: i128) -> Result<(), AuctionError> {
    if min < 0 || min > max {
        return Err(AuctionError::InvalidBounds);
    }
    Ok(())
}

fn opening_bound(direction: Direction, max: i128, min: i128) -> i128 {
    match direction {
        Direction::Decreasing => max,
        Direction::Increasing => min,
    }
}

fn closing_bound(direction: Direction, max: i128, min: i128) -> i128 {
    match direction {
        Direction::Decreasing => min,
        Direction::Increasing => max,
    }
}
