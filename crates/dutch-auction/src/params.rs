use soroban_sdk::contracttype;

use crate::error::AuctionError;

/// Wire tag for the linear pricing function.
pub const LINEAR: u32 = 0;
/// Wire tag for the exponential pricing function.
pub const EXPONENTIAL: u32 = 1;

/// Everything a maker fixes when starting an auction.
///
/// `pricing_function` and `amplifier` travel as raw tags so that a malformed
/// order can be rejected with a contract error instead of failing decoding.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionParameters {
    pub selling_asset_max: i128,
    pub purchasing_asset_max: i128,
    pub purchasing_asset_min: i128,
    pub started_at: u64,
    pub ended_at: u64,
    pub increasing: bool,
    pub pricing_function: u32,
    pub amplifier: u32,
    pub partial_fill: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Increasing,
    Decreasing,
}

impl From<bool> for Direction {
    fn from(increasing: bool) -> Self {
        if increasing {
            Direction::Increasing
        } else {
            Direction::Decreasing
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Curve {
    Linear,
    Exponential { amplifier: u32 },
}

impl Curve {
    pub fn from_tag(pricing_function: u32, amplifier: u32) -> Result<Self, AuctionError> {
        match pricing_function {
            LINEAR => Ok(Curve::Linear),
            EXPONENTIAL if amplifier == 0 => Err(AuctionError::InvalidBounds),
            EXPONENTIAL => Ok(Curve::Exponential { amplifier }),
            _ => Err(AuctionError::UnsupportedCurve),
        }
    }

    pub fn tag(&self) -> u32 {
        match self {
            Curve::Linear => LINEAR,
            Curve::Exponential { .. } => EXPONENTIAL,
        }
    }
}

impl AuctionParameters {
    pub fn direction(&self) -> Direction {
        self.increasing.into()
    }

    pub fn curve(&self) -> Result<Curve, AuctionError> {
        Curve::from_tag(self.pricing_function, self.amplifier)
    }

    /// Checks the invariants that hold for every auction regardless of curve.
    pub fn validate(&self) -> Result<(), AuctionError> {
        validate_window(self.started_at, self.ended_at)?;
        validate_bounds(
            self.selling_asset_max,
            self.purchasing_asset_max,
            self.purchasing_asset_min,
        )
    }

    /// Amount of the selling asset a single fill must at least take.
    pub fn partial_fill_floor(&self) -> i128 {
        if self.partial_fill {
            0
        } else {
            self.selling_asset_max
        }
    }
}

pub fn validate_window(started_at: u64, ended_at: u64) -> Result<(), AuctionError> {
    if ended_at <= started_at {
        return Err(AuctionError::InvalidTimeRange);
    }
    Ok(())
}

pub fn validate_bounds(selling_max: i128, max: i128, min: i128) -> Result<(), AuctionError> {
    if selling_max <= 0 || min < 0 || min > max {
        return Err(AuctionError::InvalidBounds);
    }
    Ok(())
}
