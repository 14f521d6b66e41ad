//! Conversions between the selling and purchasing asset at a given price.
//!
//! `unit` is the selling-asset amount the price is quoted for, i.e. the
//! auction lot.

use soroban_sdk::Env;

use crate::{error::AuctionError, math::mul_div};

/// Selling-asset amount worth `purchasing_amount` at `price`.
pub fn selling_amount_for(
    env: &Env,
    price: i128,
    purchasing_amount: i128,
    unit: i128,
) -> Result<i128, AuctionError> {
    if purchasing_amount < 0 {
        return Err(AuctionError::InvalidAmount);
    }
    mul_div(env, purchasing_amount, unit, price)
}

/// Purchasing-asset amount owed for `selling_amount` at `price`.
pub fn purchasing_amount_for(
    env: &Env,
    price: i128,
    selling_amount: i128,
    unit: i128,
) -> Result<i128, AuctionError> {
    if selling_amount < 0 {
        return Err(AuctionError::InvalidAmount);
    }
    if price == 0 {
        return Err(AuctionError::DivisionByZero);
    }
    mul_div(env, selling_amount, price, unit)
}
