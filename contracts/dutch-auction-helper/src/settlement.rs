use dutch_auction::{math::mul_div, AuctionError};
use soroban_sdk::Env;

use crate::SettlementError;

/// Denominator of the fee rate: a fee of 1_000 is 1%.
pub const FEE_BASE: u32 = 100_000;

/// Splits `amount` into what the maker receives and what the fee receiver
/// takes. The two parts always add up to `amount`.
pub fn split(env: &Env, amount: i128, fee: u32) -> Result<(i128, i128), SettlementError> {
    let fee_amount = mul_div(env, amount, i128::from(fee), i128::from(FEE_BASE)).map_err(
        |err| match err {
            AuctionError::InvalidAmount => SettlementError::InvalidAmount,
            _ => SettlementError::ArithmeticOverflow,
        },
    )?;
    Ok((amount - fee_amount, fee_amount))
}
