#![no_std]
use dutch_auction::{
    convert::{purchasing_amount_for, selling_amount_for},
    curve,
    math::decay_fraction,
    params::validate_bounds,
    AuctionError, AuctionInteraction, AuctionParameters, Direction,
};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, panic_with_error, token, Address,
    Bytes, Env,
};

mod events;
mod settlement;

pub use events::AuctionSettled;
pub use settlement::FEE_BASE;

#[contracttype]
pub enum DataKey {
    SettlementEngine,
    FeeConfig,
    Nonce(Address),
}

/// Fee charged on every settled auction, fixed at deployment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    pub fee: u32,
    pub fee_receiver: Address,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum SettlementError {
    NotInitialized = 101,
    InvalidFee = 102,
    PartialFillNotAllowed = 103,
    MalformedInteraction = 104,
    InvalidAmount = 105,
    ArithmeticOverflow = 106,
}

const NONCE_TTL_THRESHOLD: u32 = 100;
const NONCE_TTL_EXTEND_TO: u32 = 100;

#[contract]
pub struct DutchAuctionHelper;

#[contractimpl]
impl DutchAuctionHelper {
    /// Binds the helper to the settlement engine allowed to report fills and
    /// fixes the fee configuration.
    pub fn __constructor(env: Env, settlement_engine: Address, fee_receiver: Address, fee: u32) {
        if fee > FEE_BASE {
            panic_with_error!(&env, SettlementError::InvalidFee);
        }

        env.storage()
            .instance()
            .set(&DataKey::SettlementEngine, &settlement_engine);
        env.storage().instance().set(
            &DataKey::FeeConfig,
            &FeeConfig {
                fee,
                fee_receiver,
            },
        );
    }

    pub fn fee(env: Env) -> Result<u32, SettlementError> {
        Ok(fee_config(&env)?.fee)
    }

    pub fn fee_receiver(env: Env) -> Result<Address, SettlementError> {
        Ok(fee_config(&env)?.fee_receiver)
    }

    pub fn settlement_engine(env: Env) -> Result<Address, SettlementError> {
        env.storage()
            .instance()
            .get(&DataKey::SettlementEngine)
            .ok_or(SettlementError::NotInitialized)
    }

    /// Current price of the whole lot on a linear curve.
    pub fn linear_price(
        env: Env,
        selling_asset_max: i128,
        purchasing_asset_max: i128,
        purchasing_asset_min: i128,
        started_at: u64,
        ended_at: u64,
        increasing: bool,
    ) -> Result<i128, AuctionError> {
        validate_bounds(selling_asset_max, purchasing_asset_max, purchasing_asset_min)?;
        curve::linear_price(
            &env,
            Direction::from(increasing),
            purchasing_asset_max,
            purchasing_asset_min,
            started_at,
            ended_at,
            env.ledger().timestamp(),
        )
    }

    /// Current price of the whole lot on an exponential curve.
    pub fn exponential_price(
        env: Env,
        selling_asset_max: i128,
        purchasing_asset_max: i128,
        purchasing_asset_min: i128,
        started_at: u64,
        ended_at: u64,
        increasing: bool,
        amplifier: u32,
    ) -> Result<i128, AuctionError> {
        validate_bounds(selling_asset_max, purchasing_asset_max, purchasing_asset_min)?;
        curve::exponential_price(
            &env,
            Direction::from(increasing),
            purchasing_asset_max,
            purchasing_asset_min,
            started_at,
            ended_at,
            env.ledger().timestamp(),
            amplifier,
        )
    }

    /// Selling-asset amount a taker receives for `taking_amount`.
    pub fn linear_maker_amount(
        env: Env,
        selling_asset_max: i128,
        purchasing_asset_max: i128,
        purchasing_asset_min: i128,
        started_at: u64,
        ended_at: u64,
        increasing: bool,
        taking_amount: i128,
    ) -> Result<i128, AuctionError> {
        let price = Self::linear_price(
            env.clone(),
            selling_asset_max,
            purchasing_asset_max,
            purchasing_asset_min,
            started_at,
            ended_at,
            increasing,
        )?;
        maker_amount_at(&env, price, selling_asset_max, taking_amount)
    }

    /// Purchasing-asset amount a taker pays for `making_amount`.
    pub fn linear_taker_amount(
        env: Env,
        selling_asset_max: i128,
        purchasing_asset_max: i128,
        purchasing_asset_min: i128,
        started_at: u64,
        ended_at: u64,
        increasing: bool,
        making_amount: i128,
    ) -> Result<i128, AuctionError> {
        let price = Self::linear_price(
            env.clone(),
            selling_asset_max,
            purchasing_asset_max,
            purchasing_asset_min,
            started_at,
            ended_at,
            increasing,
        )?;
        purchasing_amount_for(&env, price, making_amount, selling_asset_max)
    }

    pub fn exponential_maker_amount(
        env: Env,
        selling_asset_max: i128,
        purchasing_asset_max: i128,
        purchasing_asset_min: i128,
        started_at: u64,
        ended_at: u64,
        increasing: bool,
        amplifier: u32,
        taking_amount: i128,
    ) -> Result<i128, AuctionError> {
        let price = Self::exponential_price(
            env.clone(),
            selling_asset_max,
            purchasing_asset_max,
            purchasing_asset_min,
            started_at,
            ended_at,
            increasing,
            amplifier,
        )?;
        maker_amount_at(&env, price, selling_asset_max, taking_amount)
    }

    pub fn exponential_taker_amount(
        env: Env,
        selling_asset_max: i128,
        purchasing_asset_max: i128,
        purchasing_asset_min: i128,
        started_at: u64,
        ended_at: u64,
        increasing: bool,
        amplifier: u32,
        making_amount: i128,
    ) -> Result<i128, AuctionError> {
        let price = Self::exponential_price(
            env.clone(),
            selling_asset_max,
            purchasing_asset_max,
            purchasing_asset_min,
            started_at,
            ended_at,
            increasing,
            amplifier,
        )?;
        purchasing_amount_for(&env, price, making_amount, selling_asset_max)
    }

    pub fn current_price(env: Env, params: AuctionParameters) -> Result<i128, AuctionError> {
        curve::current_price(&env, &params, env.ledger().timestamp())
    }

    pub fn maker_amount_given(
        env: Env,
        params: AuctionParameters,
        taking_amount: i128,
    ) -> Result<i128, AuctionError> {
        let price = curve::current_price(&env, &params, env.ledger().timestamp())?;
        maker_amount_at(&env, price, params.selling_asset_max, taking_amount)
    }

    pub fn taker_amount_given(
        env: Env,
        params: AuctionParameters,
        making_amount: i128,
    ) -> Result<i128, AuctionError> {
        let price = curve::current_price(&env, &params, env.ledger().timestamp())?;
        purchasing_amount_for(&env, price, making_amount, params.selling_asset_max)
    }

    /// Decay fraction scaled by 1e18 after `seconds` amplified seconds.
    pub fn exp_by_seconds(_env: Env, seconds: u64) -> u128 {
        decay_fraction(u128::from(seconds))
    }

    pub fn nonce(env: Env, owner: Address) -> u64 {
        env.storage()
            .persistent()
            .get(&DataKey::Nonce(owner))
            .unwrap_or(0)
    }

    /// Invalidates every outstanding order of `owner` built with the
    /// current nonce.
    pub fn increase_nonce(env: Env, owner: Address) -> Result<u64, SettlementError> {
        Self::advance_nonce(env, owner, 1)
    }

    pub fn advance_nonce(env: Env, owner: Address, amount: u32) -> Result<u64, SettlementError> {
        owner.require_auth();

        let key = DataKey::Nonce(owner.clone());
        let nonce = Self::nonce(env.clone(), owner.clone())
            .checked_add(u64::from(amount))
            .ok_or(SettlementError::ArithmeticOverflow)?;
        env.storage().persistent().set(&key, &nonce);
        env.storage()
            .persistent()
            .extend_ttl(&key, NONCE_TTL_THRESHOLD, NONCE_TTL_EXTEND_TO);

        events::nonce_changed(&env, &owner, nonce);
        Ok(nonce)
    }

    pub fn nonce_equals(env: Env, owner: Address, nonce: u64) -> bool {
        Self::nonce(env, owner) == nonce
    }

    pub fn timestamp_below(env: Env, deadline: u64) -> bool {
        env.ledger().timestamp() < deadline
    }

    /// Quotes how `amount` of proceeds is split: `(net_to_maker, fee_amount)`.
    pub fn settle(env: Env, amount: i128) -> Result<(i128, i128), SettlementError> {
        let config = fee_config(&env)?;
        settlement::split(&env, amount, config.fee)
    }

    /// Post-fill hook called by the settlement engine once the taker's
    /// payment has been sent to this contract.
    pub fn notify_fill_order(
        env: Env,
        taker: Address,
        _maker_asset: Address,
        taker_asset: Address,
        making_amount: i128,
        taking_amount: i128,
        data: Bytes,
    ) -> Result<(), SettlementError> {
        Self::settlement_engine(env.clone())?.require_auth();

        let interaction = AuctionInteraction::decode(&env, &data)
            .map_err(|_| SettlementError::MalformedInteraction)?;

        if making_amount < interaction.partial_fill_floor {
            return Err(SettlementError::PartialFillNotAllowed);
        }

        let config = fee_config(&env)?;
        let (net_to_maker, fee_amount) = settlement::split(&env, taking_amount, config.fee)?;

        let token = token::Client::new(&env, &taker_asset);
        let helper = env.current_contract_address();
        if fee_amount > 0 {
            token.transfer(&helper, &config.fee_receiver, &fee_amount);
        }
        if net_to_maker > 0 {
            token.transfer(&helper, &interaction.auction_owner, &net_to_maker);
        }

        log!(
            &env,
            "auction fill settled: making={}, taking={}, fee={}",
            making_amount,
            taking_amount,
            fee_amount
        );

        events::settled(
            &env,
            AuctionSettled {
                auction_owner: interaction.auction_owner,
                taker,
                taker_asset,
                making_amount,
                taking_amount,
                net_to_maker,
                fee_amount,
                started_at: interaction.started_at,
            },
        );

        Ok(())
    }
}

fn fee_config(env: &Env) -> Result<FeeConfig, SettlementError> {
    env.storage()
        .instance()
        .get(&DataKey::FeeConfig)
        .ok_or(SettlementError::NotInitialized)
}

/// Converts a requested purchasing amount into the selling asset, never
/// handing out more than the lot.
fn maker_amount_at(
    env: &Env,
    price: i128,
    selling_asset_max: i128,
    taking_amount: i128,
) -> Result<i128, AuctionError> {
    let making = selling_amount_for(env, price, taking_amount, selling_asset_max)?;
    Ok(making.min(selling_asset_max))
}
