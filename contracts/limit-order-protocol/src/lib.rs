#![no_std]
use dutch_auction::{math::mul_div, AuctionError, Order};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, symbol_short, token, vec, Address,
    BytesN, Env, IntoVal, Symbol,
};

#[contracttype]
pub enum DataKey {
    OrderState(BytesN<32>), // order_hash -> OrderState
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OrderState {
    /// Still fillable for the given remaining making amount.
    Active(i128),
    Filled,
    Cancelled,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    PrivateOrder = 201,
    OrderAlreadyFilled = 202,
    OrderCancelled = 203,
    PredicateIsNotTrue = 204,
    InvalidAmounts = 205,
    TakingAmountTooHigh = 206,
    MakingAmountTooLow = 207,
    SwapWithZeroAmount = 208,
    ArithmeticOverflow = 209,
}

const NOTIFY_FILL_ORDER: &str = "notify_fill_order";

const ORDER_TTL_THRESHOLD: u32 = 100;
const ORDER_TTL_EXTEND_TO: u32 = 100;

#[contract]
pub struct LimitOrderProtocol;

#[contractimpl]
impl LimitOrderProtocol {
    /// Fill an order, fully or partially.
    ///
    /// Exactly one of `making_amount` and `taking_amount` must be non-zero;
    /// the other one is derived through the order's amount getters. When
    /// the making side is given, `threshold_amount` caps what the taker
    /// pays (zero disables the cap); when the taking side is given it is
    /// the minimum the taker must receive.
    pub fn fill_order(
        env: Env,
        order: Order,
        taker: Address,
        making_amount: i128,
        taking_amount: i128,
        threshold_amount: i128,
    ) -> Result<(i128, i128), Error> {
        // Require authorization from taker
        taker.require_auth();

        if let Some(allowed_sender) = &order.allowed_sender {
            if *allowed_sender != taker {
                return Err(Error::PrivateOrder);
            }
        }

        let order_hash = order.hash(&env);
        let remaining = Self::remaining_for(&env, &order, &order_hash)?;

        if !order.predicate.evaluate(&env) {
            return Err(Error::PredicateIsNotTrue);
        }

        if making_amount < 0 || taking_amount < 0 || (making_amount == 0) == (taking_amount == 0) {
            return Err(Error::InvalidAmounts);
        }

        let (actual_making_amount, actual_taking_amount) = if taking_amount == 0 {
            let making = making_amount.min(remaining);
            let taking = Self::taker_amount_for(&env, &order, making)?;
            if threshold_amount > 0 && taking > threshold_amount {
                return Err(Error::TakingAmountTooHigh);
            }
            (making, taking)
        } else {
            let mut taking = taking_amount;
            let mut making = Self::maker_amount_for(&env, &order, taking)?;
            if making > remaining {
                making = remaining;
                taking = Self::taker_amount_for(&env, &order, making)?;
            }
            if making < threshold_amount {
                return Err(Error::MakingAmountTooLow);
            }
            (making, taking)
        };

        if actual_making_amount <= 0 || actual_taking_amount <= 0 {
            return Err(Error::SwapWithZeroAmount);
        }

        // Require authorization from maker for their assets
        order.maker.require_auth();

        let left = remaining - actual_making_amount;
        let state = if left == 0 {
            OrderState::Filled
        } else {
            OrderState::Active(left)
        };
        Self::store_state(&env, &order_hash, &state);

        // Maker asset goes to the taker, taker asset to the order's receiver
        let maker_token = token::Client::new(&env, &order.maker_asset);
        maker_token.transfer(&order.maker, &taker, &actual_making_amount);

        let taker_token = token::Client::new(&env, &order.taker_asset);
        taker_token.transfer(&taker, &order.receiver, &actual_taking_amount);

        if let Some(interaction) = order.interaction.interaction() {
            env.invoke_contract::<()>(
                &interaction.target,
                &Symbol::new(&env, NOTIFY_FILL_ORDER),
                vec![
                    &env,
                    taker.into_val(&env),
                    order.maker_asset.into_val(&env),
                    order.taker_asset.into_val(&env),
                    actual_making_amount.into_val(&env),
                    actual_taking_amount.into_val(&env),
                    interaction.data.into_val(&env),
                ],
            );
        }

        log!(
            &env,
            "order filled: making={}, taking={}, left={}",
            actual_making_amount,
            actual_taking_amount,
            left
        );

        env.events().publish(
            (symbol_short!("filled"), order_hash),
            (taker, actual_making_amount, actual_taking_amount),
        );

        Ok((actual_making_amount, actual_taking_amount))
    }

    /// Cancel an order (only by maker)
    pub fn cancel_order(env: Env, order: Order) -> Result<(), Error> {
        // Require authorization from maker
        order.maker.require_auth();

        let order_hash = order.hash(&env);
        Self::remaining_for(&env, &order, &order_hash)?;

        Self::store_state(&env, &order_hash, &OrderState::Cancelled);

        env.events()
            .publish((symbol_short!("cancelled"),), order_hash);

        Ok(())
    }

    pub fn order_state(env: Env, order: Order) -> OrderState {
        let order_hash = order.hash(&env);
        env.storage()
            .persistent()
            .get(&DataKey::OrderState(order_hash))
            .unwrap_or(OrderState::Active(order.making_amount))
    }

    /// Making amount still available, zero once filled or cancelled.
    pub fn remaining(env: Env, order: Order) -> i128 {
        match Self::order_state(env, order) {
            OrderState::Active(remaining) => remaining,
            OrderState::Filled | OrderState::Cancelled => 0,
        }
    }

    pub fn order_hash(env: Env, order: Order) -> BytesN<32> {
        order.hash(&env)
    }

    /// Whether the order's predicate currently holds. Orders without one
    /// are always valid.
    pub fn check_predicate(env: Env, order: Order) -> bool {
        order.predicate.evaluate(&env)
    }

    fn remaining_for(env: &Env, order: &Order, order_hash: &BytesN<32>) -> Result<i128, Error> {
        let state: Option<OrderState> = env
            .storage()
            .persistent()
            .get(&DataKey::OrderState(order_hash.clone()));

        match state {
            None => Ok(order.making_amount),
            Some(OrderState::Active(remaining)) => Ok(remaining),
            Some(OrderState::Filled) => Err(Error::OrderAlreadyFilled),
            Some(OrderState::Cancelled) => Err(Error::OrderCancelled),
        }
    }

    fn store_state(env: &Env, order_hash: &BytesN<32>, state: &OrderState) {
        let key = DataKey::OrderState(order_hash.clone());
        env.storage().persistent().set(&key, state);
        env.storage()
            .persistent()
            .extend_ttl(&key, ORDER_TTL_THRESHOLD, ORDER_TTL_EXTEND_TO);
    }

    fn taker_amount_for(env: &Env, order: &Order, making_amount: i128) -> Result<i128, Error> {
        match order.get_taker_amount.getter() {
            Some(getter) => Ok(getter.invoke(env, making_amount)),
            None => proportional(env, making_amount, order.taking_amount, order.making_amount),
        }
    }

    fn maker_amount_for(env: &Env, order: &Order, taking_amount: i128) -> Result<i128, Error> {
        match order.get_maker_amount.getter() {
            Some(getter) => Ok(getter.invoke(env, taking_amount)),
            None => proportional(env, taking_amount, order.making_amount, order.taking_amount),
        }
    }
}

/// Fixed-rate fallback for orders without amount getters.
fn proportional(env: &Env, amount: i128, numerator: i128, denominator: i128) -> Result<i128, Error> {
    mul_div(env, amount, numerator, denominator).map_err(|err| match err {
        AuctionError::InvalidAmount | AuctionError::DivisionByZero => Error::InvalidAmounts,
        _ => Error::ArithmeticOverflow,
    })
}
