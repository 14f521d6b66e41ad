#![no_std]
use dutch_auction::{build_auction_order, AuctionParameters, MakerOrder, Order};
use soroban_sdk::{
    auth::{Context, CustomAccountInterface},
    contract, contracterror, contractimpl, contracttype,
    crypto::Hash,
    log, symbol_short, token, vec, Address, BytesN, Env, IntoVal, Symbol, TryFromVal, Val, Vec,
};

#[contracttype]
pub enum DataKey {
    Owner,
    Helper,
    SettlementEngine,
    Auction(BytesN<32>), // order_hash -> AuctionTerms
}

/// What the owner wants to sell and on which curve.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionTerms {
    pub selling_asset: Address,
    pub purchasing_asset: Address,
    pub selling_amount: i128,
    pub pricing_function: u32,
    pub amplifier: u32,
    pub increasing: bool,
    pub partial_fill: bool,
    pub min_purchasing_amount: i128,
    pub max_purchasing_amount: i128,
    pub started_at: u64,
    pub ended_at: u64,
    pub salt: u64,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MakerError {
    NotInitialized = 301,
    InvalidAuction = 302,
    InsufficientBalance = 303,
    UnknownAuction = 304,
    UnauthorizedContext = 305,
}

const FILL_ORDER: &str = "fill_order";
const TRANSFER: &str = "transfer";
const NONCE: &str = "nonce";
const INCREASE_NONCE: &str = "increase_nonce";

const AUCTION_TTL_THRESHOLD: u32 = 100;
const AUCTION_TTL_EXTEND_TO: u32 = 100;

/// A contract that sells its own holdings through Dutch auctions.
///
/// It is the maker of every order it starts. Instead of signing, it
/// approves the settlement engine's `fill_order` calls for the orders it
/// has recorded, together with the transfer of the lot out of its balance.
#[contract]
pub struct AuctionMaker;

#[contractimpl]
impl AuctionMaker {
    pub fn __constructor(env: Env, owner: Address, helper: Address, settlement_engine: Address) {
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Helper, &helper);
        env.storage()
            .instance()
            .set(&DataKey::SettlementEngine, &settlement_engine);
    }

    /// Puts `terms.selling_amount` of the contract's balance up for auction
    /// and returns the order takers fill against the settlement engine.
    pub fn start_auction(env: Env, terms: AuctionTerms) -> Result<Order, MakerError> {
        read_owner(&env)?.require_auth();

        let this = env.current_contract_address();
        let helper = read_helper(&env)?;

        let balance = token::Client::new(&env, &terms.selling_asset).balance(&this);
        if balance < terms.selling_amount {
            return Err(MakerError::InsufficientBalance);
        }

        let nonce: u64 = env.invoke_contract(
            &helper,
            &Symbol::new(&env, NONCE),
            vec![&env, this.into_val(&env)],
        );

        let maker_order = MakerOrder {
            salt: terms.salt,
            maker_asset: terms.selling_asset.clone(),
            taker_asset: terms.purchasing_asset.clone(),
            maker: this,
            nonce,
            allowed_sender: None,
        };
        let params = AuctionParameters {
            selling_asset_max: terms.selling_amount,
            purchasing_asset_max: terms.max_purchasing_amount,
            purchasing_asset_min: terms.min_purchasing_amount,
            started_at: terms.started_at,
            ended_at: terms.ended_at,
            increasing: terms.increasing,
            pricing_function: terms.pricing_function,
            amplifier: terms.amplifier,
            partial_fill: terms.partial_fill,
        };
        let order = build_auction_order(&env, &helper, &maker_order, &params).map_err(|err| {
            log!(&env, "auction rejected: {}", err as u32);
            MakerError::InvalidAuction
        })?;

        let order_hash = order.hash(&env);
        let key = DataKey::Auction(order_hash.clone());
        env.storage().persistent().set(&key, &terms);
        env.storage()
            .persistent()
            .extend_ttl(&key, AUCTION_TTL_THRESHOLD, AUCTION_TTL_EXTEND_TO);

        env.events()
            .publish((symbol_short!("started"), order_hash), terms.selling_amount);

        Ok(order)
    }

    pub fn auction(env: Env, order_hash: BytesN<32>) -> Result<AuctionTerms, MakerError> {
        env.storage()
            .persistent()
            .get(&DataKey::Auction(order_hash))
            .ok_or(MakerError::UnknownAuction)
    }

    /// Stops approving fills of one auction.
    pub fn cancel_auction(env: Env, order_hash: BytesN<32>) -> Result<(), MakerError> {
        read_owner(&env)?.require_auth();

        let key = DataKey::Auction(order_hash.clone());
        if !env.storage().persistent().has(&key) {
            return Err(MakerError::UnknownAuction);
        }
        env.storage().persistent().remove(&key);

        env.events()
            .publish((symbol_short!("cancelled"),), order_hash);
        Ok(())
    }

    /// Invalidates every order started so far by bumping the contract's
    /// nonce on the helper. Returns the new nonce.
    pub fn cancel_all(env: Env) -> Result<u64, MakerError> {
        read_owner(&env)?.require_auth();

        let this = env.current_contract_address();
        let nonce: u64 = env.invoke_contract(
            &read_helper(&env)?,
            &Symbol::new(&env, INCREASE_NONCE),
            vec![&env, this.into_val(&env)],
        );
        Ok(nonce)
    }

    /// Moves proceeds or unsold lots out of the contract.
    pub fn withdraw(env: Env, asset: Address, to: Address, amount: i128) -> Result<(), MakerError> {
        read_owner(&env)?.require_auth();

        token::Client::new(&env, &asset).transfer(&env.current_contract_address(), &to, &amount);
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, MakerError> {
        read_owner(&env)
    }
}

#[contractimpl]
impl CustomAccountInterface for AuctionMaker {
    type Signature = ();
    type Error = MakerError;

    /// Approves a `fill_order` on the settlement engine for an auction this
    /// contract started, and the transfers of that order's lot out of the
    /// contract which the engine performs within the fill. Anything else is
    /// refused.
    #[allow(non_snake_case)]
    fn __check_auth(
        env: Env,
        _signature_payload: Hash<32>,
        _signature: (),
        auth_contexts: Vec<Context>,
    ) -> Result<(), MakerError> {
        let engine = read_settlement_engine(&env)?;
        let this = env.current_contract_address();
        let fill_order = Symbol::new(&env, FILL_ORDER);
        let transfer = Symbol::new(&env, TRANSFER);

        let mut filling: Option<Order> = None;
        for context in auth_contexts.iter() {
            let Context::Contract(call) = context else {
                return Err(MakerError::UnauthorizedContext);
            };

            if call.contract == engine && call.fn_name == fill_order {
                let order: Order = arg(&env, &call.args, 0)?;
                let known = env
                    .storage()
                    .persistent()
                    .has(&DataKey::Auction(order.hash(&env)));
                if order.maker != this || !known {
                    return Err(MakerError::UnknownAuction);
                }
                filling = Some(order);
            } else if call.fn_name == transfer {
                let order = filling.as_ref().ok_or(MakerError::UnauthorizedContext)?;
                let from: Address = arg(&env, &call.args, 0)?;
                let amount: i128 = arg(&env, &call.args, 2)?;
                if call.contract != order.maker_asset
                    || from != this
                    || amount > order.making_amount
                {
                    return Err(MakerError::UnauthorizedContext);
                }
            } else {
                return Err(MakerError::UnauthorizedContext);
            }
        }

        Ok(())
    }
}

fn arg<T>(env: &Env, args: &Vec<Val>, index: u32) -> Result<T, MakerError>
where
    T: TryFromVal<Env, Val>,
{
    let value = args.get(index).ok_or(MakerError::UnauthorizedContext)?;
    T::try_from_val(env, &value).map_err(|_| MakerError::UnauthorizedContext)
}

fn read_owner(env: &Env) -> Result<Address, MakerError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(MakerError::NotInitialized)
}

fn read_helper(env: &Env) -> Result<Address, MakerError> {
    env.storage()
        .instance()
        .get(&DataKey::Helper)
        .ok_or(MakerError::NotInitialized)
}

fn read_settlement_engine(env: &Env) -> Result<Address, MakerError> {
    env.storage()
        .instance()
        .get(&DataKey::SettlementEngine)
        .ok_or(MakerError::NotInitialized)
}

mod test;
