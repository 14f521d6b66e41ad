use soroban_sdk::{
    contracttype,
    xdr::{FromXdr, ToXdr},
    Address, Bytes, BytesN, Env,
};

use crate::{call::AmountGetter, error::AuctionError, predicate::Predicate};

/// A signed limit order as the settlement engine consumes it.
///
/// Field order is part of the encoding: the order hash is taken over the
/// XDR of this record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Order {
    pub salt: u64,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub maker: Address,
    pub receiver: Address,
    pub allowed_sender: Option<Address>,
    pub making_amount: i128,
    pub taking_amount: i128,
    pub get_maker_amount: AmountSource,
    pub get_taker_amount: AmountSource,
    /// An empty predicate always holds.
    pub predicate: Predicate,
    pub permit: Bytes,
    pub interaction: PostFill,
}

impl Order {
    pub fn hash(&self, env: &Env) -> BytesN<32> {
        env.crypto().sha256(&self.clone().to_xdr(env)).into()
    }
}

/// Where the engine takes the counter amount of a fill from.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AmountSource {
    /// Fixed rate `making_amount : taking_amount`.
    Proportional,
    Getter(AmountGetter),
}

impl AmountSource {
    pub fn getter(&self) -> Option<&AmountGetter> {
        match self {
            AmountSource::Proportional => None,
            AmountSource::Getter(getter) => Some(getter),
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PostFill {
    Skip,
    Notify(Interaction),
}

impl PostFill {
    pub fn interaction(&self) -> Option<&Interaction> {
        match self {
            PostFill::Skip => None,
            PostFill::Notify(interaction) => Some(interaction),
        }
    }
}

/// Post-fill hook: the engine calls `notify_fill_order` on `target` with
/// `data` as the last argument.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interaction {
    pub target: Address,
    pub data: Bytes,
}

/// What the helper needs at settlement time to route the proceeds.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionInteraction {
    pub auction_owner: Address,
    pub partial_fill_floor: i128,
    pub started_at: u64,
}

impl AuctionInteraction {
    pub fn encode(&self, env: &Env) -> Bytes {
        self.clone().to_xdr(env)
    }

    pub fn decode(env: &Env, data: &Bytes) -> Result<Self, AuctionError> {
        Self::from_xdr(env, data).map_err(|_| AuctionError::MalformedInteraction)
    }
}
