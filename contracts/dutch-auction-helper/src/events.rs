use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

pub const SETTLED: Symbol = symbol_short!("settled");

pub const NONCE: Symbol = symbol_short!("nonce");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionSettled {
    pub auction_owner: Address,
    pub taker: Address,
    pub taker_asset: Address,
    pub making_amount: i128,
    pub taking_amount: i128,
    pub net_to_maker: i128,
    pub fee_amount: i128,
    pub started_at: u64,
}

pub fn settled(env: &Env, event: AuctionSettled) {
    env.events()
        .publish((SETTLED, event.auction_owner.clone()), event);
}

pub fn nonce_changed(env: &Env, owner: &Address, nonce: u64) {
    env.events().publish((NONCE, owner.clone()), nonce);
}
