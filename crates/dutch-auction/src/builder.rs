//! Client-side construction of auction orders.

use soroban_sdk::{contracttype, vec, Address, Bytes, Env, IntoVal, Symbol, Val, Vec};

use crate::{
    call::AmountGetter,
    error::AuctionError,
    order::{AmountSource, AuctionInteraction, Interaction, Order, PostFill},
    params::{AuctionParameters, Curve},
    predicate::{compose_and, nonce_condition, time_condition},
};

pub const LINEAR_MAKER_AMOUNT: &str = "linear_maker_amount";
pub const LINEAR_TAKER_AMOUNT: &str = "linear_taker_amount";
pub const EXPONENTIAL_MAKER_AMOUNT: &str = "exponential_maker_amount";
pub const EXPONENTIAL_TAKER_AMOUNT: &str = "exponential_taker_amount";

/// The maker's side of an auction order, before pricing is attached.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MakerOrder {
    pub salt: u64,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub maker: Address,
    pub nonce: u64,
    pub allowed_sender: Option<Address>,
}

/// Builds an order whose amounts are priced by the helper at `helper`.
///
/// Proceeds are routed through the helper (it is both the receiver and the
/// interaction target) so the fee can be split off before the maker is paid.
/// The order stays fillable while the maker's nonce is unchanged and the
/// auction has not ended.
pub fn build_auction_order(
    env: &Env,
    helper: &Address,
    order: &MakerOrder,
    auction: &AuctionParameters,
) -> Result<Order, AuctionError> {
    let curve = auction.curve().map_err(|err| match err {
        AuctionError::UnsupportedCurve => AuctionError::UnsupportedPricingFunction,
        other => other,
    })?;
    auction.validate()?;

    let (maker_function, taker_function) = match curve {
        Curve::Linear => (LINEAR_MAKER_AMOUNT, LINEAR_TAKER_AMOUNT),
        Curve::Exponential { .. } => (EXPONENTIAL_MAKER_AMOUNT, EXPONENTIAL_TAKER_AMOUNT),
    };
    let args = bound_args(env, auction, curve);

    let predicate = compose_and(
        env,
        &[
            nonce_condition(env, helper, &order.maker, order.nonce),
            time_condition(env, helper, auction.ended_at),
        ],
    );

    let interaction = AuctionInteraction {
        auction_owner: order.maker.clone(),
        partial_fill_floor: auction.partial_fill_floor(),
        started_at: auction.started_at,
    };

    Ok(Order {
        salt: order.salt,
        maker_asset: order.maker_asset.clone(),
        taker_asset: order.taker_asset.clone(),
        maker: order.maker.clone(),
        receiver: helper.clone(),
        allowed_sender: order.allowed_sender.clone(),
        making_amount: auction.selling_asset_max,
        taking_amount: auction.purchasing_asset_max,
        get_maker_amount: AmountSource::Getter(AmountGetter::new(
            helper,
            Symbol::new(env, maker_function),
            args.clone(),
        )),
        get_taker_amount: AmountSource::Getter(AmountGetter::new(
            helper,
            Symbol::new(env, taker_function),
            args,
        )),
        predicate,
        permit: Bytes::new(env),
        interaction: PostFill::Notify(Interaction {
            target: helper.clone(),
            data: interaction.encode(env),
        }),
    })
}

/// Arguments of the helper's amount functions, in declaration order, minus
/// the trailing requested amount.
fn bound_args(env: &Env, auction: &AuctionParameters, curve: Curve) -> Vec<Val> {
    let mut args: Vec<Val> = vec![
        env,
        auction.selling_asset_max.into_val(env),
        auction.purchasing_asset_max.into_val(env),
        auction.purchasing_asset_min.into_val(env),
        auction.started_at.into_val(env),
        auction.ended_at.into_val(env),
        auction.increasing.into_val(env),
    ];
    if let Curve::Exponential { amplifier } = curve {
        args.push_back(amplifier.into_val(env));
    }
    args
}
