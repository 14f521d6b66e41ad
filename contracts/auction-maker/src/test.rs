#![cfg(test)]
extern crate std;

use super::*;
use dutch_auction::params::LINEAR;
use dutch_auction_helper::{DutchAuctionHelper, DutchAuctionHelperClient};
use soroban_sdk::{
    auth::ContractContext,
    testutils::{Address as _, Ledger},
    token, Address, BytesN, Env,
};

const ASSET_MAX: i128 = 1_000_000_000_000_000_000;
const CASH_MAX: i128 = 3_000_000_000;
const CASH_MIN: i128 = 1_500_000_000;
const HOUR_1: u64 = 3600;
const NOW: u64 = 1_700_000_000;

struct Setup<'a> {
    env: Env,
    maker: AuctionMakerClient<'a>,
    helper: DutchAuctionHelperClient<'a>,
    engine: Address,
    weth: token::Client<'a>,
    usdc: token::Client<'a>,
}

fn create_token_contract<'a>(
    e: &Env,
    admin: &Address,
) -> (token::Client<'a>, token::StellarAssetClient<'a>) {
    let sac = e.register_stellar_asset_contract_v2(admin.clone());
    (
        token::Client::new(e, &sac.address()),
        token::StellarAssetClient::new(e, &sac.address()),
    )
}

fn setup<'a>(funded: bool) -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| {
        li.timestamp = NOW;
    });

    let engine = Address::generate(&env);
    let helper = DutchAuctionHelperClient::new(
        &env,
        &env.register(
            DutchAuctionHelper,
            (engine.clone(), Address::generate(&env), 1_000u32),
        ),
    );
    let owner = Address::generate(&env);
    let maker = AuctionMakerClient::new(
        &env,
        &env.register(
            AuctionMaker,
            (owner, helper.address.clone(), engine.clone()),
        ),
    );

    let token_admin = Address::generate(&env);
    let (weth, weth_admin) = create_token_contract(&env, &token_admin);
    let (usdc, _) = create_token_contract(&env, &token_admin);
    if funded {
        weth_admin.mint(&maker.address, &ASSET_MAX);
    }

    Setup {
        env,
        maker,
        helper,
        engine,
        weth,
        usdc,
    }
}

fn terms(s: &Setup) -> AuctionTerms {
    AuctionTerms {
        selling_asset: s.weth.address.clone(),
        purchasing_asset: s.usdc.address.clone(),
        selling_amount: ASSET_MAX,
        pricing_function: LINEAR,
        amplifier: 0,
        increasing: false,
        partial_fill: true,
        min_purchasing_amount: CASH_MIN,
        max_purchasing_amount: CASH_MAX,
        started_at: NOW - HOUR_1 / 2,
        ended_at: NOW + HOUR_1 / 2,
        salt: 1337,
    }
}

fn fill_context(s: &Setup, order: &Order) -> Context {
    Context::Contract(ContractContext {
        contract: s.engine.clone(),
        fn_name: Symbol::new(&s.env, "fill_order"),
        args: vec![
            &s.env,
            order.clone().into_val(&s.env),
            Address::generate(&s.env).into_val(&s.env),
            ASSET_MAX.into_val(&s.env),
            0i128.into_val(&s.env),
            CASH_MAX.into_val(&s.env),
        ],
    })
}

fn transfer_context(s: &Setup, asset: &Address, from: &Address, amount: i128) -> Context {
    Context::Contract(ContractContext {
        contract: asset.clone(),
        fn_name: Symbol::new(&s.env, "transfer"),
        args: vec![
            &s.env,
            from.into_val(&s.env),
            Address::generate(&s.env).into_val(&s.env),
            amount.into_val(&s.env),
        ],
    })
}

fn check_auth(
    s: &Setup,
    contexts: Vec<Context>,
) -> Result<(), Result<MakerError, soroban_sdk::InvokeError>> {
    s.env.try_invoke_contract_check_auth::<MakerError>(
        &s.maker.address,
        &BytesN::from_array(&s.env, &[0; 32]),
        ().into_val(&s.env),
        &contexts,
    )
}

#[test]
fn test_start_auction_records_order() {
    let s = setup(true);
    let terms = terms(&s);

    let order = s.maker.start_auction(&terms);

    assert_eq!(order.maker, s.maker.address);
    assert_eq!(order.receiver, s.helper.address);
    assert_eq!(order.maker_asset, s.weth.address);
    assert_eq!(order.taker_asset, s.usdc.address);
    assert_eq!(order.making_amount, ASSET_MAX);
    assert_eq!(order.taking_amount, CASH_MAX);
    assert_eq!(s.maker.auction(&order.hash(&s.env)), terms);

    // The order is built against the maker's current nonce on the helper
    assert!(order.predicate.evaluate(&s.env));
}

#[test]
fn test_start_auction_checks_terms() {
    let s = setup(false);
    assert_eq!(
        s.maker.try_start_auction(&terms(&s)),
        Err(Ok(MakerError::InsufficientBalance))
    );

    let s = setup(true);
    let mut bad = terms(&s);
    bad.pricing_function = 7;
    assert_eq!(
        s.maker.try_start_auction(&bad),
        Err(Ok(MakerError::InvalidAuction))
    );

    let mut bad = terms(&s);
    bad.ended_at = bad.started_at;
    assert_eq!(
        s.maker.try_start_auction(&bad),
        Err(Ok(MakerError::InvalidAuction))
    );
}

#[test]
fn test_check_auth_approves_fill_of_started_auction() {
    let s = setup(true);
    let order = s.maker.start_auction(&terms(&s));

    let contexts = vec![
        &s.env,
        fill_context(&s, &order),
        transfer_context(&s, &s.weth.address, &s.maker.address, ASSET_MAX),
    ];
    assert_eq!(check_auth(&s, contexts), Ok(()));

    let partial = vec![
        &s.env,
        fill_context(&s, &order),
        transfer_context(&s, &s.weth.address, &s.maker.address, ASSET_MAX / 2),
    ];
    assert_eq!(check_auth(&s, partial), Ok(()));
}

#[test]
fn test_check_auth_refuses_everything_else() {
    let s = setup(true);
    let order = s.maker.start_auction(&terms(&s));

    // An order the contract never started
    let mut unknown = order.clone();
    unknown.salt += 1;
    assert_eq!(
        check_auth(&s, vec![&s.env, fill_context(&s, &unknown)]),
        Err(Ok(MakerError::UnknownAuction))
    );

    // A transfer outside of any fill
    assert_eq!(
        check_auth(
            &s,
            vec![
                &s.env,
                transfer_context(&s, &s.weth.address, &s.maker.address, ASSET_MAX)
            ]
        ),
        Err(Ok(MakerError::UnauthorizedContext))
    );

    // The proceeds asset, or more than the lot
    for (asset, amount) in [
        (s.usdc.address.clone(), 1),
        (s.weth.address.clone(), ASSET_MAX + 1),
    ] {
        let contexts = vec![
            &s.env,
            fill_context(&s, &order),
            transfer_context(&s, &asset, &s.maker.address, amount),
        ];
        assert_eq!(
            check_auth(&s, contexts),
            Err(Ok(MakerError::UnauthorizedContext))
        );
    }

    // Any other call on the engine
    let cancel = Context::Contract(ContractContext {
        contract: s.engine.clone(),
        fn_name: Symbol::new(&s.env, "cancel_order"),
        args: vec![&s.env, order.clone().into_val(&s.env)],
    });
    assert_eq!(
        check_auth(&s, vec![&s.env, cancel]),
        Err(Ok(MakerError::UnauthorizedContext))
    );
}

#[test]
fn test_cancel_auction() {
    let s = setup(true);
    let order = s.maker.start_auction(&terms(&s));
    let order_hash = order.hash(&s.env);

    s.maker.cancel_auction(&order_hash);

    assert_eq!(
        s.maker.try_auction(&order_hash),
        Err(Ok(MakerError::UnknownAuction))
    );
    assert_eq!(
        check_auth(&s, vec![&s.env, fill_context(&s, &order)]),
        Err(Ok(MakerError::UnknownAuction))
    );
    assert_eq!(
        s.maker.try_cancel_auction(&order_hash),
        Err(Ok(MakerError::UnknownAuction))
    );
}

#[test]
fn test_cancel_all_invalidates_orders() {
    let s = setup(true);
    let order = s.maker.start_auction(&terms(&s));
    assert!(order.predicate.evaluate(&s.env));

    assert_eq!(s.maker.cancel_all(), 1);
    assert_eq!(s.helper.nonce(&s.maker.address), 1);
    assert!(!order.predicate.evaluate(&s.env));

    // New auctions pick up the new nonce
    let mut next = terms(&s);
    next.salt += 1;
    let order = s.maker.start_auction(&next);
    assert!(order.predicate.evaluate(&s.env));
}

#[test]
fn test_withdraw() {
    let s = setup(true);
    let to = Address::generate(&s.env);

    s.maker.withdraw(&s.weth.address, &to, &(ASSET_MAX / 4));

    assert_eq!(s.weth.balance(&to), ASSET_MAX / 4);
    assert_eq!(s.weth.balance(&s.maker.address), ASSET_MAX - ASSET_MAX / 4);
}
