#![expect(missing_docs)]
#![expect(clippy::needless_raw_string_hashes)]

mod common;

use common::{MULTI_COIN_TX, WITHDRAW_TX, context, listing};
use txpager::{
    ChainConfig, DisplayContext, DisplayOptions, ParserError, ParserOptions, Transaction, TxKind,
    chain::COSMOS_HUB,
};

#[test]
fn snapshot_withdraw_rewards() {
    insta::assert_snapshot!(listing(TxKind::Json, WITHDRAW_TX.as_bytes(), &context(false)).unwrap(), @r#"
    0 [1/1] Chain ID: "cosmoshub-4"
    1 [1/1] Account: "108"
    2 [1/1] Sequence: "106"
    3 [1/1] Fee: "0.0006 ATOM"
    4 [1/1] Gas: "200000"
    5 [1/1] Type: "Withdraw Reward"
    6 [1/2] Delegator: "cosmos1w34k53py5v5xyluazqpq65agyajavep2r"
    6 [2/2] Delegator: "flq6h"
    7 [1/2] Validator: "cosmosvaloper1kn3wugetjuy4zetlq6wadchfhv"
    7 [2/2] Validator: "u3x740ae6z6x"
    8 [1/2] Delegator: "cosmos1w34k53py5v5xyluazqpq65agyajavep2r"
    8 [2/2] Delegator: "flq6h"
    9 [1/2] Validator: "cosmosvaloper1sjllsnramtg3ewxqwwrwjxfgc4"
    9 [2/2] Validator: "n4ef9u2lcnj0"
    "#);
}

#[test]
fn snapshot_withdraw_rewards_expert() {
    let listing = listing(TxKind::Json, WITHDRAW_TX.as_bytes(), &context(true)).unwrap();
    let fee = listing.lines().nth(3).unwrap();
    insta::assert_snapshot!(fee, @r#"3 [1/1] Fee: "600 uatom""#);
}

#[test]
fn snapshot_multi_coin_send() {
    insta::assert_snapshot!(listing(TxKind::Json, MULTI_COIN_TX.as_bytes(), &context(false)).unwrap(), @r#"
    0 [1/1] Chain ID: "test-chain-1"
    1 [1/1] Account: "0"
    2 [1/1] Sequence: "1"
    3 [1/1] Fee: "5 photon"
    4 [1/1] Gas: "10000"
    5 [1/1] Memo: "testmemo"
    6 [1/1] Type: "Send"
    7 [1/4] Amount: "1000 photon"
    7 [2/4] Amount: "250000000000000000000000 ibc/27394FB092D"
    7 [3/4] Amount: "2ECCD56123C74F36E4C1F926001CEADA9CA97EA6"
    7 [4/4] Amount: "22B25F41E5EB2"
    8 [1/1] From: "cosmos1from"
    9 [1/1] To: "cosmos1to"
    "#);
}

#[test]
fn narrow_pages() {
    let ctx = DisplayContext::new(DisplayOptions {
        expert_mode: false,
        page_width: 16,
    });
    let mut tx = Transaction::parse(TxKind::Json, WITHDRAW_TX.as_bytes(), &ParserOptions::default()).unwrap();
    tx.validate(&ctx).unwrap();

    let delegator = tx.get_item(&ctx, 6, 2).unwrap();
    assert_eq!(delegator.page_count(), 3);
    assert_eq!(delegator.value(), "ajavep2rflq6h");
    assert_eq!(tx.get_item(&ctx, 6, 3), Err(ParserError::DisplayPageOutOfRange));
}

#[test]
fn custom_chain_registry() {
    let chains = [
        COSMOS_HUB,
        ChainConfig {
            chain_id: "test-chain-1",
            base_denom: "photon",
            display_denom: "PHOTON",
            decimals: 2,
            min_decimals: 0,
        },
    ];
    let ctx = DisplayContext::with_chains(DisplayOptions::default(), &chains);
    let listing = listing(TxKind::Json, MULTI_COIN_TX.as_bytes(), &ctx).unwrap();
    let lines: Vec<_> = listing.lines().collect();
    assert_eq!(lines[3], r#"3 [1/1] Fee: "0.05 PHOTON""#);
    assert_eq!(lines[7], r#"7 [1/4] Amount: "10 PHOTON""#);
}

#[test]
fn flat_document_through_query_engine() {
    // a flat object is still walkable, even though it is no transaction
    let doc = txpager::json::Document::parse(
        br#"{"keyA":"123456", "keyB":"abcdefg", "keyC":""}"#,
        &ParserOptions::default(),
    )
    .unwrap();
    assert_eq!(txpager::query::count_leaves(&doc, 0, 4), Ok(3));

    let mut query = txpager::query::Query::new(1, 4);
    let token = query.find(&doc, 0).unwrap();
    assert_eq!(query.key().as_bstr(), "keyB");

    let mut page = txpager::format::Page::new();
    assert_eq!(txpager::format::format_token(&doc, token, 40, 0, &mut page), Ok(1));
    assert_eq!(&page[..], b"abcdefg");
    assert_eq!(
        txpager::format::format_token(&doc, token, 40, 1, &mut page),
        Err(ParserError::DisplayPageOutOfRange)
    );
}
