#![no_main]
//! Drives parse, validate and the item API with arbitrary inputs.
//!
//! Invariant under test: once validation succeeds, every in-range
//! `(idx, page)` renders, and the first out-of-range index or page is
//! reported with the matching error.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value, json};
use txpager::{DisplayContext, DisplayOptions, ParserError, ParserOptions, Transaction, TxKind};

#[derive(Debug, Arbitrary)]
struct Coin {
    amount: u64,
    denom: bool,
}

#[derive(Debug, Arbitrary)]
struct Msg {
    kind: u8,
    address: String,
    coins: Vec<Coin>,
}

/// Close enough to a sign document that most inputs reach the display code.
#[derive(Debug, Arbitrary)]
struct SignDoc {
    chain_id: u8,
    account_number: u32,
    sequence: u32,
    memo: String,
    fee: Vec<Coin>,
    msgs: Vec<Msg>,
}

#[derive(Debug, Arbitrary)]
enum Payload {
    Raw(Vec<u8>),
    Structured(SignDoc),
}

#[derive(Debug, Arbitrary)]
struct Input {
    textual: bool,
    expert_mode: bool,
    page_width: u8,
    max_tokens: u16,
    payload: Payload,
}

const CHAINS: [&str; 3] = ["cosmoshub-4", "test-chain-1", "0"];
const TYPES: [&str; 3] = [
    "cosmos-sdk/MsgSend",
    "cosmos-sdk/MsgDelegate",
    "cosmos-sdk/MsgWithdrawDelegationReward",
];

fn coins(coins: &[Coin]) -> Value {
    Value::Array(
        coins
            .iter()
            .map(|c| json!({"amount": c.amount.to_string(), "denom": if c.denom { "uatom" } else { "photon" }}))
            .collect(),
    )
}

fn render(doc: &SignDoc) -> Vec<u8> {
    let msgs = doc
        .msgs
        .iter()
        .map(|m| {
            let mut value = Map::new();
            value.insert("amount".into(), coins(&m.coins));
            value.insert("from_address".into(), Value::String(m.address.clone()));
            json!({"type": TYPES[usize::from(m.kind) % TYPES.len()], "value": value})
        })
        .collect();
    // serde_json's default map is sorted and its compact writer emits no
    // whitespace, which is what the canonical checks expect.
    let root = json!({
        "account_number": doc.account_number.to_string(),
        "chain_id": CHAINS[usize::from(doc.chain_id) % CHAINS.len()],
        "fee": {"amount": coins(&doc.fee), "gas": "200000"},
        "memo": doc.memo,
        "msgs": Value::Array(msgs),
        "sequence": doc.sequence.to_string(),
    });
    serde_json::to_vec(&root).unwrap()
}

fuzz_target!(|input: Input| {
    let bytes = match &input.payload {
        Payload::Raw(bytes) => bytes.clone(),
        Payload::Structured(doc) => render(doc),
    };
    let kind = if input.textual { TxKind::Textual } else { TxKind::Json };
    let options = ParserOptions {
        max_tokens: usize::from(input.max_tokens),
        ..ParserOptions::default()
    };
    let ctx = DisplayContext::new(DisplayOptions {
        expert_mode: input.expert_mode,
        page_width: usize::from(input.page_width),
    });

    let Ok(mut tx) = Transaction::parse(kind, &bytes, &options) else {
        return;
    };
    assert_eq!(tx.num_items(&ctx), Err(ParserError::NoData));
    if tx.validate(&ctx).is_err() {
        assert_eq!(tx.num_items(&ctx), Err(ParserError::NoData));
        return;
    }

    let count = tx.num_items(&ctx).unwrap();
    for idx in 0..count {
        let first = tx.get_item(&ctx, idx, 0).unwrap();
        let pages = first.page_count();
        assert!(pages >= 1);
        for page in 0..pages {
            let item = tx.get_item(&ctx, idx, page).unwrap();
            assert_eq!(item.page_count(), pages);
            assert_eq!(item.key(), first.key());
        }
        assert_eq!(
            tx.get_item(&ctx, idx, pages).map(|_| ()),
            Err(ParserError::DisplayPageOutOfRange)
        );
    }
    assert_eq!(
        tx.get_item(&ctx, count, 0).map(|_| ()),
        Err(ParserError::DisplayIdxOutOfRange)
    );
});
