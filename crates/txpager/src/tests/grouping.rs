use std::{string::String, vec::Vec};

use crate::{DisplayContext, ParserOptions, Transaction, TxKind};

fn delegation(validator: &str) -> String {
    std::format!(
        r#"{{"type":"cosmos-sdk/MsgDelegate","value":{{"amount":{{"amount":"1000000","denom":"uatom"}},"delegator_address":"cosmos1delegator","validator_address":"{validator}"}}}}"#
    )
}

fn tx(msgs: &[String]) -> String {
    std::format!(
        r#"{{"account_number":"8","chain_id":"cosmoshub-4","fee":{{"amount":[{{"amount":"5000","denom":"uatom"}}],"gas":"800000"}},"memo":"","msgs":[{}],"sequence":"2"}}"#,
        msgs.join(",")
    )
}

fn keys(json: &str) -> Vec<String> {
    let ctx = DisplayContext::default();
    let mut tx = Transaction::parse(TxKind::Json, json.as_bytes(), &ParserOptions::default()).unwrap();
    tx.validate(&ctx).unwrap();
    (0..tx.num_items(&ctx).unwrap())
        .map(|i| std::format!("{}", tx.get_item(&ctx, i, 0).unwrap().key()))
        .collect()
}

#[test]
fn eight_identical_messages_show_one_type() {
    let msgs: Vec<String> = (0..8).map(|i| delegation(&std::format!("cosmosvaloper{i}"))).collect();
    let keys = keys(&tx(&msgs));

    assert_eq!(keys.iter().filter(|k| *k == "Type").count(), 1);
    assert_eq!(keys.iter().filter(|k| *k == "Validator").count(), 8);
    // chain, account, sequence, fee, gas, one type, three fields per message
    assert_eq!(keys.len(), 5 + 1 + 8 * 3);
    assert_eq!(keys[5], "Type");
}

#[test]
fn mixed_messages_show_every_type() {
    let undelegate = delegation("cosmosvaloper1").replace("MsgDelegate", "MsgUndelegate");
    let msgs = [delegation("cosmosvaloper0"), undelegate, delegation("cosmosvaloper2")];
    let keys = keys(&tx(&msgs));
    assert_eq!(keys.iter().filter(|k| *k == "Type").count(), 3);
    assert_eq!(keys.len(), 5 + 3 * 4);
}

#[test]
fn grouped_type_keeps_its_value() {
    let msgs: Vec<String> = (0..3).map(|i| delegation(&std::format!("v{i}"))).collect();
    let json = tx(&msgs);
    let ctx = DisplayContext::default();
    let mut tx = Transaction::parse(TxKind::Json, json.as_bytes(), &ParserOptions::default()).unwrap();
    tx.validate(&ctx).unwrap();

    let item = tx.get_item(&ctx, 5, 0).unwrap();
    assert_eq!((item.key(), item.value()), ("Type".into(), "Delegate".into()));
    let amount = tx.get_item(&ctx, 6, 0).unwrap();
    assert_eq!(amount.value(), "1.0 ATOM");
    let last = tx.get_item(&ctx, 5 + 1 + 3 * 3 - 1, 0).unwrap();
    assert_eq!((last.key(), last.value()), ("Validator".into(), "v2".into()));
}
