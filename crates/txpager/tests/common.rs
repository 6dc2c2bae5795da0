#![allow(missing_docs)]
#![allow(dead_code)]

use core::fmt::Write;

use txpager::{DisplayContext, ParserError, ParserOptions, Transaction, TxKind};

/// Two reward withdrawals on the default chain.
pub const WITHDRAW_TX: &str = r#"{"account_number":"108","chain_id":"cosmoshub-4","fee":{"amount":[{"amount":"600","denom":"uatom"}],"gas":"200000"},"memo":"","msgs":[{"type":"cosmos-sdk/MsgWithdrawDelegationReward","value":{"delegator_address":"cosmos1w34k53py5v5xyluazqpq65agyajavep2rflq6h","validator_address":"cosmosvaloper1kn3wugetjuy4zetlq6wadchfhvu3x740ae6z6x"}},{"type":"cosmos-sdk/MsgWithdrawDelegationReward","value":{"delegator_address":"cosmos1w34k53py5v5xyluazqpq65agyajavep2rflq6h","validator_address":"cosmosvaloper1sjllsnramtg3ewxqwwrwjxfgc4n4ef9u2lcnj0"}}],"sequence":"106"}"#;

/// A multi-coin send on a test chain.
pub const MULTI_COIN_TX: &str = r#"{"account_number":"0","chain_id":"test-chain-1","fee":{"amount":[{"amount":"5","denom":"photon"}],"gas":"10000"},"memo":"testmemo","msgs":[{"type":"cosmos-sdk/MsgSend","value":{"amount":[{"amount":"1000","denom":"photon"},{"amount":"250000000000000000000000","denom":"ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"}],"from_address":"cosmos1from","to_address":"cosmos1to"}}],"sequence":"1"}"#;

/// A textual sign document: a bank send on `my-chain`, six expert screens.
pub const TEXTUAL_SEND_HEX: &str = "92a20168436861696e20696402686d792d636861696ea2016e4163636f756e74206e756d626572026131a2016853657175656e6365026132a301674164647265737302782d636f736d6f7331756c6176336873656e7570737771666b77327933737570356b677471776e767161386579687304f5a3016a5075626c6963206b657902781f2f636f736d6f732e63727970746f2e736563703235366b312e5075624b657904f5a3026d5075624b6579206f626a656374030104f5a401634b657902785230324542204444374620453446442045423736204443384120323035452046363544203739304320443330452038413337203541354320323532382045423341203932334120463146422034443739203444030204f5a102781e54686973207472616e73616374696f6e206861732031204d657373616765a3016d4d6573736167652028312f312902781c2f636f736d6f732e62616e6b2e763162657461312e4d736753656e640301a2026e4d736753656e64206f626a6563740302a3016c46726f6d206164647265737302782d636f736d6f7331756c6176336873656e7570737771666b77327933737570356b677471776e76716138657968730303a3016a546f206164647265737302782d636f736d6f7331656a726634637572327779366b667572673966326a707070326833616665356836706b6835740303a30166416d6f756e74026731302041544f4d0303a1026e456e64206f66204d657373616765a201644d656d6f0278193e20e29a9befb88f5c7532363942e29a9befb88f2020202020a2016446656573026a302e3030322041544f4da30169476173206c696d697402673130302730303004f5a3017148617368206f66207261772062797465730278403963303433323930313039633237306232666661396633633066613535613039306330313235656265663838316637646135333937386462663933663733383504f5";

pub fn hex(text: &str) -> Vec<u8> {
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).unwrap())
        .collect()
}

pub fn context(expert_mode: bool) -> DisplayContext<'static> {
    DisplayContext::default().expert(expert_mode)
}

/// Parses, validates and lists every page of every item, one line per page.
pub fn listing(kind: TxKind, bytes: &[u8], ctx: &DisplayContext<'_>) -> Result<String, ParserError> {
    let mut tx = Transaction::parse(kind, bytes, &ParserOptions::default())?;
    tx.validate(ctx)?;

    let mut out = String::new();
    for idx in 0..tx.num_items(ctx)? {
        let count = tx.get_item(ctx, idx, 0)?.page_count();
        for page in 0..count {
            let item = tx.get_item(ctx, idx, page)?;
            writeln!(out, "{idx} [{}/{count}] {}: \"{}\"", page + 1, item.key(), item.value()).unwrap();
        }
    }
    Ok(out)
}
