//! Transaction review for signing devices with small screens.
//!
//! A host streams a transaction into a [`TxBuffer`], parses it as canonical
//! JSON or as a CBOR array of pre-rendered screens, validates it, and then
//! pages through `(key, value)` items sized for the device display:
//!
//! ```rust
//! use txpager::{DisplayContext, ParserOptions, Transaction, TxKind};
//!
//! let json = br#"{"account_number":"7","chain_id":"cosmoshub-4","fee":{"amount":[{"amount":"600","denom":"uatom"}],"gas":"200000"},"memo":"","msgs":[{"type":"cosmos-sdk/MsgSend","value":{"amount":[{"amount":"1500000","denom":"uatom"}],"from_address":"cosmos1sender","to_address":"cosmos1receiver"}}],"sequence":"3"}"#;
//! let ctx = DisplayContext::default();
//!
//! let mut tx = Transaction::parse(TxKind::Json, json, &ParserOptions::default())?;
//! tx.validate(&ctx)?;
//!
//! let fee = tx.get_item(&ctx, 3, 0)?;
//! assert_eq!(fee.key(), "Fee");
//! assert_eq!(fee.value(), "0.0006 ATOM");
//!
//! let amount = tx.get_item(&ctx, 6, 0)?;
//! assert_eq!(amount.value(), "1.5 ATOM");
//! # Ok::<(), txpager::ParserError>(())
//! ```
//!
//! Nothing allocates: tokens, keys and pages live in fixed-capacity buffers
//! and overflowing one is reported as [`ParserError::BufferOverflow`].

#![no_std]

#[cfg(test)]
extern crate std;

mod buffer;
pub mod chain;
pub mod display;
mod error;
pub mod format;
mod item;
pub mod json;
mod options;
mod path;
pub mod query;
pub mod textual;
mod transaction;

#[cfg(test)]
mod tests;

pub use buffer::TxBuffer;
pub use chain::{ChainConfig, ChainRegistry};
pub use error::ParserError;
pub use item::Item;
pub use options::{DisplayContext, DisplayOptions, MAX_PAGE_WIDTH, ParserOptions};
pub use path::{KEY_CAPACITY, PathKey};
pub use transaction::{JsonTransaction, Transaction, TxKind};
pub use textual::TextualTransaction;
