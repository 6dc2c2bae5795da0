//! Parsed transactions and the item API a host drives.
//!
//! The host calls [`Transaction::parse`] and [`Transaction::validate`] once
//! per transaction, then pages through items with
//! [`Transaction::num_items`] and [`Transaction::get_item`]. Validation
//! renders every page of every item in both display modes, so once it
//! succeeds every in-range request succeeds too, whichever mode the device
//! is in when it asks.

use crate::{
    DisplayContext, Item, ParserError, ParserOptions,
    chain::ChainConfig,
    display::{DisplayCache, key_label},
    format::{format_amount, format_token, is_amount_key},
    json::{Document, validate},
    textual::TextualTransaction,
};

/// Wire format of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    /// Canonical JSON sign document.
    Json,
    /// CBOR array of pre-rendered screens.
    Textual,
}

/// A parsed transaction of either format.
#[derive(Debug, Clone)]
pub enum Transaction<'a> {
    /// See [`JsonTransaction`].
    Json(JsonTransaction<'a>),
    /// See [`TextualTransaction`].
    Textual(TextualTransaction<'a>),
}

impl<'a> Transaction<'a> {
    /// Parses `buffer` as `kind`.
    ///
    /// # Errors
    ///
    /// The tokenizer errors for JSON, the CBOR and screen errors for textual
    /// transactions.
    pub fn parse(kind: TxKind, buffer: &'a [u8], options: &ParserOptions) -> Result<Self, ParserError> {
        match kind {
            TxKind::Json => JsonTransaction::parse(buffer, options).map(Self::Json),
            TxKind::Textual => TextualTransaction::parse(buffer, options).map(Self::Textual),
        }
    }

    /// Format of this transaction.
    #[must_use]
    pub fn kind(&self) -> TxKind {
        match self {
            Self::Json(_) => TxKind::Json,
            Self::Textual(_) => TxKind::Textual,
        }
    }

    /// Checks the transaction and renders every item once per display mode.
    ///
    /// # Errors
    ///
    /// The first failure found.
    pub fn validate(&mut self, ctx: &DisplayContext<'_>) -> Result<(), ParserError> {
        let result = match self {
            Self::Json(tx) => tx.validate(ctx),
            Self::Textual(tx) => tx.validate(ctx),
        };
        if let Err(error) = result {
            tracing::debug!(%error, kind = ?self.kind(), "transaction rejected");
        }
        result
    }

    /// Number of items to display.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] before a successful [`Self::validate`].
    pub fn num_items(&self, ctx: &DisplayContext<'_>) -> Result<usize, ParserError> {
        match self {
            Self::Json(tx) => tx.num_items(),
            Self::Textual(tx) => tx.num_items(ctx),
        }
    }

    /// Page `page` of item `idx`.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] before a successful [`Self::validate`],
    /// [`ParserError::DisplayIdxOutOfRange`] and
    /// [`ParserError::DisplayPageOutOfRange`].
    pub fn get_item(&self, ctx: &DisplayContext<'_>, idx: usize, page: usize) -> Result<Item, ParserError> {
        match self {
            Self::Json(tx) => tx.get_item(ctx, idx, page),
            Self::Textual(tx) => tx.get_item(ctx, idx, page),
        }
    }
}

/// Renders every page of items `0..count`.
pub(crate) fn render_all(
    count: usize,
    mut render: impl FnMut(usize, usize) -> Result<Item, ParserError>,
) -> Result<(), ParserError> {
    for idx in 0..count {
        let pages = render(idx, 0)?.page_count();
        for page in 1..pages {
            render(idx, page)?;
        }
    }
    Ok(())
}

/// A tokenized JSON transaction.
#[derive(Debug, Clone)]
pub struct JsonTransaction<'a> {
    doc: Document<'a>,
    cache: Option<DisplayCache>,
}

impl<'a> JsonTransaction<'a> {
    /// Tokenizes `buffer`.
    ///
    /// # Errors
    ///
    /// See [`Document::parse`].
    pub fn parse(buffer: &'a [u8], options: &ParserOptions) -> Result<Self, ParserError> {
        Ok(Self {
            doc: Document::parse(buffer, options)?,
            cache: None,
        })
    }

    /// The token table.
    #[must_use]
    pub fn document(&self) -> &Document<'a> {
        &self.doc
    }

    /// Checks canonical form, builds the display cache and renders every
    /// item once in each display mode.
    ///
    /// # Errors
    ///
    /// Canonical form errors first, then any rendering error.
    pub fn validate(&mut self, ctx: &DisplayContext<'_>) -> Result<(), ParserError> {
        self.cache = None;
        validate::validate(&self.doc)?;
        let cache = DisplayCache::build(&self.doc)?;
        for expert_mode in [false, true] {
            let ctx = ctx.expert(expert_mode);
            render_all(cache.num_items(), |idx, page| render_item(&self.doc, &cache, &ctx, idx, page))?;
        }
        self.cache = Some(cache);
        Ok(())
    }

    /// Number of items.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] before a successful [`Self::validate`].
    pub fn num_items(&self) -> Result<usize, ParserError> {
        self.cache
            .as_ref()
            .map(DisplayCache::num_items)
            .ok_or(ParserError::NoData)
    }

    /// Page `page` of item `idx`.
    ///
    /// # Errors
    ///
    /// As [`Transaction::get_item`].
    pub fn get_item(&self, ctx: &DisplayContext<'_>, idx: usize, page: usize) -> Result<Item, ParserError> {
        let cache = self.cache.as_ref().ok_or(ParserError::NoData)?;
        render_item(&self.doc, cache, ctx, idx, page)
    }
}

fn render_item(
    doc: &Document<'_>,
    cache: &DisplayCache,
    ctx: &DisplayContext<'_>,
    idx: usize,
    page: usize,
) -> Result<Item, ParserError> {
    let (key, token) = cache.query(doc, idx)?;
    let width = ctx.options.width();

    let mut item = Item::default();
    item.push_key(key_label(key.as_bytes()).map_or(key.as_bytes(), str::as_bytes))?;

    let pages = if is_amount_key(key.as_bytes()) {
        let chain = if ctx.options.expert_mode {
            None
        } else {
            chain_config(doc, ctx)
        };
        format_amount(doc, token, chain, width, page, item.value_mut())?
    } else {
        format_token(doc, token, width, page, item.value_mut())?
    };
    item.set_page_count(pages);
    Ok(item)
}

fn chain_config<'c>(doc: &Document<'_>, ctx: &DisplayContext<'c>) -> Option<&'c ChainConfig> {
    let chain_id = doc.object_get_value(0, b"chain_id").ok()?;
    ctx.chains.lookup(doc.token_bytes(chain_id).ok()?)
}

#[cfg(test)]
mod test {
    use super::*;

    const TX: &[u8] = br#"{"account_number":"0","chain_id":"test-chain-1","fee":{"amount":[{"amount":"5","denom":"photon"}],"gas":"10000"},"memo":"testmemo","msgs":[{"type":"cosmos-sdk/MsgSend","value":{"amount":[{"amount":"10","denom":"photon"}],"from_address":"cosmos1a","to_address":"cosmos1b"}}],"sequence":"1"}"#;

    #[test]
    fn items_need_validation() {
        let ctx = DisplayContext::default();
        let mut tx = Transaction::parse(TxKind::Json, TX, &ParserOptions::default()).unwrap();
        assert_eq!(tx.num_items(&ctx), Err(ParserError::NoData));
        assert_eq!(tx.get_item(&ctx, 0, 0), Err(ParserError::NoData));

        tx.validate(&ctx).unwrap();
        assert_eq!(tx.num_items(&ctx), Ok(10));
        assert_eq!(tx.get_item(&ctx, 10, 0), Err(ParserError::DisplayIdxOutOfRange));
    }

    #[test]
    fn failed_validation_clears_items() {
        let ctx = DisplayContext::default();
        let bad = br#"{"account_number":"0","chain_id":"c","fee":{"amount":"5uatom","gas":"1"},"memo":"","msgs":[],"sequence":"1"}"#;
        let mut tx = Transaction::parse(TxKind::Json, bad, &ParserOptions::default()).unwrap();
        assert_eq!(tx.validate(&ctx), Err(ParserError::UnexpectedType));
        assert_eq!(tx.num_items(&ctx), Err(ParserError::NoData));
    }

    #[test]
    fn conversion_failure_rejected_in_either_mode() {
        let tx = br#"{"account_number":"0","chain_id":"cosmoshub-4","fee":{"amount":[{"amount":"1.5","denom":"uatom"}],"gas":"1"},"memo":"","msgs":[],"sequence":"1"}"#;
        for expert_mode in [false, true] {
            let ctx = DisplayContext::default().expert(expert_mode);
            let mut parsed = Transaction::parse(TxKind::Json, tx, &ParserOptions::default()).unwrap();
            assert_eq!(parsed.validate(&ctx), Err(ParserError::UnexpectedValue));
            assert_eq!(parsed.num_items(&ctx), Err(ParserError::NoData));
        }
    }

    #[test]
    fn kind_dispatch() {
        let tx = Transaction::parse(TxKind::Json, TX, &ParserOptions::default()).unwrap();
        assert_eq!(tx.kind(), TxKind::Json);
        assert_eq!(
            Transaction::parse(TxKind::Textual, TX, &ParserOptions::default()).unwrap_err(),
            ParserError::CborUnexpectedEof
        );
    }
}
