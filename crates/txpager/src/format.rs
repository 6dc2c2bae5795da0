//! Rendering of JSON values into fixed-width pages.
//!
//! Every value is rendered in full into a bounded scratch buffer and then cut
//! into pages of `page_width` bytes. A value of `len` bytes has
//! `max(1, ceil(len / width))` pages, so an empty value still shows one empty
//! page.

use arrayvec::ArrayVec;

use crate::{
    ParserError,
    chain::ChainConfig,
    json::{Document, TokenKind},
    options::MAX_PAGE_WIDTH,
};

/// One rendered page of a value.
pub type Page = ArrayVec<u8, MAX_PAGE_WIDTH>;

/// Capacity of one rendered coin, `amount denom`.
pub const COIN_TEXT_CAPACITY: usize = 256;

/// Longest accepted coin amount.
pub const MAX_AMOUNT_LEN: usize = 64;
/// Longest accepted coin denomination.
pub const MAX_DENOM_LEN: usize = 128;

type CoinText = ArrayVec<u8, COIN_TEXT_CAPACITY>;

const EMPTY: &[u8] = b"Empty";

/// Keys whose values are coins or coin lists.
pub const AMOUNT_KEYS: [&str; 7] = [
    "fee/amount",
    "msgs/inputs/coins",
    "msgs/outputs/coins",
    "msgs/value/inputs/coins",
    "msgs/value/outputs/coins",
    "msgs/value/amount",
    "tip/amount",
];

const VALUE_LABELS: [(&str, &str); 11] = [
    ("cosmos-sdk/MsgSend", "Send"),
    ("cosmos-sdk/MsgDelegate", "Delegate"),
    ("cosmos-sdk/MsgUndelegate", "Undelegate"),
    ("cosmos-sdk/MsgBeginRedelegate", "Redelegate"),
    ("cosmos-sdk/MsgSubmitProposal", "Propose"),
    ("cosmos-sdk/MsgDeposit", "Deposit"),
    ("cosmos-sdk/MsgVote", "Vote"),
    ("cosmos-sdk/MsgWithdrawDelegationReward", "Withdraw Reward"),
    ("cosmos-sdk/MsgWithdrawValidatorCommission", "Withdraw Val. Commission"),
    ("cosmos-sdk/MsgSetWithdrawAddress", "Withdraw Set Address"),
    ("cosmos-sdk/MsgMultiSend", "Multi Send"),
];

/// Number of pages a value of `len` bytes occupies.
#[must_use]
pub fn page_count(len: usize, width: usize) -> usize {
    len.div_ceil(width.max(1)).max(1)
}

/// Writes page `page` of `text` into `out`, returning the page count.
///
/// # Errors
///
/// [`ParserError::DisplayPageOutOfRange`] if `page` is past the last page.
pub fn write_page(text: &[u8], width: usize, page: usize, out: &mut Page) -> Result<usize, ParserError> {
    let width = width.clamp(1, MAX_PAGE_WIDTH);
    let pages = page_count(text.len(), width);
    if page >= pages {
        return Err(ParserError::DisplayPageOutOfRange);
    }
    let start = page * width;
    let end = text.len().min(start + width);
    out.clear();
    out.try_extend_from_slice(&text[start..end])?;
    Ok(pages)
}

/// Friendly display text for well-known raw values.
#[must_use]
pub fn value_label(raw: &[u8]) -> Option<&'static str> {
    VALUE_LABELS
        .iter()
        .find(|(from, _)| from.as_bytes() == raw)
        .map(|(_, to)| *to)
}

/// Whether values under `key` are rendered as amounts.
#[must_use]
pub fn is_amount_key(key: &[u8]) -> bool {
    AMOUNT_KEYS.iter().any(|k| k.as_bytes() == key)
}

/// Renders page `page` of the raw token text, substituting well-known values.
///
/// # Errors
///
/// Token access errors and [`ParserError::DisplayPageOutOfRange`].
pub fn format_token(
    doc: &Document<'_>,
    token_idx: usize,
    width: usize,
    page: usize,
    out: &mut Page,
) -> Result<usize, ParserError> {
    let raw = doc.token_bytes(token_idx)?;
    let text = value_label(raw).map_or(raw, str::as_bytes);
    write_page(text, width, page, out)
}

/// Renders page `page` of a coin or a list of coins.
///
/// A list is paginated as the concatenation of its coins' pages, each coin
/// starting on a fresh page. With `chain` set, coins in its base denomination
/// are converted to display units.
///
/// # Errors
///
/// [`ParserError::UnexpectedType`] for values that are not coins,
/// the coin validation errors of [`render_coin`] and
/// [`ParserError::DisplayPageOutOfRange`].
pub fn format_amount(
    doc: &Document<'_>,
    token_idx: usize,
    chain: Option<&ChainConfig>,
    width: usize,
    page: usize,
    out: &mut Page,
) -> Result<usize, ParserError> {
    let width = width.clamp(1, MAX_PAGE_WIDTH);
    match doc.token(token_idx)?.kind {
        TokenKind::Object => {
            let mut text = CoinText::new();
            render_coin(doc, token_idx, chain, &mut text)?;
            write_page(&text, width, page, out)
        }
        TokenKind::Array => {
            let mut total = 0;
            let mut selected = None;
            for coin in doc.children(token_idx)? {
                let mut text = CoinText::new();
                render_coin(doc, coin, chain, &mut text)?;
                let pages = page_count(text.len(), width);
                if selected.is_none() && page < total + pages {
                    selected = Some((text, page - total));
                }
                total += pages;
            }
            if total == 0 {
                return write_page(EMPTY, width, page, out);
            }
            tracing::trace!(total_pages = total, page, "paginated coin list");

            let (text, local) = selected.ok_or(ParserError::DisplayPageOutOfRange)?;
            write_page(&text, width, local, out)?;
            Ok(total)
        }
        TokenKind::String | TokenKind::Primitive => Err(ParserError::UnexpectedType),
    }
}

/// Renders one `{"amount":..,"denom":..}` coin as `amount denom`.
///
/// An empty object renders as `Empty`.
///
/// # Errors
///
/// - [`ParserError::UnexpectedType`] if the coin or its fields have the wrong
///   kind.
/// - [`ParserError::UnexpectedField`] unless the keys are exactly `amount`
///   and `denom`.
/// - [`ParserError::UnexpectedValue`] for empty or oversized fields, or a
///   non-numeric amount that needs conversion.
pub fn render_coin<const N: usize>(
    doc: &Document<'_>,
    coin_idx: usize,
    chain: Option<&ChainConfig>,
    out: &mut ArrayVec<u8, N>,
) -> Result<(), ParserError> {
    if doc.token(coin_idx)?.kind != TokenKind::Object {
        return Err(ParserError::UnexpectedType);
    }
    match doc.object_element_count(coin_idx)? {
        0 => {
            out.try_extend_from_slice(EMPTY)?;
            return Ok(());
        }
        2 => {}
        _ => return Err(ParserError::UnexpectedField),
    }

    let amount = coin_field(doc, coin_idx, 0, b"amount", MAX_AMOUNT_LEN)?;
    let denom = coin_field(doc, coin_idx, 1, b"denom", MAX_DENOM_LEN)?;

    match chain.filter(|c| c.base_denom.as_bytes() == denom) {
        Some(chain) => {
            to_fixed_point(amount, chain.decimals, chain.min_decimals, out)?;
            out.try_push(b' ')?;
            out.try_extend_from_slice(chain.display_denom.as_bytes())?;
        }
        None => {
            out.try_extend_from_slice(amount)?;
            out.try_push(b' ')?;
            out.try_extend_from_slice(denom)?;
        }
    }
    Ok(())
}

fn coin_field<'a>(
    doc: &Document<'a>,
    coin_idx: usize,
    n: usize,
    name: &[u8],
    max_len: usize,
) -> Result<&'a [u8], ParserError> {
    if doc.token_bytes(doc.object_nth_key(coin_idx, n)?)? != name {
        return Err(ParserError::UnexpectedField);
    }
    let value_idx = doc.object_nth_value(coin_idx, n)?;
    if doc.token(value_idx)?.kind != TokenKind::String {
        return Err(ParserError::UnexpectedType);
    }
    let value = doc.token_bytes(value_idx)?;
    if value.is_empty() || value.len() > max_len {
        return Err(ParserError::UnexpectedValue);
    }
    Ok(value)
}

/// Writes the decimal string `amount` shifted `decimals` places to the right
/// of the point, dropping redundant leading zeros and trailing fractional
/// zeros beyond `min_decimals`.
///
/// `("600", 6, 1)` gives `0.0006`, `("6000000", 6, 1)` gives `6.0`.
///
/// # Errors
///
/// [`ParserError::UnexpectedValue`] unless `amount` is a non-empty run of
/// ASCII digits, [`ParserError::BufferOverflow`] if `out` is too small.
pub fn to_fixed_point<const N: usize>(
    amount: &[u8],
    decimals: u8,
    min_decimals: u8,
    out: &mut ArrayVec<u8, N>,
) -> Result<(), ParserError> {
    if amount.is_empty() || !amount.iter().all(u8::is_ascii_digit) {
        return Err(ParserError::UnexpectedValue);
    }
    let decimals = usize::from(decimals);
    let first = amount
        .iter()
        .position(|&c| c != b'0')
        .unwrap_or(amount.len());
    let digits = &amount[first..];

    let (int, frac, pad) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (&digits[..split], &digits[split..], 0)
    } else {
        (&b"0"[..], digits, decimals - digits.len())
    };

    out.try_extend_from_slice(int)?;
    let point = out.len();
    out.try_push(b'.')?;
    for _ in 0..pad {
        out.try_push(b'0')?;
    }
    out.try_extend_from_slice(frac)?;

    let keep = point + 1 + usize::from(min_decimals).min(decimals);
    while out.len() > keep && out.last() == Some(&b'0') {
        out.pop();
    }
    if out.len() == point + 1 {
        out.pop();
    }
    Ok(())
}
