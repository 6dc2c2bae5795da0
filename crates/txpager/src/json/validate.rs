//! Canonical form checks for JSON transactions.
//!
//! A transaction is canonical when it carries no whitespace outside string
//! contents, every object lists its keys in ascending byte order, and the top
//! level holds all required keys.

use super::{Document, TokenKind};
use crate::ParserError;

/// Top-level keys a transaction must carry, with the error reported when the
/// key is missing. Checked in this order.
pub const REQUIRED_ROOT_KEYS: [(&str, ParserError); 6] = [
    ("chain_id", ParserError::MissingChainId),
    ("sequence", ParserError::MissingSequence),
    ("fee", ParserError::MissingFee),
    ("msgs", ParserError::MissingMsgs),
    ("account_number", ParserError::MissingAccountNumber),
    ("memo", ParserError::MissingMemo),
];

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Runs every canonical form check, reporting the first failure.
///
/// # Errors
///
/// [`ParserError::ContainsWhitespace`], [`ParserError::NotSorted`] or the
/// `Missing*` error of the first absent required key.
pub fn validate(doc: &Document<'_>) -> Result<(), ParserError> {
    if contains_whitespace(doc) {
        return Err(ParserError::ContainsWhitespace);
    }
    if !dictionaries_sorted(doc)? {
        return Err(ParserError::NotSorted);
    }
    check_required_keys(doc)
}

/// Whether any whitespace byte occurs outside the contents of string tokens.
#[must_use]
pub fn contains_whitespace(doc: &Document<'_>) -> bool {
    let buffer = doc.buffer();
    let mut pos = 0;
    for token in doc.tokens().iter().filter(|t| t.kind == TokenKind::String) {
        // the opening quote sits right before the contents
        let open = token.start as usize - 1;
        if buffer[pos..open].iter().copied().any(is_whitespace) {
            return true;
        }
        pos = token.end as usize + 1;
    }
    buffer[pos..].iter().copied().any(is_whitespace)
}

/// Whether every object's keys are in non-decreasing byte order.
///
/// # Errors
///
/// Propagates token access errors.
pub fn dictionaries_sorted(doc: &Document<'_>) -> Result<bool, ParserError> {
    for (idx, _) in doc
        .tokens()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == TokenKind::Object)
    {
        let mut prev: Option<&[u8]> = None;
        for key_idx in doc.children(idx)?.step_by(2) {
            let key = doc.token_bytes(key_idx)?;
            if prev.is_some_and(|p| p > key) {
                return Ok(false);
            }
            prev = Some(key);
        }
    }
    Ok(true)
}

/// Checks the top-level object for [`REQUIRED_ROOT_KEYS`].
///
/// # Errors
///
/// The `Missing*` error of the first absent key. A root that is not an object
/// is missing all of them.
pub fn check_required_keys(doc: &Document<'_>) -> Result<(), ParserError> {
    for (key, missing) in REQUIRED_ROOT_KEYS {
        match doc.object_get_value(0, key.as_bytes()) {
            Ok(_) => {}
            Err(ParserError::NoData | ParserError::UnexpectedType) => return Err(missing),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
