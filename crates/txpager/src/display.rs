//! Mapping of flat display indices onto the transaction's root sections.
//!
//! # Overview
//!
//! A JSON transaction is shown as the leaves of six root sections, in a fixed
//! order. [`DisplayCache::build`] counts the leaves of each section once; a
//! display index then resolves to a section plus a local index, and the local
//! index is handed to a [`Query`] starting at that section's value.
//!
//! # Message type grouping
//!
//! When every message carries the same `type`, only the first `msgs/type`
//! leaf is shown. The cache records the unfiltered leaf index of that first
//! occurrence and the section's count already excludes the hidden ones.

use crate::{
    ParserError,
    json::{Document, TokenKind},
    path::PathKey,
    query::{GroupFilter, Query},
};

/// One root section of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootItem {
    /// Top-level key of the section.
    pub key: &'static str,
    /// Level budget for the section's search.
    pub max_level: u8,
}

/// Root sections in display order.
pub const ROOT_ITEMS: [RootItem; 6] = [
    RootItem { key: "chain_id", max_level: 2 },
    RootItem { key: "account_number", max_level: 2 },
    RootItem { key: "sequence", max_level: 2 },
    RootItem { key: "fee", max_level: 1 },
    RootItem { key: "memo", max_level: 2 },
    RootItem { key: "msgs", max_level: 2 },
];

const MEMO: usize = 4;
const MSGS: usize = 5;

/// Key of the leaves collapsed by message type grouping.
pub const MSG_TYPE_KEY: &[u8] = b"msgs/type";

const KEY_LABELS: [(&str, &str); 28] = [
    ("chain_id", "Chain ID"),
    ("account_number", "Account"),
    ("sequence", "Sequence"),
    ("memo", "Memo"),
    ("fee/amount", "Fee"),
    ("fee/gas", "Gas"),
    ("msgs/type", "Type"),
    ("msgs/inputs/address", "Source Address"),
    ("msgs/inputs/coins", "Source Coins"),
    ("msgs/outputs/address", "Dest Address"),
    ("msgs/outputs/coins", "Dest Coins"),
    ("msgs/value/from_address", "From"),
    ("msgs/value/to_address", "To"),
    ("msgs/value/amount", "Amount"),
    ("msgs/value/delegator_address", "Delegator"),
    ("msgs/value/validator_address", "Validator"),
    ("msgs/value/validator_src_address", "Validator Source"),
    ("msgs/value/validator_dst_address", "Validator Dest"),
    ("msgs/value/description", "Description"),
    ("msgs/value/initial_deposit/amount", "Deposit Amount"),
    ("msgs/value/initial_deposit/denom", "Deposit Denom"),
    ("msgs/value/proposal_type", "Proposal"),
    ("msgs/value/proposer", "Proposer"),
    ("msgs/value/title", "Title"),
    ("msgs/value/depositer", "Sender"),
    ("msgs/value/proposal_id", "Proposal ID"),
    ("msgs/value/voter", "Voter"),
    ("msgs/value/option", "Option"),
];

/// Friendly display label for a path key, if it has one.
#[must_use]
pub fn key_label(key: &[u8]) -> Option<&'static str> {
    KEY_LABELS
        .iter()
        .find(|(from, _)| from.as_bytes() == key)
        .map(|(_, to)| *to)
}

/// Message type grouping state found while counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsgTypeGroup {
    /// Unfiltered index, within the `msgs` section, of the visible type leaf.
    pub visible_index: usize,
    /// Number of messages sharing the type.
    pub count: usize,
}

/// Per-section leaf counts of one parsed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCache {
    start_tokens: [Option<usize>; 6],
    counts: [usize; 6],
    total: usize,
    group: Option<MsgTypeGroup>,
}

impl DisplayCache {
    /// Counts the displayable leaves of every root section.
    ///
    /// Sections are scanned in display order and scanning stops at the first
    /// section missing from the document. An empty `memo` shows nothing.
    ///
    /// # Errors
    ///
    /// [`ParserError::UnexpectedType`] if the root is not an object, and
    /// traversal errors such as [`ParserError::BufferOverflow`].
    pub fn build(doc: &Document<'_>) -> Result<Self, ParserError> {
        if doc.token(0)?.kind != TokenKind::Object {
            return Err(ParserError::UnexpectedType);
        }

        let mut cache = Self {
            start_tokens: [None; 6],
            counts: [0; 6],
            total: 0,
            group: None,
        };

        for (root_idx, root) in ROOT_ITEMS.iter().enumerate() {
            let start = match doc.object_get_value(0, root.key.as_bytes()) {
                Ok(start) => start,
                Err(ParserError::NoData) => break,
                Err(e) => return Err(e),
            };
            cache.start_tokens[root_idx] = Some(start);

            let mut grouping = GroupScan::default();
            let mut count = 0;
            loop {
                let mut query = Query::with_prefix(count, root.max_level, root.key.as_bytes())?;
                let token = match query.find(doc, start) {
                    Ok(token) => token,
                    Err(ParserError::QueryNoResults) => break,
                    Err(e) => return Err(e),
                };
                let value = doc.token_bytes(token)?;
                if root_idx == MEMO && value.is_empty() {
                    break;
                }
                if root_idx == MSGS {
                    grouping.observe(query.key(), value, count);
                }
                count += 1;
            }

            if root_idx == MSGS {
                cache.group = grouping.finish();
                if let Some(group) = cache.group {
                    count -= group.count - 1;
                }
            }
            cache.counts[root_idx] = count;
            cache.total += count;
        }

        tracing::debug!(
            total_items = cache.total,
            grouped_msgs = cache.group.map_or(0, |g| g.count),
            "display cache built"
        );
        Ok(cache)
    }

    /// Number of display items.
    #[must_use]
    pub fn num_items(&self) -> usize {
        self.total
    }

    /// Visible leaves per root section, in [`ROOT_ITEMS`] order.
    #[must_use]
    pub fn counts(&self) -> [usize; 6] {
        self.counts
    }

    /// Message type grouping, when active.
    #[must_use]
    pub fn group(&self) -> Option<MsgTypeGroup> {
        self.group
    }

    /// Section and local index of display item `display_idx`.
    ///
    /// # Errors
    ///
    /// [`ParserError::DisplayIdxOutOfRange`] past the last item.
    pub fn locate(&self, display_idx: usize) -> Result<(usize, usize), ParserError> {
        let mut local = display_idx;
        for (root_idx, &count) in self.counts.iter().enumerate() {
            if local < count {
                return Ok((root_idx, local));
            }
            local -= count;
        }
        Err(ParserError::DisplayIdxOutOfRange)
    }

    /// Path key and token index of display item `display_idx`.
    ///
    /// # Errors
    ///
    /// As [`Self::locate`], plus traversal errors.
    pub fn query(&self, doc: &Document<'_>, display_idx: usize) -> Result<(PathKey, usize), ParserError> {
        let (root_idx, local) = self.locate(display_idx)?;
        let root = ROOT_ITEMS[root_idx];
        let start = self.start_tokens[root_idx].ok_or(ParserError::NoData)?;

        let filter = self
            .group
            .filter(|_| root_idx == MSGS)
            .map(|g| GroupFilter {
                key: MSG_TYPE_KEY,
                visible_index: g.visible_index,
            });
        let mut query = Query::with_prefix(local, root.max_level, root.key.as_bytes())?.with_filter(filter);
        let token = query.find(doc, start)?;
        Ok((query.key().clone(), token))
    }
}

/// Tracks whether all `msgs/type` leaves share one value.
#[derive(Default)]
struct GroupScan<'a> {
    first: Option<(&'a [u8], usize)>,
    count: usize,
    mixed: bool,
}

impl<'a> GroupScan<'a> {
    fn observe(&mut self, key: &PathKey, value: &'a [u8], leaf_idx: usize) {
        if self.mixed || key.as_bytes() != MSG_TYPE_KEY {
            return;
        }
        match self.first {
            None => self.first = Some((value, leaf_idx)),
            Some((first, _)) if first != value => {
                self.mixed = true;
                return;
            }
            Some(_) => {}
        }
        self.count += 1;
    }

    fn finish(self) -> Option<MsgTypeGroup> {
        match self.first {
            Some((_, visible_index)) if !self.mixed => Some(MsgTypeGroup {
                visible_index,
                count: self.count,
            }),
            _ => None,
        }
    }
}
