//! Depth-first search for the `n`-th displayable leaf under a token.
//!
//! # Overview
//!
//! A [`Query`] walks a subtree in document order and counts leaves. A token
//! is a leaf when it is a string or primitive, or when the search has run out
//! of level or depth budget, in which case the whole container is displayed
//! as one value. Object members extend the path key with their key and spend
//! one level and one depth; array elements spend depth only and leave the key
//! untouched.
//!
//! # Grouping
//!
//! With a [`GroupFilter`] set, every leaf whose key equals the filter's key
//! is hidden except the one at the filter's leaf index. Hidden leaves keep the
//! counter moving and shift the target, so the remaining leaves keep their
//! positions relative to an unfiltered walk.

use crate::{
    ParserError,
    json::{Document, TokenKind},
    path::PathKey,
};

/// Depth budget of every search.
pub const MAX_RECURSION_DEPTH: u8 = 6;

/// Hides repeated occurrences of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupFilter {
    /// Key whose leaves are collapsed.
    pub key: &'static [u8],
    /// Unfiltered leaf index of the occurrence that stays visible.
    pub visible_index: usize,
}

/// One search for the leaf at `item_index`.
#[derive(Debug, Clone)]
pub struct Query {
    item_index: usize,
    current: usize,
    max_level: u8,
    max_depth: u8,
    key: PathKey,
    filter: Option<GroupFilter>,
}

impl Query {
    /// A search for leaf `item_index` with an empty key prefix.
    #[must_use]
    pub fn new(item_index: usize, max_level: u8) -> Self {
        Self {
            item_index,
            current: 0,
            max_level,
            max_depth: MAX_RECURSION_DEPTH,
            key: PathKey::new(),
            filter: None,
        }
    }

    /// A search whose key starts with `prefix`.
    ///
    /// # Errors
    ///
    /// [`ParserError::BufferOverflow`] if the prefix does not fit.
    pub fn with_prefix(item_index: usize, max_level: u8, prefix: &[u8]) -> Result<Self, ParserError> {
        let mut query = Self::new(item_index, max_level);
        query.key.push_segment(prefix)?;
        Ok(query)
    }

    /// Hides repeated leaves as described by `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: Option<GroupFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Key of the leaf found by the last successful [`Self::find`].
    #[must_use]
    pub fn key(&self) -> &PathKey {
        &self.key
    }

    /// Number of leaves visited so far, hidden ones included.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.current
    }

    /// Token index of the target leaf under `token_idx`.
    ///
    /// On success the key names the leaf. On [`ParserError::QueryNoResults`]
    /// the key is back to its prefix and [`Self::visited`] holds the number of
    /// leaves in the subtree.
    ///
    /// # Errors
    ///
    /// [`ParserError::QueryNoResults`] if the subtree has fewer leaves,
    /// [`ParserError::NoData`] for a bad token index and
    /// [`ParserError::BufferOverflow`] if a key does not fit.
    pub fn find(&mut self, doc: &Document<'_>, token_idx: usize) -> Result<usize, ParserError> {
        let token = doc.token(token_idx)?;

        if self.max_level == 0 || self.max_depth == 0 || token.is_leaf() {
            let hidden = self.filter.is_some_and(|f| {
                f.visible_index != self.current && self.key.as_bytes() == f.key
            });
            if !hidden && self.current == self.item_index {
                return Ok(token_idx);
            }
            if hidden {
                self.item_index += 1;
            }
            self.current += 1;
            return Err(ParserError::QueryNoResults);
        }

        let base = self.key.len();
        let mut children = doc.children(token_idx)?;
        while let Some(child) = children.next() {
            let result = if token.kind == TokenKind::Object {
                let value = children.next().ok_or(ParserError::UnexpectedBufferEnd)?;
                self.key.push_segment(doc.token_bytes(child)?)?;
                self.descend(doc, value, 1)
            } else {
                self.descend(doc, child, 0)
            };
            match result {
                Err(ParserError::QueryNoResults) => self.key.truncate(base),
                found => return found,
            }
        }
        Err(ParserError::QueryNoResults)
    }

    fn descend(&mut self, doc: &Document<'_>, token_idx: usize, level_cost: u8) -> Result<usize, ParserError> {
        self.max_level -= level_cost;
        self.max_depth -= 1;
        let result = self.find(doc, token_idx);
        self.max_level += level_cost;
        self.max_depth += 1;
        result
    }
}

/// Number of leaves under `token_idx` for the given level budget.
///
/// # Errors
///
/// As [`Query::find`], except that running out of leaves is the answer rather
/// than an error.
pub fn count_leaves(doc: &Document<'_>, token_idx: usize, max_level: u8) -> Result<usize, ParserError> {
    let mut query = Query::new(usize::MAX, max_level);
    match query.find(doc, token_idx) {
        Ok(_) | Err(ParserError::QueryNoResults) => Ok(query.visited()),
        Err(e) => Err(e),
    }
}
