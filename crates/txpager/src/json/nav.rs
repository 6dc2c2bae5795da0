//! Structural queries over the flat token table.
//!
//! Direct children of a container are found by scanning forward from the
//! container token and skipping every token that starts inside the previous
//! child. For objects the direct children alternate key, value.

use super::{Document, TokenKind};
use crate::ParserError;

/// Iterator over the indices of a container's direct children.
#[derive(Debug, Clone)]
pub struct Children<'d, 'a> {
    doc: &'d Document<'a>,
    next: usize,
    prev_end: u32,
    end: u32,
}

impl Iterator for Children<'_, '_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            let token = self.doc.tokens.get(self.next)?;
            if token.start >= self.end {
                return None;
            }
            let idx = self.next;
            self.next += 1;
            if token.start <= self.prev_end {
                continue;
            }
            self.prev_end = token.end;
            return Some(idx);
        }
    }
}

impl<'a> Document<'a> {
    /// Direct children of the token at `parent_idx`; empty for leaves.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] for a bad index.
    pub fn children(&self, parent_idx: usize) -> Result<Children<'_, 'a>, ParserError> {
        let parent = self.token(parent_idx)?;
        let end = if parent.is_leaf() { parent.start } else { parent.end };
        Ok(Children {
            doc: self,
            next: parent_idx + 1,
            prev_end: parent.start,
            end,
        })
    }

    fn container(&self, idx: usize, kind: TokenKind) -> Result<Children<'_, 'a>, ParserError> {
        if self.token(idx)?.kind != kind {
            return Err(ParserError::UnexpectedType);
        }
        self.children(idx)
    }

    /// Number of elements of the array at `array_idx`.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] for a bad index, [`ParserError::UnexpectedType`]
    /// if the token is not an array.
    pub fn array_element_count(&self, array_idx: usize) -> Result<usize, ParserError> {
        Ok(self.container(array_idx, TokenKind::Array)?.count())
    }

    /// Token index of element `n` of the array at `array_idx`.
    ///
    /// # Errors
    ///
    /// As [`Self::array_element_count`], plus [`ParserError::NoData`] when
    /// `n` is out of range.
    pub fn array_nth_element(&self, array_idx: usize, n: usize) -> Result<usize, ParserError> {
        self.container(array_idx, TokenKind::Array)?
            .nth(n)
            .ok_or(ParserError::NoData)
    }

    /// Number of key/value pairs of the object at `object_idx`.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] for a bad index, [`ParserError::UnexpectedType`]
    /// if the token is not an object.
    pub fn object_element_count(&self, object_idx: usize) -> Result<usize, ParserError> {
        Ok(self.container(object_idx, TokenKind::Object)?.count() / 2)
    }

    /// Token index of key `n` of the object at `object_idx`.
    ///
    /// # Errors
    ///
    /// As [`Self::object_element_count`], plus [`ParserError::NoData`] when
    /// `n` is out of range.
    pub fn object_nth_key(&self, object_idx: usize, n: usize) -> Result<usize, ParserError> {
        self.container(object_idx, TokenKind::Object)?
            .step_by(2)
            .nth(n)
            .ok_or(ParserError::NoData)
    }

    /// Token index of the value paired with key `n`.
    ///
    /// # Errors
    ///
    /// As [`Self::object_nth_key`].
    pub fn object_nth_value(&self, object_idx: usize, n: usize) -> Result<usize, ParserError> {
        // a value always directly follows its key
        self.object_nth_key(object_idx, n).map(|key| key + 1)
    }

    /// Token index of the value stored under `key` in the object at
    /// `object_idx`. Keys are compared as raw bytes.
    ///
    /// # Errors
    ///
    /// As [`Self::object_element_count`], plus [`ParserError::NoData`] when
    /// the key is absent.
    pub fn object_get_value(&self, object_idx: usize, key: &[u8]) -> Result<usize, ParserError> {
        for key_idx in self.container(object_idx, TokenKind::Object)?.step_by(2) {
            if self.token_bytes(key_idx)? == key {
                return Ok(key_idx + 1);
            }
        }
        Err(ParserError::NoData)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ParserOptions;

    const TEXT: &[u8] = br#"{"a":[1,[2,3],{"x":""}],"b":{"c":{"d":4},"e":"5"},"f":[]}"#;

    fn doc() -> Document<'static> {
        Document::parse(TEXT, &ParserOptions::default()).unwrap()
    }

    #[test]
    fn array_children_skip_nested_tokens() {
        let doc = doc();
        let array = doc.object_get_value(0, b"a").unwrap();
        assert_eq!(doc.array_element_count(array), Ok(3));

        let third = doc.array_nth_element(array, 2).unwrap();
        assert_eq!(doc.token(third).unwrap().kind, TokenKind::Object);
        assert_eq!(doc.array_nth_element(array, 3), Err(ParserError::NoData));

        let empty = doc.object_get_value(0, b"f").unwrap();
        assert_eq!(doc.array_element_count(empty), Ok(0));
        assert_eq!(doc.array_nth_element(empty, 0), Err(ParserError::NoData));
    }

    #[test]
    fn object_pairs() {
        let doc = doc();
        assert_eq!(doc.object_element_count(0), Ok(3));

        let b = doc.object_nth_value(0, 1).unwrap();
        assert_eq!(doc.object_element_count(b), Ok(2));
        let e_key = doc.object_nth_key(b, 1).unwrap();
        assert_eq!(doc.token_bytes(e_key), Ok(&b"e"[..]));
        assert_eq!(doc.token_bytes(doc.object_nth_value(b, 1).unwrap()), Ok(&b"5"[..]));
        assert_eq!(doc.object_nth_key(b, 2), Err(ParserError::NoData));
    }

    #[test]
    fn lookup_by_key_ignores_nested_keys() {
        let doc = doc();
        assert_eq!(doc.object_get_value(0, b"d"), Err(ParserError::NoData));
        assert_eq!(doc.object_get_value(0, b"x"), Err(ParserError::NoData));
        let c = doc.object_get_value(doc.object_get_value(0, b"b").unwrap(), b"c").unwrap();
        assert_eq!(doc.object_get_value(c, b"d").map(|v| doc.token_bytes(v)), Ok(Ok(&b"4"[..])));
    }

    #[test]
    fn wrong_kind_and_bad_index() {
        let doc = doc();
        assert_eq!(doc.array_element_count(0), Err(ParserError::UnexpectedType));
        assert_eq!(doc.object_element_count(99), Err(ParserError::NoData));
        assert_eq!(doc.object_get_value(99, b"a"), Err(ParserError::NoData));
    }
}
