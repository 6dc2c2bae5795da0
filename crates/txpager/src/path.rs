use arrayvec::ArrayVec;
use bstr::BStr;

use crate::ParserError;

/// Capacity of a display key.
pub const KEY_CAPACITY: usize = 64;

/// Slash-separated key of the value a traversal is positioned on, e.g.
/// `msgs/value/amount`. Array positions do not appear in the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathKey {
    bytes: ArrayVec<u8, KEY_CAPACITY>,
}

impl PathKey {
    /// An empty key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `/segment`, or just `segment` to an empty key.
    ///
    /// # Errors
    ///
    /// [`ParserError::BufferOverflow`] when the key would exceed
    /// [`KEY_CAPACITY`]; the key is left unchanged.
    pub fn push_segment(&mut self, segment: &[u8]) -> Result<(), ParserError> {
        let sep = usize::from(!self.bytes.is_empty());
        if self.bytes.len() + sep + segment.len() > KEY_CAPACITY {
            return Err(ParserError::BufferOverflow);
        }
        if sep == 1 {
            self.bytes.push(b'/');
        }
        self.bytes.try_extend_from_slice(segment)?;
        Ok(())
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The key as a byte string, for display and comparison.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        BStr::new(self.as_bytes())
    }
}

impl AsRef<[u8]> for PathKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
