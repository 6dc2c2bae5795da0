use arrayvec::ArrayVec;
use bstr::BStr;

use crate::{ParserError, format::Page, path::KEY_CAPACITY};

/// One page of one display item, ready for the screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    key: ArrayVec<u8, KEY_CAPACITY>,
    value: Page,
    page_count: usize,
}

impl Item {
    /// The item's label.
    #[must_use]
    pub fn key(&self) -> &BStr {
        BStr::new(&self.key)
    }

    /// The requested page of the item's value.
    #[must_use]
    pub fn value(&self) -> &BStr {
        BStr::new(&self.value)
    }

    /// Number of pages of the whole value.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub(crate) fn push_key(&mut self, bytes: &[u8]) -> Result<(), ParserError> {
        self.key.try_extend_from_slice(bytes)?;
        Ok(())
    }

    pub(crate) fn key_mut(&mut self) -> &mut ArrayVec<u8, KEY_CAPACITY> {
        &mut self.key
    }

    pub(crate) fn value_mut(&mut self) -> &mut Page {
        &mut self.value
    }

    pub(crate) fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
    }
}
