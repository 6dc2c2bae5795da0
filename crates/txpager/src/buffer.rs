use arrayvec::ArrayVec;

use crate::ParserError;

/// Fixed-capacity transaction buffer filled chunk by chunk as the host
/// streams a transaction in.
#[derive(Debug, Clone, Default)]
pub struct TxBuffer<const N: usize> {
    bytes: ArrayVec<u8, N>,
}

impl<const N: usize> TxBuffer<N> {
    /// An empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: ArrayVec::new(),
        }
    }

    /// Drops any buffered bytes, ready for a new transaction.
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    /// Appends `chunk` and returns the new length.
    ///
    /// # Errors
    ///
    /// [`ParserError::TransactionTooBig`] if the chunk does not fit, in which
    /// case nothing is appended.
    pub fn append(&mut self, chunk: &[u8]) -> Result<usize, ParserError> {
        self.bytes
            .try_extend_from_slice(chunk)
            .map_err(|_| ParserError::TransactionTooBig)?;
        Ok(self.bytes.len())
    }

    /// The buffered bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of buffered bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Capacity in bytes.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}
