use thiserror::Error;

/// Every failure the engine can report, from tokenizing a buffer to rendering
/// a single page of an item.
///
/// Errors are plain `Copy` values so a host can surface them through a status
/// code on constrained targets.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserError {
    // Generic
    /// The requested data does not exist (bad token index, missing root, API
    /// used before a successful validation).
    #[error("no data")]
    NoData,
    /// A bounded output buffer would have overflowed.
    #[error("buffer overflow")]
    BufferOverflow,
    /// A token range points outside the transaction buffer.
    #[error("unexpected buffer end")]
    UnexpectedBufferEnd,
    /// A value has the wrong JSON or CBOR kind.
    #[error("unexpected type")]
    UnexpectedType,
    /// A value is structurally well formed but not acceptable.
    #[error("unexpected value")]
    UnexpectedValue,
    /// A numeric value does not fit its target range.
    #[error("value out of range")]
    ValueOutOfRange,
    /// A container holds an unacceptable number of entries.
    #[error("unexpected number of items")]
    UnexpectedNumberItems,
    /// An unknown field was found where a known one was required.
    #[error("unexpected field")]
    UnexpectedField,
    /// The transaction targets a chain the device refuses to sign for.
    #[error("unexpected chain")]
    UnexpectedChain,

    // Display
    /// The display index is past the last item.
    #[error("display index out of range")]
    DisplayIdxOutOfRange,
    /// The page index is past the last page of the item.
    #[error("display page out of range")]
    DisplayPageOutOfRange,

    // Tokenizer
    /// The JSON text is truncated.
    #[error("JSON is incomplete")]
    IncompleteJson,
    /// The buffer does not contain any JSON value.
    #[error("zero tokens")]
    ZeroTokens,
    /// The token table is full.
    #[error("too many tokens")]
    TooManyTokens,
    /// The buffer holds bytes that cannot appear at that position in JSON.
    #[error("unexpected characters")]
    UnexpectedCharacters,
    /// The buffer is larger than the configured display buffer.
    #[error("buffer of {len} bytes exceeds the {max} byte limit")]
    BufferTooLarge {
        /// Length of the rejected buffer.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    // Buffering
    /// Appending a chunk would overflow the transaction buffer.
    #[error("transaction too big")]
    TransactionTooBig,

    // Canonical form
    /// Whitespace outside of string contents.
    #[error("JSON contains whitespace")]
    ContainsWhitespace,
    /// Object keys are not in ascending byte order.
    #[error("JSON dictionaries are not sorted")]
    NotSorted,
    /// The top level has no `chain_id`.
    #[error("JSON missing chain_id")]
    MissingChainId,
    /// The top level has no `sequence`.
    #[error("JSON missing sequence")]
    MissingSequence,
    /// The top level has no `fee`.
    #[error("JSON missing fee")]
    MissingFee,
    /// The top level has no `msgs`.
    #[error("JSON missing msgs")]
    MissingMsgs,
    /// The top level has no `account_number`.
    #[error("JSON missing account_number")]
    MissingAccountNumber,
    /// The top level has no `memo`.
    #[error("JSON missing memo")]
    MissingMemo,

    // Traversal
    /// No item exists at the requested traversal index.
    #[error("query returned no results")]
    QueryNoResults,

    // CBOR
    /// The CBOR input ends early or carries trailing bytes.
    #[error("CBOR ended unexpectedly")]
    CborUnexpectedEof,
    /// The CBOR input is malformed.
    #[error("unexpected CBOR data")]
    CborUnexpected,
    /// Screen map keys are not strictly ascending.
    #[error("CBOR is not canonical")]
    CborNotCanonical,
}

impl<T> From<arrayvec::CapacityError<T>> for ParserError {
    fn from(_: arrayvec::CapacityError<T>) -> Self {
        ParserError::BufferOverflow
    }
}
