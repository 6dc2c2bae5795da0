//! Flat JSON token table over a borrowed buffer.
//!
//! Tokenizing never copies: every [`Token`] is a kind plus a byte range into
//! the caller's buffer. Containers precede their children and tokens are
//! ordered by start offset, which is what the navigation primitives in
//! [`nav`] rely on.
//!
//! String tokens span the contents between the quotes, without the quotes.
//! Container tokens span from the opening to one past the closing bracket.

use arrayvec::ArrayVec;

use crate::{ParserError, ParserOptions};

pub mod nav;
mod tokenizer;
pub mod validate;

/// Compile-time capacity of the token table.
pub const MAX_TOKENS: usize = 768;

/// The kind of a JSON token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
    /// A quoted string, or an object key.
    String,
    /// A number, `true`, `false` or `null`.
    Primitive,
}

/// One entry of the token table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Offset of the first byte.
    pub start: u32,
    /// Offset one past the last byte.
    pub end: u32,
}

impl Token {
    pub(crate) fn range(self) -> core::ops::Range<usize> {
        self.start as usize..self.end as usize
    }

    pub(crate) fn is_leaf(self) -> bool {
        matches!(self.kind, TokenKind::String | TokenKind::Primitive)
    }
}

/// A tokenized JSON buffer.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    buffer: &'a [u8],
    tokens: ArrayVec<Token, MAX_TOKENS>,
}

impl<'a> Document<'a> {
    /// Tokenizes `buffer`.
    ///
    /// # Errors
    ///
    /// - [`ParserError::BufferTooLarge`] if the buffer exceeds
    ///   `options.max_buffer_len`.
    /// - [`ParserError::TooManyTokens`] once the token budget is exhausted.
    /// - [`ParserError::UnexpectedCharacters`] for malformed JSON or bytes
    ///   following the root value.
    /// - [`ParserError::IncompleteJson`] if the text is truncated.
    /// - [`ParserError::ZeroTokens`] if the buffer holds no value at all.
    pub fn parse(buffer: &'a [u8], options: &ParserOptions) -> Result<Self, ParserError> {
        let max = options.max_buffer_len.min(u32::MAX as usize);
        if buffer.len() > max {
            return Err(ParserError::BufferTooLarge {
                len: buffer.len(),
                max,
            });
        }

        let mut tokens = ArrayVec::new();
        tokenizer::tokenize(buffer, options.token_budget(), &mut tokens)?;
        tracing::debug!(tokens = tokens.len(), bytes = buffer.len(), "tokenized transaction");

        Ok(Self { buffer, tokens })
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// All tokens, in document order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The token at `idx`.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] when `idx` is not a valid token index.
    pub fn token(&self, idx: usize) -> Result<Token, ParserError> {
        self.tokens.get(idx).copied().ok_or(ParserError::NoData)
    }

    /// The bytes a token covers. For strings this excludes the quotes and
    /// leaves escape sequences as written.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] for a bad index and
    /// [`ParserError::UnexpectedBufferEnd`] for a range outside the buffer.
    pub fn token_bytes(&self, idx: usize) -> Result<&'a [u8], ParserError> {
        let token = self.token(idx)?;
        self.buffer
            .get(token.range())
            .ok_or(ParserError::UnexpectedBufferEnd)
    }
}
