//! Single-pass tokenizer producing the flat token table.
//!
//! # Overview
//!
//! The scanner walks the buffer once and appends a [`Token`] for every value
//! and object key. Containers are appended when opened with an `end` marker of
//! [`OPEN`] and closed in place when their bracket is found; the enclosing
//! container is recovered by scanning back for the nearest token still open,
//! so no nesting stack is needed.
//!
//! # Invariants
//!
//! - Exactly one root value. Anything but JSON whitespace after it is an
//!   error.
//! - A token is only appended after checking the token budget.
//! - Strings are not unescaped; only the escape syntax is checked.

use arrayvec::ArrayVec;

use super::{MAX_TOKENS, Token, TokenKind};
use crate::ParserError;

const OPEN: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Value,
    ValueOrClose,
    Key,
    KeyOrClose,
    Colon,
    CommaOrClose,
    Done,
}

struct Tokenizer<'a, 'b> {
    buffer: &'a [u8],
    budget: usize,
    tokens: &'b mut ArrayVec<Token, MAX_TOKENS>,
    parent: Option<usize>,
    expect: Expect,
    pos: usize,
}

pub(super) fn tokenize(
    buffer: &[u8],
    budget: usize,
    tokens: &mut ArrayVec<Token, MAX_TOKENS>,
) -> Result<(), ParserError> {
    let mut tokenizer = Tokenizer {
        buffer,
        budget,
        tokens,
        parent: None,
        expect: Expect::Value,
        pos: 0,
    };
    tokenizer.run()
}

impl Tokenizer<'_, '_> {
    fn run(&mut self) -> Result<(), ParserError> {
        while let Some(&c) = self.buffer.get(self.pos) {
            match c {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                b'{' => self.open(TokenKind::Object)?,
                b'[' => self.open(TokenKind::Array)?,
                b'}' => self.close(TokenKind::Object)?,
                b']' => self.close(TokenKind::Array)?,
                b'"' => self.string()?,
                b':' => {
                    self.require(self.expect == Expect::Colon)?;
                    self.expect = Expect::Value;
                    self.pos += 1;
                }
                b',' => {
                    self.require(self.expect == Expect::CommaOrClose)?;
                    self.expect = match self.parent_kind() {
                        Some(TokenKind::Object) => Expect::Key,
                        _ => Expect::Value,
                    };
                    self.pos += 1;
                }
                b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => self.primitive()?,
                _ => return Err(ParserError::UnexpectedCharacters),
            }
        }

        if self.parent.is_some() {
            return Err(ParserError::IncompleteJson);
        }
        if self.tokens.is_empty() {
            return Err(ParserError::ZeroTokens);
        }
        Ok(())
    }

    fn require(&self, ok: bool) -> Result<(), ParserError> {
        if ok {
            Ok(())
        } else {
            Err(ParserError::UnexpectedCharacters)
        }
    }

    fn expects_value(&self) -> bool {
        matches!(self.expect, Expect::Value | Expect::ValueOrClose)
    }

    fn parent_kind(&self) -> Option<TokenKind> {
        self.parent.map(|p| self.tokens[p].kind)
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: u32) -> Result<usize, ParserError> {
        if self.tokens.len() >= self.budget {
            return Err(ParserError::TooManyTokens);
        }
        let start = u32::try_from(start).map_err(|_| ParserError::ValueOutOfRange)?;
        self.tokens
            .try_push(Token { kind, start, end })
            .map_err(|_| ParserError::TooManyTokens)?;
        Ok(self.tokens.len() - 1)
    }

    fn offset(pos: usize) -> Result<u32, ParserError> {
        u32::try_from(pos).map_err(|_| ParserError::ValueOutOfRange)
    }

    /// State after a complete value inside the current parent.
    fn value_done(&mut self) {
        self.expect = if self.parent.is_some() {
            Expect::CommaOrClose
        } else {
            Expect::Done
        };
    }

    fn open(&mut self, kind: TokenKind) -> Result<(), ParserError> {
        self.require(self.expects_value())?;
        let idx = self.push(kind, self.pos, OPEN)?;
        self.parent = Some(idx);
        self.expect = match kind {
            TokenKind::Object => Expect::KeyOrClose,
            _ => Expect::ValueOrClose,
        };
        self.pos += 1;
        Ok(())
    }

    fn close(&mut self, kind: TokenKind) -> Result<(), ParserError> {
        let parent = self.parent.ok_or(ParserError::UnexpectedCharacters)?;
        let ok_state = match kind {
            TokenKind::Object => matches!(self.expect, Expect::KeyOrClose | Expect::CommaOrClose),
            _ => matches!(self.expect, Expect::ValueOrClose | Expect::CommaOrClose),
        };
        self.require(ok_state && self.tokens[parent].kind == kind)?;

        self.pos += 1;
        self.tokens[parent].end = Self::offset(self.pos)?;
        self.parent = self.tokens[..parent]
            .iter()
            .rposition(|t| t.end == OPEN && !t.is_leaf());
        self.value_done();
        Ok(())
    }

    fn string(&mut self) -> Result<(), ParserError> {
        let is_key = matches!(self.expect, Expect::Key | Expect::KeyOrClose);
        self.require(is_key || self.expects_value())?;

        let start = self.pos + 1;
        let mut pos = start;
        loop {
            match self.buffer.get(pos) {
                None => return Err(ParserError::IncompleteJson),
                Some(b'"') => break,
                Some(b'\\') => {
                    pos += 1;
                    match self.buffer.get(pos) {
                        None => return Err(ParserError::IncompleteJson),
                        Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => pos += 1,
                        Some(b'u') => {
                            for _ in 0..4 {
                                pos += 1;
                                match self.buffer.get(pos) {
                                    None => return Err(ParserError::IncompleteJson),
                                    Some(h) if h.is_ascii_hexdigit() => {}
                                    Some(_) => return Err(ParserError::UnexpectedCharacters),
                                }
                            }
                            pos += 1;
                        }
                        Some(_) => return Err(ParserError::UnexpectedCharacters),
                    }
                }
                Some(_) => pos += 1,
            }
        }

        self.push(TokenKind::String, start, Self::offset(pos)?)?;
        self.pos = pos + 1;
        if is_key {
            self.expect = Expect::Colon;
        } else {
            self.value_done();
        }
        Ok(())
    }

    fn primitive(&mut self) -> Result<(), ParserError> {
        self.require(self.expects_value())?;

        let start = self.pos;
        let len = self.buffer[start..]
            .iter()
            .position(|c| matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b',' | b']' | b'}'))
            .unwrap_or(self.buffer.len() - start);
        let text = &self.buffer[start..start + len];
        if !is_literal(text) {
            return Err(ParserError::UnexpectedCharacters);
        }

        self.push(TokenKind::Primitive, start, Self::offset(start + len)?)?;
        self.pos = start + len;
        self.value_done();
        Ok(())
    }
}

/// `true`, `false`, `null`, or a number in JSON grammar.
fn is_literal(text: &[u8]) -> bool {
    if matches!(text, b"true" | b"false" | b"null") {
        return true;
    }

    let mut rest = text.strip_prefix(b"-").unwrap_or(text);
    rest = match rest {
        [b'0', tail @ ..] => tail,
        [b'1'..=b'9', ..] => skip_digits(rest),
        _ => return false,
    };
    if let Some(frac) = rest.strip_prefix(b".") {
        let after = skip_digits(frac);
        if after.len() == frac.len() {
            return false;
        }
        rest = after;
    }
    if let [b'e' | b'E', exp @ ..] = rest {
        let exp = exp
            .strip_prefix(b"+")
            .or_else(|| exp.strip_prefix(b"-"))
            .unwrap_or(exp);
        let after = skip_digits(exp);
        if after.len() == exp.len() {
            return false;
        }
        rest = after;
    }
    rest.is_empty()
}

fn skip_digits(text: &[u8]) -> &[u8] {
    let n = text.iter().take_while(|c| c.is_ascii_digit()).count();
    &text[n..]
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    use super::*;
    use crate::{ParserOptions, json::Document};

    fn tokenize_str(text: &str) -> Result<usize, ParserError> {
        Document::parse(text.as_bytes(), &ParserOptions::default()).map(|d| d.tokens().len())
    }

    #[rstest]
    #[case::object(r#"{"a":1,"b":[true,null,"x"]}"#, 8)]
    #[case::nested_empty("[[],{}]", 3)]
    #[case::scalar_root("-12.5e+3", 1)]
    #[case::string_root(r#""a\"bé""#, 1)]
    #[case::surrounding_whitespace(" \n{}\t", 1)]
    fn accepts(#[case] text: &str, #[case] count: usize) {
        assert_eq!(tokenize_str(text), Ok(count));
    }

    #[rstest]
    #[case::empty("", ParserError::ZeroTokens)]
    #[case::blank("  \n ", ParserError::ZeroTokens)]
    #[case::open_object(r#"{"a":"#, ParserError::IncompleteJson)]
    #[case::open_string(r#"{"a":"xy"#, ParserError::IncompleteJson)]
    #[case::open_escape(r#""\u00"#, ParserError::IncompleteJson)]
    #[case::trailing_comma("[1,]", ParserError::UnexpectedCharacters)]
    #[case::missing_colon(r#"{"a" 1}"#, ParserError::UnexpectedCharacters)]
    #[case::mismatched("[}", ParserError::UnexpectedCharacters)]
    #[case::bare_word("[nope]", ParserError::UnexpectedCharacters)]
    #[case::leading_zero("[01]", ParserError::UnexpectedCharacters)]
    #[case::second_root("{}{}", ParserError::UnexpectedCharacters)]
    #[case::trailing_garbage("{} x", ParserError::UnexpectedCharacters)]
    #[case::non_string_key("{1:2}", ParserError::UnexpectedCharacters)]
    #[case::bad_escape(r#""\q""#, ParserError::UnexpectedCharacters)]
    fn rejects(#[case] text: &str, #[case] err: ParserError) {
        assert_eq!(tokenize_str(text), Err(err));
    }

    #[test]
    fn token_budget() {
        let options = ParserOptions {
            max_tokens: 3,
            ..ParserOptions::default()
        };
        assert!(Document::parse(b"[1,2]", &options).is_ok());
        assert_eq!(
            Document::parse(b"[1,2,3]", &options).unwrap_err(),
            ParserError::TooManyTokens
        );
    }

    #[test]
    fn containers_close_in_place() {
        let doc = Document::parse(br#"{"a":[{"b":2}],"c":3}"#, &ParserOptions::default()).unwrap();
        let spans: std::vec::Vec<_> = doc
            .tokens()
            .iter()
            .map(|t| (t.kind, t.start, t.end))
            .collect();
        assert_eq!(
            spans,
            [
                (TokenKind::Object, 0, 21),
                (TokenKind::String, 2, 3),
                (TokenKind::Array, 5, 14),
                (TokenKind::Object, 6, 13),
                (TokenKind::String, 8, 9),
                (TokenKind::Primitive, 11, 12),
                (TokenKind::String, 16, 17),
                (TokenKind::Primitive, 19, 20),
            ]
        );
    }

    #[quickcheck]
    fn tokenizing_twice_is_identical(bytes: std::vec::Vec<u8>) -> bool {
        let options = ParserOptions::default();
        match (Document::parse(&bytes, &options), Document::parse(&bytes, &options)) {
            (Ok(a), Ok(b)) => a.tokens() == b.tokens(),
            (a, b) => a.err() == b.err(),
        }
    }
}
