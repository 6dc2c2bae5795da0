//! Decoding of one screen map.
//!
//! A screen is a CBOR map with small unsigned integer keys:
//!
//! | key | field   | kind          |
//! |-----|---------|---------------|
//! | 1   | title   | text, ≤ 40 B  |
//! | 2   | content | text, ≤ 600 B |
//! | 3   | indent  | uint ≤ 61     |
//! | 4   | expert  | bool          |
//!
//! Only `content` is required. Keys appear in strictly ascending order.
//!
//! Maps are first collected into a [`RawScreen`] without judging them, so the
//! surrounding array is always consumed in full; [`Screen::try_from`] then
//! applies the rules and reports typed errors.

use core::fmt;

use arrayvec::ArrayVec;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::{ParserError, path::KEY_CAPACITY};

/// Longest accepted title, in bytes.
pub const MAX_TITLE_LEN: usize = 40;
/// Longest accepted content, in bytes.
pub const MAX_CONTENT_LEN: usize = 600;
/// Deepest accepted indent. A truncated key is `>` × indent followed by
/// `---`, and it must fit an item key.
pub const MAX_INDENT: usize = KEY_CAPACITY - 3;

const TITLE: u64 = 1;
const CONTENT: u64 = 2;
const INDENT: u64 = 3;
const EXPERT: u64 = 4;
const MAX_FIELDS: usize = 4;

/// A decoded screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen<'a> {
    /// Label shown as the item key.
    pub title: Option<&'a str>,
    /// Text shown as the item value.
    pub content: &'a str,
    /// Nesting depth, rendered as a `>` prefix.
    pub indent: u8,
    /// Shown in expert mode only.
    pub expert: bool,
}

/// Generates visitor methods mapping every scalar kind except unsigned
/// integers to one value.
macro_rules! other_scalars {
    ($value:expr) => {
        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok($value)
        }
        fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
            Ok($value)
        }
        fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
            Ok($value)
        }
        fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
            Ok($value)
        }
        fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<Self::Value, E> {
            Ok($value)
        }
        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok($value)
        }
        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok($value)
        }
    };
}
pub(super) use other_scalars;

pub(super) fn skip_seq<'de, A: SeqAccess<'de>>(mut seq: A) -> Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

pub(super) fn skip_map<'de, A: MapAccess<'de>>(mut map: A) -> Result<(), A::Error> {
    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(())
}

/// A field value before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldValue<'a> {
    Text(&'a str),
    Uint(u64),
    Bool(bool),
    Other,
}

impl<'de> Deserialize<'de> for FieldValue<'de> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldVisitor;

        impl<'de> Visitor<'de> for FieldVisitor {
            type Value = FieldValue<'de>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a screen field value")
            }

            fn visit_borrowed_str<E: de::Error>(self, v: &'de str) -> Result<Self::Value, E> {
                Ok(FieldValue::Text(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FieldValue::Uint(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(FieldValue::Bool(v))
            }

            // text that could not be borrowed (indefinite length) lands here
            fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
                Ok(FieldValue::Other)
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
                Ok(FieldValue::Other)
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
                Ok(FieldValue::Other)
            }

            fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<Self::Value, E> {
                Ok(FieldValue::Other)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FieldValue::Other)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FieldValue::Other)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
                skip_seq(seq)?;
                Ok(FieldValue::Other)
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                skip_map(map)?;
                Ok(FieldValue::Other)
            }
        }

        deserializer.deserialize_any(FieldVisitor)
    }
}

/// A map key: `None` for anything but an unsigned integer.
struct FieldKey(Option<u64>);

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = FieldKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a screen field key")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FieldKey(Some(v)))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
                skip_seq(seq)?;
                Ok(FieldKey(None))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                skip_map(map)?;
                Ok(FieldKey(None))
            }

            other_scalars!(FieldKey(None));
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

/// One array entry as read from the wire.
#[derive(Debug, Default)]
pub(super) struct RawScreen<'a> {
    fields: ArrayVec<(u64, FieldValue<'a>), MAX_FIELDS>,
    too_many: bool,
    bad_key: bool,
    not_a_map: bool,
}

impl<'de> Deserialize<'de> for RawScreen<'de> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawVisitor;

        impl<'de> Visitor<'de> for RawVisitor {
            type Value = RawScreen<'de>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a screen map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut raw = RawScreen::default();
                while let Some(FieldKey(key)) = map.next_key()? {
                    let value = map.next_value::<FieldValue<'de>>()?;
                    let Some(key) = key else {
                        raw.bad_key = true;
                        continue;
                    };
                    if raw.fields.try_push((key, value)).is_err() {
                        raw.too_many = true;
                    }
                }
                Ok(raw)
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
                Ok(RawScreen::not_a_map())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
                skip_seq(seq)?;
                Ok(RawScreen::not_a_map())
            }

            other_scalars!(RawScreen::not_a_map());
        }

        deserializer.deserialize_any(RawVisitor)
    }
}

impl RawScreen<'_> {
    fn not_a_map() -> Self {
        Self {
            not_a_map: true,
            ..Self::default()
        }
    }
}

fn text(value: FieldValue<'_>, max_len: usize) -> Result<&str, ParserError> {
    match value {
        FieldValue::Text(s) if s.len() <= max_len => Ok(s),
        FieldValue::Text(_) => Err(ParserError::UnexpectedValue),
        _ => Err(ParserError::UnexpectedType),
    }
}

impl<'a> TryFrom<RawScreen<'a>> for Screen<'a> {
    type Error = ParserError;

    fn try_from(raw: RawScreen<'a>) -> Result<Self, ParserError> {
        if raw.not_a_map {
            return Err(ParserError::UnexpectedType);
        }
        if raw.bad_key {
            return Err(ParserError::UnexpectedField);
        }
        if raw.too_many || raw.fields.is_empty() {
            return Err(ParserError::UnexpectedNumberItems);
        }
        if raw.fields.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(ParserError::CborNotCanonical);
        }

        let mut fields = raw.fields.into_iter().peekable();
        let title = match fields.next_if(|(key, _)| *key == TITLE) {
            Some((_, value)) => Some(text(value, MAX_TITLE_LEN)?),
            None => None,
        };
        let content = match fields.next() {
            Some((CONTENT, value)) => text(value, MAX_CONTENT_LEN)?,
            _ => return Err(ParserError::UnexpectedField),
        };

        let mut screen = Screen {
            title,
            content,
            indent: 0,
            expert: false,
        };
        for (key, value) in fields {
            match (key, value) {
                (INDENT, FieldValue::Uint(n)) => {
                    screen.indent = u8::try_from(n)
                        .ok()
                        .filter(|&indent| usize::from(indent) <= MAX_INDENT)
                        .ok_or(ParserError::ValueOutOfRange)?;
                }
                (EXPERT, FieldValue::Bool(b)) => screen.expert = b,
                (INDENT | EXPERT, _) => return Err(ParserError::UnexpectedType),
                _ => return Err(ParserError::UnexpectedField),
            }
        }
        Ok(screen)
    }
}
