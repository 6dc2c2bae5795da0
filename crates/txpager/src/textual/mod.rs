//! Transactions pre-rendered by the signer as a CBOR array of screens.
//!
//! The host sends a definite-length array of 1 to 255 screen maps (see
//! [`screen`]). Parsing walks the whole array once to check its structure and
//! count expert screens; every later lookup walks it again, so nothing but the
//! buffer and two counters is kept.

use core::fmt;

use arrayvec::ArrayVec;
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_cbor::error::Category;

use crate::{
    DisplayContext, Item, ParserError, ParserOptions,
    format::{page_count, write_page},
};

pub mod screen;

use screen::{RawScreen, Screen, other_scalars, skip_map, skip_seq};

/// Most screens one transaction may carry.
pub const MAX_SCREENS: usize = 255;

/// Keys whose title and indent together exceed this are moved into the value.
pub const MAX_KEY_TITLE_LEN: usize = 17;
/// Same limit, for values spanning several pages.
pub const MAX_PAGINATED_KEY_TITLE_LEN: usize = 10;

const CHAIN_ID_TITLE: &str = "Chain id";
const REFUSED_CHAIN_IDS: [&str; 2] = ["0", "1"];

const SCREEN_TEXT_CAPACITY: usize = 4096;
type ScreenText = ArrayVec<u8, SCREEN_TEXT_CAPACITY>;

/// A parsed textual transaction.
#[derive(Debug, Clone)]
pub struct TextualTransaction<'a> {
    buffer: &'a [u8],
    screens: usize,
    expert_screens: usize,
    validated: bool,
}

impl<'a> TextualTransaction<'a> {
    /// Checks the structure of every screen in `buffer`.
    ///
    /// # Errors
    ///
    /// [`ParserError::BufferTooLarge`], the CBOR errors, and the screen rule
    /// violations described in [`screen`].
    pub fn parse(buffer: &'a [u8], options: &ParserOptions) -> Result<Self, ParserError> {
        if buffer.len() > options.max_buffer_len {
            return Err(ParserError::BufferTooLarge {
                len: buffer.len(),
                max: options.max_buffer_len,
            });
        }
        let outcome = walk(buffer, None)?;
        tracing::debug!(
            screens = outcome.screens,
            expert_screens = outcome.expert_screens,
            "decoded textual transaction"
        );
        Ok(Self {
            buffer,
            screens: outcome.screens,
            expert_screens: outcome.expert_screens,
            validated: false,
        })
    }

    /// Renders every page of every screen, in both display modes.
    ///
    /// # Errors
    ///
    /// The first rendering error, e.g. [`ParserError::UnexpectedChain`].
    pub fn validate(&mut self, ctx: &DisplayContext<'_>) -> Result<(), ParserError> {
        self.validated = false;
        for expert_mode in [false, true] {
            let ctx = ctx.expert(expert_mode);
            crate::transaction::render_all(self.visible(&ctx), |idx, page| self.render(&ctx, idx, page))?;
        }
        self.validated = true;
        Ok(())
    }

    /// Total screens, expert ones included.
    #[must_use]
    pub fn screen_count(&self) -> usize {
        self.screens
    }

    fn visible(&self, ctx: &DisplayContext<'_>) -> usize {
        if ctx.options.expert_mode {
            self.screens
        } else {
            self.screens - self.expert_screens
        }
    }

    /// Number of items under `ctx`.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] before a successful [`Self::validate`].
    pub fn num_items(&self, ctx: &DisplayContext<'_>) -> Result<usize, ParserError> {
        if !self.validated {
            return Err(ParserError::NoData);
        }
        Ok(self.visible(ctx))
    }

    /// Page `page` of item `idx`.
    ///
    /// # Errors
    ///
    /// [`ParserError::NoData`] before a successful [`Self::validate`],
    /// [`ParserError::DisplayIdxOutOfRange`], [`ParserError::DisplayPageOutOfRange`].
    pub fn get_item(&self, ctx: &DisplayContext<'_>, idx: usize, page: usize) -> Result<Item, ParserError> {
        if !self.validated {
            return Err(ParserError::NoData);
        }
        self.render(ctx, idx, page)
    }

    /// Screen `idx` among those visible in the given mode.
    ///
    /// # Errors
    ///
    /// [`ParserError::DisplayIdxOutOfRange`] past the last visible screen.
    pub fn screen(&self, idx: usize, expert_mode: bool) -> Result<Screen<'a>, ParserError> {
        walk(self.buffer, Some((idx, expert_mode)))?
            .found
            .ok_or(ParserError::DisplayIdxOutOfRange)
    }

    fn render(&self, ctx: &DisplayContext<'_>, idx: usize, page: usize) -> Result<Item, ParserError> {
        let screen = self.screen(idx, ctx.options.expert_mode)?;
        tracing::trace!(idx, indent = screen.indent, expert = screen.expert, "rendering screen");
        if screen.title == Some(CHAIN_ID_TITLE) && REFUSED_CHAIN_IDS.contains(&screen.content) {
            return Err(ParserError::UnexpectedChain);
        }
        render_screen(&screen, ctx.options.width(), page)
    }
}

/// Lays out one screen as an item page.
///
/// # Errors
///
/// [`ParserError::BufferOverflow`] if the key does not fit and
/// [`ParserError::DisplayPageOutOfRange`].
pub fn render_screen(screen: &Screen<'_>, width: usize, page: usize) -> Result<Item, ParserError> {
    let mut item = Item::default();
    let mut text = ScreenText::new();

    match screen.title {
        None => {
            item.push_key(b" ")?;
            push_indent(&mut text, screen.indent)?;
            translate(screen.content, &mut text)?;
        }
        Some(title) => {
            let mut content = ScreenText::new();
            translate(screen.content, &mut content)?;
            let title_len = usize::from(screen.indent) + title.len();
            let paginated = page_count(content.len(), width) > 1;

            push_indent(item.key_mut(), screen.indent)?;
            if title_len > MAX_KEY_TITLE_LEN || (paginated && title_len > MAX_PAGINATED_KEY_TITLE_LEN) {
                item.push_key(b"---")?;
                text.try_extend_from_slice(title.as_bytes())?;
                text.try_extend_from_slice(b": ")?;
                text.try_extend_from_slice(&content)?;
            } else {
                item.push_key(title.as_bytes())?;
                text = content;
            }
        }
    }

    let pages = write_page(&text, width, page, item.value_mut())?;
    item.set_page_count(pages);
    Ok(item)
}

fn push_indent<const N: usize>(out: &mut ArrayVec<u8, N>, indent: u8) -> Result<(), ParserError> {
    for _ in 0..indent {
        out.try_push(b'>')?;
    }
    Ok(())
}

/// Writes `text` as printable ASCII: printable characters pass through,
/// control characters become C escapes and anything else a `\u` or `\U`
/// escape of its code point.
///
/// # Errors
///
/// [`ParserError::BufferOverflow`] if `out` fills up.
pub fn translate<const N: usize>(text: &str, out: &mut ArrayVec<u8, N>) -> Result<(), ParserError> {
    for c in text.chars() {
        let escape: &[u8] = match c {
            ' '..='~' => {
                out.try_push(c as u8)?;
                continue;
            }
            '\x07' => b"\\a",
            '\x08' => b"\\b",
            '\x0c' => b"\\f",
            '\n' => b"\\n",
            '\r' => b"\\r",
            '\t' => b"\\t",
            '\x0b' => b"\\v",
            c if u32::from(c) <= 0xFFFF => {
                out.try_extend_from_slice(b"\\u")?;
                push_hex(out, u32::from(c), 4)?;
                continue;
            }
            c => {
                out.try_extend_from_slice(b"\\U")?;
                push_hex(out, u32::from(c), 8)?;
                continue;
            }
        };
        out.try_extend_from_slice(escape)?;
    }
    Ok(())
}

fn push_hex<const N: usize>(out: &mut ArrayVec<u8, N>, value: u32, digits: u32) -> Result<(), ParserError> {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for shift in (0..digits).rev() {
        out.try_push(HEX[((value >> (shift * 4)) & 0xF) as usize])?;
    }
    Ok(())
}

struct WalkOutcome<'a> {
    screens: usize,
    expert_screens: usize,
    found: Option<Screen<'a>>,
}

/// Walks the screen array, optionally picking the `n`-th screen visible in a
/// mode.
struct ScreenWalk {
    target: Option<(usize, bool)>,
}

fn walk(buffer: &[u8], target: Option<(usize, bool)>) -> Result<WalkOutcome<'_>, ParserError> {
    let mut scratch = [0u8; 0];
    let mut deserializer = serde_cbor::Deserializer::from_slice_with_scratch(buffer, &mut scratch);
    let outcome = ScreenWalk { target }
        .deserialize(&mut deserializer)
        .map_err(cbor_error)?;
    deserializer.end().map_err(|_| ParserError::CborUnexpectedEof)?;
    outcome
}

fn cbor_error(err: serde_cbor::Error) -> ParserError {
    match err.classify() {
        Category::Eof => ParserError::CborUnexpectedEof,
        Category::Data => ParserError::UnexpectedType,
        Category::Io | Category::Syntax => ParserError::CborUnexpected,
    }
}

impl<'de> DeserializeSeed<'de> for ScreenWalk {
    type Value = Result<WalkOutcome<'de>, ParserError>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ScreenWalk {
    type Value = Result<WalkOutcome<'de>, ParserError>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of screen maps")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut outcome = WalkOutcome {
            screens: 0,
            expert_screens: 0,
            found: None,
        };
        let mut visible = 0;
        let mut failure = None;

        while let Some(raw) = seq.next_element::<RawScreen<'de>>()? {
            outcome.screens += 1;
            if failure.is_some() {
                continue;
            }
            let screen = match Screen::try_from(raw) {
                Ok(screen) => screen,
                Err(e) => {
                    failure = Some(e);
                    continue;
                }
            };
            if screen.expert {
                outcome.expert_screens += 1;
            }
            if let Some((idx, expert_mode)) = self.target {
                if expert_mode || !screen.expert {
                    if visible == idx {
                        outcome.found = Some(screen);
                    }
                    visible += 1;
                }
            }
        }

        if outcome.screens == 0 || outcome.screens > MAX_SCREENS {
            return Ok(Err(ParserError::UnexpectedNumberItems));
        }
        Ok(failure.map_or(Ok(outcome), Err))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        skip_map(map)?;
        Ok(Err(ParserError::UnexpectedType))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Err(ParserError::UnexpectedType))
    }

    other_scalars!(Err(ParserError::UnexpectedType));
}

#[cfg(test)]
mod test {
    use super::*;

    fn screen(title: Option<&'static str>, content: &'static str, indent: u8) -> Screen<'static> {
        Screen {
            title,
            content,
            indent,
            expert: false,
        }
    }

    fn lines(screen: &Screen<'_>, width: usize) -> std::vec::Vec<std::string::String> {
        let first = render_screen(screen, width, 0).unwrap();
        (0..first.page_count())
            .map(|page| {
                let item = render_screen(screen, width, page).unwrap();
                std::format!("{} | {}", item.key(), item.value())
            })
            .collect()
    }

    #[test]
    fn translation() {
        let mut out = ArrayVec::<u8, 64>::new();
        translate("a\tb\n\u{7f}é⚛\u{1F600}", &mut out).unwrap();
        assert_eq!(
            core::str::from_utf8(&out),
            Ok("a\\tb\\n\\u007F\\u00E9\\u269B\\U0001F600")
        );
    }

    #[test]
    fn titled_screens() {
        assert_eq!(lines(&screen(Some("Fees"), "0.002 ATOM", 0), 40), ["Fees | 0.002 ATOM"]);
        assert_eq!(lines(&screen(Some("Amount"), "10 ATOM", 2), 40), [">>Amount | 10 ATOM"]);
    }

    #[test]
    fn untitled_screen_indents_the_value() {
        assert_eq!(lines(&screen(None, "End of Message", 1), 40), ["  | >End of Message"]);
    }

    #[test]
    fn long_titles_move_into_the_value() {
        assert_eq!(
            lines(&screen(Some("Hash of raw bytes"), "ab", 1), 40),
            [">--- | Hash of raw bytes: ab"]
        );
        // eleven bytes of key fit a single page value but not a paginated one
        assert_eq!(
            lines(&screen(Some("Recipients"), "abcdef", 1), 5),
            [">--- | Recip", ">--- | ients", ">--- | : abc", ">--- | def"]
        );
        assert_eq!(lines(&screen(Some("Recipients"), "abcde", 1), 5), [">Recipients | abcde"]);
        assert_eq!(lines(&screen(Some("Recipient"), "abcdef", 1), 5), [">Recipient | abcde", ">Recipient | f"]);
    }

    #[test]
    fn walk_errors() {
        assert_eq!(walk(&[], None).err(), Some(ParserError::CborUnexpectedEof));
        // an empty array
        assert_eq!(walk(&[0x80], None).err(), Some(ParserError::UnexpectedNumberItems));
        // an integer instead of an array
        assert_eq!(walk(&[0x01], None).err(), Some(ParserError::UnexpectedType));
        // [{2: "a"}] followed by a stray byte
        assert_eq!(
            walk(&[0x81, 0xa1, 0x02, 0x61, b'a', 0x00], None).err(),
            Some(ParserError::CborUnexpectedEof)
        );
        // array of two with one element
        assert_eq!(
            walk(&[0x82, 0xa1, 0x02, 0x61, b'a'], None).err(),
            Some(ParserError::CborUnexpectedEof)
        );
    }
}
