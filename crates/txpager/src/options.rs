use crate::{
    chain::{ChainRegistry, DEFAULT_CHAINS},
    json::MAX_TOKENS,
};

/// Upper bound for [`DisplayOptions::page_width`], and the capacity of a
/// rendered value page.
pub const MAX_PAGE_WIDTH: usize = 128;

/// Limits applied while turning raw bytes into a parsed transaction.
///
/// # Default
///
/// A 16 KiB buffer limit and the full [`MAX_TOKENS`] token budget.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Largest buffer accepted by [`crate::Transaction::parse`].
    ///
    /// Mirrors the size of the host's transaction buffer. Larger inputs are
    /// rejected before tokenizing.
    ///
    /// # Default
    ///
    /// `16384`
    pub max_buffer_len: usize,

    /// Token budget for JSON transactions.
    ///
    /// Values above [`MAX_TOKENS`] are clamped. Small devices run with `70`.
    ///
    /// # Default
    ///
    /// [`MAX_TOKENS`]
    pub max_tokens: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_buffer_len: 16 * 1024,
            max_tokens: MAX_TOKENS,
        }
    }
}

impl ParserOptions {
    pub(crate) fn token_budget(&self) -> usize {
        self.max_tokens.min(MAX_TOKENS)
    }
}

/// How items are rendered on the device screen.
#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions {
    /// Show every field and raw base-unit amounts.
    ///
    /// # Default
    ///
    /// `false`
    pub expert_mode: bool,

    /// Characters per value page. Clamped to `1..=MAX_PAGE_WIDTH`.
    ///
    /// # Default
    ///
    /// `40`
    pub page_width: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            expert_mode: false,
            page_width: 40,
        }
    }
}

impl DisplayOptions {
    pub(crate) fn width(&self) -> usize {
        self.page_width.clamp(1, MAX_PAGE_WIDTH)
    }
}

/// Everything item rendering depends on besides the transaction itself.
#[derive(Clone, Copy)]
pub struct DisplayContext<'c> {
    /// Rendering options.
    pub options: DisplayOptions,
    /// Chains whose base-unit amounts get converted for display.
    pub chains: &'c dyn ChainRegistry,
}

impl core::fmt::Debug for DisplayContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DisplayContext")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl DisplayContext<'static> {
    /// A context backed by the built-in chain table.
    #[must_use]
    pub fn new(options: DisplayOptions) -> Self {
        Self {
            options,
            chains: &DEFAULT_CHAINS,
        }
    }
}

impl Default for DisplayContext<'static> {
    fn default() -> Self {
        Self::new(DisplayOptions::default())
    }
}

impl<'c> DisplayContext<'c> {
    /// A context backed by a caller-provided chain registry.
    #[must_use]
    pub fn with_chains(options: DisplayOptions, chains: &'c dyn ChainRegistry) -> Self {
        Self { options, chains }
    }

    /// Same context with expert mode switched on or off.
    #[must_use]
    pub fn expert(mut self, expert_mode: bool) -> Self {
        self.options.expert_mode = expert_mode;
        self
    }
}
