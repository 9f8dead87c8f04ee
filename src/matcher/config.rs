//! Configuration of the signature matcher.

use crate::{
    disassembler::Opcode,
    matcher::{contains_overlapping, contains_run},
};

/// How a decoded sequence is searched for a signature.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MatchStrategy {
    /// Restart the count on every mismatch, see [`contains_run`]
    #[default]
    ResetOnMismatch,
    /// Find every occurrence including self-overlapping ones, see [`contains_overlapping`]
    Overlapping,
}

impl MatchStrategy {
    /// Searches `opcodes` for `signature` with this strategy
    pub fn contains<I>(self, opcodes: I, signature: &[Opcode]) -> bool
    where
        I: IntoIterator<Item = Opcode>,
    {
        match self {
            MatchStrategy::ResetOnMismatch => contains_run(opcodes, signature),
            MatchStrategy::Overlapping => contains_overlapping(opcodes, signature),
        }
    }
}

/// Configuration for [`crate::matcher::SignatureMatcher`].
///
/// # Examples
///
/// ```rust
/// use opscope::matcher::{MatchConfig, MatchStrategy};
///
/// let config = MatchConfig::new()
///     .strategy(MatchStrategy::Overlapping)
///     .use_index(true);
///
/// assert!(config.use_index);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchConfig {
    /// Search strategy (default: [`MatchStrategy::ResetOnMismatch`]).
    pub strategy: MatchStrategy,

    /// Decode the whole module once and search the cached opcodes instead of decoding every
    /// body on every search (default: false).
    pub use_index: bool,
}

impl MatchConfig {
    /// Creates the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search strategy
    #[must_use]
    pub fn strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enables or disables the module opcode index
    #[must_use]
    pub fn use_index(mut self, enabled: bool) -> Self {
        self.use_index = enabled;
        self
    }
}
