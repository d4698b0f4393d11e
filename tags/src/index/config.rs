use crate::index::Weight;

/// Tuning for a [`TagIndex`](crate::TagIndex).
///
/// Sub-indices produced by selection inherit the configuration of the index they were selected
/// from.
///
/// ```ignore
/// let index = TagIndex::with_config(Config {
///     multiplier: 3,
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Multiplier used by positional queries that don't set their own. The first query tag weighs
    /// `tag_count * multiplier`.
    pub multiplier: Weight,

    /// How much less each following tag of a positional query weighs than the one before it.
    pub decay: Weight,

    /// Minimum number of vacant slots before a removal triggers automatic compaction.
    pub compact_threshold: usize,
}

impl Config {
    /// Default positional multiplier.
    pub const DEFAULT_MULTIPLIER: Weight = 2;

    /// Default positional decay step.
    pub const DEFAULT_DECAY: Weight = 2;

    /// Default vacant slot count that allows automatic compaction.
    pub const DEFAULT_COMPACT_THRESHOLD: usize = 64;

    /// The default configuration.
    pub const DEFAULT: Self = Self {
        multiplier: Self::DEFAULT_MULTIPLIER,
        decay: Self::DEFAULT_DECAY,
        compact_threshold: Self::DEFAULT_COMPACT_THRESHOLD,
    };

    /// Create the default configuration.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the default positional multiplier.
    #[inline]
    pub const fn with_multiplier(mut self, multiplier: Weight) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the positional decay step.
    #[inline]
    pub const fn with_decay(mut self, decay: Weight) -> Self {
        self.decay = decay;
        self
    }

    /// Set the vacant slot count that allows automatic compaction. `usize::MAX` disables it.
    #[inline]
    pub const fn with_compact_threshold(mut self, compact_threshold: usize) -> Self {
        self.compact_threshold = compact_threshold;
        self
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
