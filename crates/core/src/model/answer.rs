use std::fmt;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

const LABELS: [&str; OPTION_COUNT] = ["A", "B", "C", "D"];

/// Index of an answer option, guaranteed to be in `0..OPTION_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerIndex(u8);

impl AnswerIndex {
    /// Returns `None` when `value` does not address one of the four options.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        if usize::from(value) < OPTION_COUNT {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Same as [`AnswerIndex::new`] for indices coming from `usize` positions.
    #[must_use]
    pub fn from_usize(value: usize) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::new)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }

    /// Display label of the option (`A` through `D`).
    #[must_use]
    pub fn label(self) -> &'static str {
        LABELS[self.as_usize()]
    }

    /// All valid indices in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..OPTION_COUNT).filter_map(Self::from_usize)
    }
}

impl fmt::Display for AnswerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
