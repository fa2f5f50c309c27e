//! Outcome of a speculative block rule.

/// Result of trying one block rule at an offset.
///
/// `NoMatch` is the normal "try the next rule" answer, not a failure: the
/// caller retries at the same offset with another rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan<T> {
    /// The rule matched; `end` is the first byte after the consumed region.
    Matched { block: T, end: usize },
    /// The region at the offset does not start this kind of block.
    NoMatch,
}

impl<T> Scan<T> {
    /// Check if the rule matched.
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, Scan::Matched { .. })
    }

    /// End of the consumed region, or `start` when nothing was consumed.
    #[inline]
    pub fn actual_end(&self, start: usize) -> usize {
        match self {
            Scan::Matched { end, .. } => *end,
            Scan::NoMatch => start,
        }
    }

    /// Borrow the matched block, if any.
    #[inline]
    pub fn block(&self) -> Option<&T> {
        match self {
            Scan::Matched { block, .. } => Some(block),
            Scan::NoMatch => None,
        }
    }

    /// Convert into the block and its end offset.
    #[inline]
    pub fn into_option(self) -> Option<(T, usize)> {
        match self {
            Scan::Matched { block, end } => Some((block, end)),
            Scan::NoMatch => None,
        }
    }

    /// Transform the matched block, keeping the end offset.
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Scan<U> {
        match self {
            Scan::Matched { block, end } => Scan::Matched {
                block: f(block),
                end,
            },
            Scan::NoMatch => Scan::NoMatch,
        }
    }
}

impl<T> From<Scan<T>> for Option<(T, usize)> {
    fn from(scan: Scan<T>) -> Self {
        scan.into_option()
    }
}
