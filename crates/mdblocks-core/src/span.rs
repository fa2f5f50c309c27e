//! Source location tracking for blocks.
//!
//! Every block carries a `Span` covering the bytes it consumed, so callers can
//! advance past it or map it back to the source.

use crate::error::ScanError;

/// A byte range in the source text, `[start, end)`.
///
/// Spans use byte offsets into UTF-8 text. The scanner only ever splits at
/// ASCII delimiters, so spans it produces always fall on char boundaries.
///
/// # Example
///
/// ```rust
/// use mdblocks_core::span::Span;
///
/// let span = Span::new(0, 10);
/// assert_eq!(span.len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Starting byte offset (inclusive).
    pub start: usize,
    /// Ending byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span from byte offsets.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Validate a caller-supplied region of `input`.
    ///
    /// Both offsets must lie within the input, on char boundaries, and
    /// `start` must not be past `end`.
    ///
    /// ```rust
    /// use mdblocks_core::span::Span;
    ///
    /// assert!(Span::checked("abc", 1, 3).is_ok());
    /// assert!(Span::checked("abc", 2, 1).is_err());
    /// ```
    pub fn checked(input: &str, start: usize, end: usize) -> Result<Self, ScanError> {
        for offset in [start, end] {
            if offset > input.len() {
                return Err(ScanError::OutOfBounds {
                    offset,
                    len: input.len(),
                });
            }
            if !input.is_char_boundary(offset) {
                return Err(ScanError::NotCharBoundary { offset });
            }
        }
        if start > end {
            return Err(ScanError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Get the length of this span in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this span contains a byte offset.
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Borrow the covered text from `input`.
    #[inline]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start..self.end]
    }
}
