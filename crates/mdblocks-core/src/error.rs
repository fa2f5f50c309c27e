//! Errors for the checked entry points.
//!
//! Scanning itself never fails: a region that does not start a block is a
//! [`Scan::NoMatch`](crate::scan::Scan::NoMatch), not an error. The only
//! errors are regions a caller hands in that cannot be sliced.

use thiserror::Error;

/// A caller-supplied region that cannot be scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    /// `start` lies past `end`.
    #[error("invalid region: start {start} is past end {end}")]
    InvertedRange { start: usize, end: usize },
    /// An offset lies past the end of the input.
    #[error("offset {offset} is out of bounds for input of {len} bytes")]
    OutOfBounds { offset: usize, len: usize },
    /// An offset splits a multi-byte character.
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

impl ScanError {
    /// The offending byte offset.
    pub fn offset(&self) -> usize {
        match *self {
            ScanError::InvertedRange { start, .. } => start,
            ScanError::OutOfBounds { offset, .. } => offset,
            ScanError::NotCharBoundary { offset } => offset,
        }
    }
}
