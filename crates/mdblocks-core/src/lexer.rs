//! Quote-aware line iteration shared by every block rule.
//!
//! [`lines`] walks a region of the input one line at a time, stripping the
//! `>` markers of the enclosing block quotes before reporting where the line
//! content starts. Block rules never see quote markers of their own nesting
//! level.
//!
//! # Performance
//!
//! - Zero-copy: descriptors are plain offsets into the input
//! - SIMD-accelerated terminator scanning via `memchr2`
//! - Lazy: a rule that stops early never scans the rest of the region

use std::iter::FusedIterator;

use memchr::memchr2;

/// Boundaries of one logical line, after quote markers were stripped.
///
/// All offsets are byte offsets into the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// First byte of the line content, after the enclosing quote markers.
    pub start_of_line: usize,
    /// First byte that is not a space or tab, or `end_of_line` if none.
    pub first_non_whitespace: usize,
    /// End of the line content (exclusive, before the terminator).
    pub end_of_line: usize,
    /// First byte of the following line, past the terminator.
    pub start_of_next_line: usize,
}

impl LineInfo {
    /// Check if the line holds nothing but spaces and tabs.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.first_non_whitespace == self.end_of_line
    }

    /// The line content, quote markers excluded.
    #[inline(always)]
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start_of_line..self.end_of_line]
    }

    /// The line content from its first non-whitespace byte.
    #[inline(always)]
    pub fn content<'a>(&self, input: &'a str) -> &'a str {
        &input[self.first_non_whitespace..self.end_of_line]
    }

    /// The first non-whitespace byte, if the line is not blank.
    #[inline(always)]
    pub fn first_byte(&self, input: &str) -> Option<u8> {
        if self.is_blank() {
            None
        } else {
            Some(input.as_bytes()[self.first_non_whitespace])
        }
    }
}

/// Iterate over the lines of `input[start..end]` at the given quote depth.
///
/// Each line has up to `quote_depth` `>` markers skipped, together with any
/// whitespace before a marker and a single space after it. A line with fewer
/// markers than required is still yielded when it is blank or continues the
/// previous non-blank line; otherwise the quote has ended and so does the
/// iteration.
///
/// # Example
///
/// ```rust
/// use mdblocks_core::lexer::lines;
///
/// let input = "> a\n> b\nc";
/// let texts: Vec<_> = lines(input, 0, input.len(), 1)
///     .map(|line| line.text(input))
///     .collect();
/// assert_eq!(texts, ["a", "b", "c"]);
/// ```
pub fn lines(input: &str, start: usize, end: usize, quote_depth: usize) -> Lines<'_> {
    Lines {
        bytes: input.as_bytes(),
        pos: start,
        end,
        quote_depth,
        starts_new_paragraph: true,
        finished: false,
    }
}

/// Lazy iterator returned by [`lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    quote_depth: usize,
    starts_new_paragraph: bool,
    finished: bool,
}

impl<'a> Lines<'a> {
    /// Get the offset of the next line to be read.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Skip spaces and tabs from `pos`, returning where they stop and the
    /// byte found there (`None` at a terminator or the region end).
    #[inline(always)]
    fn skip_whitespace(&self, mut pos: usize) -> (usize, Option<u8>) {
        while pos < self.end {
            match self.bytes[pos] {
                b'\r' | b'\n' => return (pos, None),
                b' ' | b'\t' => pos += 1,
                b => return (pos, Some(b)),
            }
        }
        (pos, None)
    }
}

impl Iterator for Lines<'_> {
    type Item = LineInfo;

    fn next(&mut self) -> Option<LineInfo> {
        if self.finished || self.pos >= self.end {
            return None;
        }

        let mut start_of_line = self.pos;
        let (mut non_space, mut non_space_byte) = self.skip_whitespace(self.pos);
        let mut markers_left = self.quote_depth;

        while markers_left > 0 {
            if non_space_byte == Some(b'>') {
                markers_left -= 1;
                non_space += 1;
                start_of_line = non_space;
                if start_of_line < self.end && self.bytes[start_of_line] == b' ' {
                    start_of_line += 1;
                }
                (non_space, non_space_byte) = self.skip_whitespace(start_of_line);
            } else if !self.starts_new_paragraph || non_space_byte.is_none() {
                // Lazy continuation, or a blank line inside the quote.
                break;
            } else {
                self.finished = true;
                return None;
            }
        }

        let (end_of_line, start_of_next_line) = find_line_end(self.bytes, non_space, self.end);
        self.starts_new_paragraph = non_space_byte.is_none();
        self.pos = start_of_next_line;

        Some(LineInfo {
            start_of_line,
            first_non_whitespace: non_space,
            end_of_line,
            start_of_next_line,
        })
    }
}

impl FusedIterator for Lines<'_> {}

/// Find the terminator at or after `from`, returning the end of the line
/// content and the start of the next line.
///
/// `\n`, `\r` and `\r\n` all end a line. Without a terminator the line runs
/// to `end`.
#[inline]
pub fn find_line_end(bytes: &[u8], from: usize, end: usize) -> (usize, usize) {
    match memchr2(b'\r', b'\n', &bytes[from..end]) {
        Some(offset) => {
            let terminator = from + offset;
            let mut next = terminator + 1;
            if bytes[terminator] == b'\r' && next < end && bytes[next] == b'\n' {
                next += 1;
            }
            (terminator, next)
        }
        None => (end, end),
    }
}
