//! Block dispatcher.
//!
//! At every line start the dispatcher tries the block rules in priority order
//! (code block, quote, heading, thematic break) and falls back to a paragraph.
//! A rule either consumes whole lines or reports [`Scan::NoMatch`], in which
//! case the next rule is tried at the same offset.

use std::borrow::Cow;

use crate::ast::{Block, CodeBlock, CowStr, Document, Heading, Paragraph, Quote};
use crate::code_block::{self, FENCE};
use crate::error::ScanError;
use crate::lexer::{self, LineInfo};
use crate::scan::Scan;
use crate::span::Span;

/// Default limit on nested block quotes.
pub const DEFAULT_MAX_QUOTE_DEPTH: usize = 32;

/// Markdown block parser.
///
/// The parser holds only configuration; every call is independent, so one
/// parser can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parser {
    max_quote_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser with default settings.
    #[inline]
    pub fn new() -> Self {
        Self {
            max_quote_depth: DEFAULT_MAX_QUOTE_DEPTH,
        }
    }

    /// Limit how deeply block quotes nest.
    ///
    /// A `>` that would open a quote beyond the limit is read as paragraph
    /// text instead. This bounds recursion on hostile input.
    pub fn with_max_quote_depth(mut self, depth: usize) -> Self {
        self.max_quote_depth = depth;
        self
    }

    /// The configured quote nesting limit.
    #[inline]
    pub fn max_quote_depth(&self) -> usize {
        self.max_quote_depth
    }

    /// Parse a whole document.
    pub fn parse<'a>(&self, input: &'a str) -> Document<'a> {
        self.parse_span(input, Span::new(0, input.len()))
    }

    /// Parse the region `start..end` of `input`.
    ///
    /// Fails only when the region cannot be sliced out of the input.
    pub fn parse_region<'a>(
        &self,
        input: &'a str,
        start: usize,
        end: usize,
    ) -> Result<Document<'a>, ScanError> {
        let span = Span::checked(input, start, end)?;
        Ok(self.parse_span(input, span))
    }

    /// Run the code-block rule once at `start`, after validating the region.
    pub fn scan_code_block<'a>(
        &self,
        input: &'a str,
        start: usize,
        max_end: usize,
        quote_depth: usize,
    ) -> Result<Scan<CodeBlock<'a>>, ScanError> {
        Span::checked(input, start, max_end)?;
        Ok(code_block::parse_code_block(
            input,
            start,
            max_end,
            quote_depth,
        ))
    }

    fn parse_span<'a>(&self, input: &'a str, span: Span) -> Document<'a> {
        let (blocks, _) = self.parse_blocks(input, span.start, span.end, 0);
        log::debug!(
            "parsed {} top-level blocks from {}..{}",
            blocks.len(),
            span.start,
            span.end
        );
        Document { blocks, span }
    }

    /// Parse consecutive blocks in `start..end`, skipping blank lines.
    ///
    /// Also returns where parsing stopped. Inside a quote that is the first
    /// line without a `>` marker that no block took as a continuation.
    fn parse_blocks<'a>(
        &self,
        input: &'a str,
        start: usize,
        end: usize,
        quote_depth: usize,
    ) -> (Vec<Block<'a>>, usize) {
        let mut blocks = Vec::with_capacity(16);
        let mut pos = start;

        while pos < end {
            let Some(line) = lexer::lines(input, pos, end, quote_depth).next() else {
                break;
            };
            if line.is_blank() {
                pos = line.start_of_next_line;
                continue;
            }

            let (block, next) = self.parse_block(input, pos, end, quote_depth, &line);
            log::trace!("{:?} block at {}..{}", block.kind(), pos, next);
            debug_assert!(next > pos, "block rule made no progress at {pos}");
            blocks.push(block);
            pos = next;
        }

        (blocks, pos.min(end))
    }

    /// Try each rule at `pos`; the paragraph rule always matches.
    fn parse_block<'a>(
        &self,
        input: &'a str,
        pos: usize,
        end: usize,
        quote_depth: usize,
        line: &LineInfo,
    ) -> (Block<'a>, usize) {
        if let Some((code, next)) =
            code_block::parse_code_block(input, pos, end, quote_depth).into_option()
        {
            return (Block::CodeBlock(code), next);
        }

        match line.first_byte(input) {
            Some(b'>') if quote_depth < self.max_quote_depth => {
                return self.parse_quote(input, pos, end, quote_depth);
            }
            Some(b'>') => {
                log::warn!("quote nesting limit {} reached at {pos}", self.max_quote_depth);
            }
            Some(b'#') => {
                if let Some(heading) = parse_heading(input, line, pos) {
                    return (Block::Heading(heading), line.start_of_next_line);
                }
            }
            Some(b'*' | b'-' | b'_') if is_thematic_break(line.content(input)) => {
                return (
                    Block::ThematicBreak(Span::new(pos, line.start_of_next_line)),
                    line.start_of_next_line,
                );
            }
            _ => {}
        }

        self.parse_paragraph(input, pos, end, quote_depth)
    }

    fn parse_quote<'a>(
        &self,
        input: &'a str,
        pos: usize,
        end: usize,
        quote_depth: usize,
    ) -> (Block<'a>, usize) {
        let depth = quote_depth + 1;
        let mut quote_lines = lexer::lines(input, pos, end, depth);
        let first_end = quote_lines.next().map_or(end, |line| line.start_of_next_line);
        let region_end = quote_lines
            .last()
            .map_or(first_end, |line| line.start_of_next_line);

        // An unmarked line only continues a paragraph. When the child before
        // it is some other block, the quote ends and the line is left for the
        // enclosing level.
        let (blocks, consumed) = self.parse_blocks(input, pos, region_end, depth);
        let quote_end = consumed.max(first_end);
        log::debug!("quote at depth {depth} spans {pos}..{quote_end}");
        (
            Block::Quote(Quote {
                blocks,
                span: Span::new(pos, quote_end),
            }),
            quote_end,
        )
    }

    fn parse_paragraph<'a>(
        &self,
        input: &'a str,
        pos: usize,
        end: usize,
        quote_depth: usize,
    ) -> (Block<'a>, usize) {
        let mut text: Option<CowStr<'a>> = None;
        let mut next = pos;

        for line in lexer::lines(input, pos, end, quote_depth) {
            if line.is_blank()
                || (text.is_some() && self.interrupts_paragraph(input, &line, quote_depth))
            {
                break;
            }

            let content = line.content(input).trim_end();
            text = Some(match text {
                None => Cow::Borrowed(content),
                Some(prev) => {
                    let mut joined = prev.into_owned();
                    joined.push('\n');
                    joined.push_str(content);
                    Cow::Owned(joined)
                }
            });
            next = line.start_of_next_line;
        }

        // The first line is never blank, so at least one line was taken.
        let text = text.unwrap_or_default();
        (
            Block::Paragraph(Paragraph {
                text,
                span: Span::new(pos, next),
            }),
            next,
        )
    }

    /// Check if a line would start a block that ends the current paragraph.
    ///
    /// Indented lines never interrupt a paragraph.
    fn interrupts_paragraph(&self, input: &str, line: &LineInfo, quote_depth: usize) -> bool {
        if input.as_bytes()[line.start_of_line..line.end_of_line].starts_with(FENCE.as_bytes()) {
            return true;
        }
        match line.first_byte(input) {
            Some(b'>') => quote_depth < self.max_quote_depth,
            Some(b'#') => heading_level(line.content(input)).is_some(),
            Some(b'*' | b'-' | b'_') => is_thematic_break(line.content(input)),
            _ => false,
        }
    }
}

/// Level of an ATX heading opener (`#` to `######` followed by whitespace or
/// the end of the line).
fn heading_level(content: &str) -> Option<u8> {
    let level = content.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    match content.as_bytes().get(level) {
        None | Some(b' ' | b'\t') => Some(level as u8),
        _ => None,
    }
}

fn parse_heading<'a>(input: &'a str, line: &LineInfo, pos: usize) -> Option<Heading<'a>> {
    let content = line.content(input);
    let level = heading_level(content)?;
    let mut text = content[level as usize..].trim();

    // Optional closing sequence: `## Title ##`.
    let without_closing = text.trim_end_matches('#');
    if without_closing.is_empty() {
        text = without_closing;
    } else if without_closing.ends_with([' ', '\t']) {
        text = without_closing.trim_end();
    }

    Some(Heading {
        level,
        text: Cow::Borrowed(text),
        span: Span::new(pos, line.start_of_next_line),
    })
}

/// Three or more of the same `*`, `-` or `_`, optionally separated by
/// whitespace, and nothing else.
fn is_thematic_break(content: &str) -> bool {
    let mut marker = None;
    let mut count = 0;
    for b in content.bytes() {
        match b {
            b' ' | b'\t' => {}
            b'*' | b'-' | b'_' if marker.map_or(true, |m| m == b) => {
                marker = Some(b);
                count += 1;
            }
            _ => return false,
        }
    }
    count >= 3
}
