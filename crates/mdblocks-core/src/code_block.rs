//! Fenced and indented code blocks.
//!
//! Two forms are recognised, and a single block never mixes them:
//!
//! - **Fenced**: an opening line starting with ```` ``` ````, optionally
//!   followed by a language name, then body lines up to a closing
//!   ```` ``` ```` line or the end of the region.
//! - **Indented**: lines starting with a tab, or with leading whitespace worth
//!   at least four spaces (a tab counts as four). Blank lines in between are
//!   kept as empty lines.
//!
//! The scanner is a two-state machine:
//!
//! | state         | line                              | action                              |
//! |---------------|-----------------------------------|-------------------------------------|
//! | `Outside`     | fence, no indented content yet    | capture language, enter `InsideFence` |
//! | `Outside`     | fence after indented content      | stop before the line                |
//! | `Outside`     | indented                          | append de-indented content          |
//! | `Outside`     | blank                             | append empty line                   |
//! | `Outside`     | anything else                     | stop before the line                |
//! | `InsideFence` | fence                             | consume the line, stop              |
//! | `InsideFence` | blank                             | append empty line                   |
//! | `InsideFence` | anything else                     | append the line as is               |

use std::borrow::Cow;

use crate::ast::CodeBlock;
use crate::lexer::{self, LineInfo};
use crate::scan::Scan;
use crate::span::Span;

/// Marker that opens and closes a fenced block.
pub const FENCE: &str = "```";

/// Columns per tab stop, and the indentation that makes a line code.
pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InsideFence,
}

/// Parse a code block starting at `start`.
///
/// `max_end` bounds the scan (exclusive) and `quote_depth` is the number of
/// enclosing `>` markers to strip from every line. Returns the block and the
/// offset just past it, or [`Scan::NoMatch`] when the region does not start
/// a code block.
///
/// An unterminated fence runs to the end of the region. A block needs at
/// least one body line: an opening fence immediately closed (or immediately
/// followed by the region end) is not a code block, and neither is a run of
/// blank lines.
///
/// # Example
///
/// ```rust
/// use mdblocks_core::code_block::parse_code_block;
///
/// let input = "```python\nprint(1)\n```";
/// let (block, end) = parse_code_block(input, 0, input.len(), 0).into_option().unwrap();
/// assert_eq!(block.text, "print(1)");
/// assert_eq!(block.language.as_deref(), Some("python"));
/// assert_eq!(end, input.len());
/// ```
pub fn parse_code_block(
    markdown: &str,
    start: usize,
    max_end: usize,
    quote_depth: usize,
) -> Scan<CodeBlock<'_>> {
    debug_assert!(
        start <= max_end && max_end <= markdown.len(),
        "region {start}..{max_end} outside input of {} bytes",
        markdown.len()
    );
    let max_end = max_end.min(markdown.len());
    if start >= max_end || !markdown.is_char_boundary(start) || !markdown.is_char_boundary(max_end)
    {
        return Scan::NoMatch;
    }

    let bytes = markdown.as_bytes();
    let mut state = State::Outside;
    let mut body = Body::default();
    let mut language = None;
    let mut has_body = false;
    let mut indented = false;
    let mut end = start;

    for line in lexer::lines(markdown, start, max_end, quote_depth) {
        let fence = is_fence(bytes, &line);

        match state {
            State::Outside if fence => {
                if indented {
                    break;
                }
                let tag = markdown[line.start_of_line + FENCE.len()..line.end_of_line].trim();
                language = (!tag.is_empty()).then_some(Cow::Borrowed(tag));
                state = State::InsideFence;
            }
            State::Outside => {
                if line.is_blank() {
                    body.push_blank();
                } else {
                    match indented_content_start(bytes, &line) {
                        Some(content) => {
                            body.push_line(&markdown[content..line.end_of_line]);
                            indented = true;
                            has_body = true;
                        }
                        None => break,
                    }
                }
            }
            State::InsideFence if fence => {
                end = line.start_of_next_line;
                state = State::Outside;
                break;
            }
            State::InsideFence => {
                if line.is_blank() {
                    body.push_blank();
                } else {
                    body.push_line(line.text(markdown));
                }
                has_body = true;
            }
        }

        end = line.start_of_next_line;
    }

    if !has_body {
        return Scan::NoMatch;
    }
    if state == State::InsideFence {
        log::trace!("unterminated fence at {start}, consumed to {end}");
    }

    Scan::Matched {
        block: CodeBlock {
            text: body.finish(),
            language,
            span: Span::new(start, end),
        },
        end,
    }
}

/// Check if a line starts with a fence marker.
#[inline]
fn is_fence(bytes: &[u8], line: &LineInfo) -> bool {
    bytes[line.start_of_line..line.end_of_line].starts_with(FENCE.as_bytes())
}

/// Where the code starts on an indented line, or `None` if the line is not
/// indented enough.
///
/// A leading tab is always enough. Otherwise spaces count one column and tabs
/// four, and the scan stops once four columns are reached.
fn indented_content_start(bytes: &[u8], line: &LineInfo) -> Option<usize> {
    let mut pos = line.start_of_line;
    if bytes.get(pos) == Some(&b'\t') {
        return Some(pos + 1);
    }

    let mut width = 0;
    while pos < line.end_of_line && width < TAB_WIDTH {
        match bytes[pos] {
            b' ' => width += 1,
            b'\t' => width += TAB_WIDTH,
            _ => break,
        }
        pos += 1;
    }

    (width >= TAB_WIDTH).then_some(pos)
}

/// Accumulated code text.
#[derive(Debug, Default)]
struct Body {
    text: String,
    lines: usize,
}

impl Body {
    fn begin_line(&mut self) {
        if self.lines > 0 {
            self.text.push('\n');
        }
        self.lines += 1;
    }

    fn push_blank(&mut self) {
        self.begin_line();
    }

    /// Append a line, expanding tabs to the next multiple of [`TAB_WIDTH`]
    /// columns counted from the start of this line.
    fn push_line(&mut self, line: &str) {
        self.begin_line();
        let mut column = 0;
        for c in line.chars() {
            if c == '\t' {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                self.text.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            } else {
                self.text.push(c);
                column += 1;
            }
        }
    }

    /// The text with leading and trailing empty lines removed.
    fn finish(mut self) -> String {
        let trimmed_end = self.text.trim_end_matches('\n').len();
        self.text.truncate(trimmed_end);
        let leading = self.text.len() - self.text.trim_start_matches('\n').len();
        self.text.drain(..leading);
        self.text
    }
}
