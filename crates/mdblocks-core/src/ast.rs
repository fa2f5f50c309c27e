//! Block types produced by the scanner.
//!
//! Text that can be sliced straight out of the input stays borrowed
//! (`Cow::Borrowed`); text the scanner had to rebuild (quote-stripped or
//! tab-expanded lines) is owned.

use std::borrow::Cow;
use std::fmt;

use crate::span::Span;

/// Copy-on-write string borrowed from the input where possible.
pub type CowStr<'a> = Cow<'a, str>;

/// A scanned document region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    /// Blocks in document order.
    pub blocks: Vec<Block<'a>>,
    /// The scanned region.
    pub span: Span,
}

impl<'a> Document<'a> {
    /// Every code block in document order, descending into quotes.
    pub fn code_blocks(&self) -> Vec<&CodeBlock<'a>> {
        let mut found = Vec::new();
        collect_code_blocks(&self.blocks, &mut found);
        found
    }
}

fn collect_code_blocks<'b, 'a>(blocks: &'b [Block<'a>], found: &mut Vec<&'b CodeBlock<'a>>) {
    for block in blocks {
        match block {
            Block::CodeBlock(code) => found.push(code),
            Block::Quote(quote) => collect_code_blocks(&quote.blocks, found),
            _ => {}
        }
    }
}

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// ATX heading (`#` to `######`).
    Heading(Heading<'a>),
    /// Run of text lines.
    Paragraph(Paragraph<'a>),
    /// Fenced or indented code.
    CodeBlock(CodeBlock<'a>),
    /// Block quote holding nested blocks.
    Quote(Quote<'a>),
    /// Horizontal rule.
    ThematicBreak(Span),
}

/// Discriminant of a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    Paragraph,
    Code,
    Quote,
    ThematicBreak,
}

impl Block<'_> {
    /// The kind of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading(_) => BlockKind::Heading,
            Block::Paragraph(_) => BlockKind::Paragraph,
            Block::CodeBlock(_) => BlockKind::Code,
            Block::Quote(_) => BlockKind::Quote,
            Block::ThematicBreak(_) => BlockKind::ThematicBreak,
        }
    }

    /// The source region this block consumed.
    pub fn span(&self) -> Span {
        match self {
            Block::Heading(h) => h.span,
            Block::Paragraph(p) => p.span,
            Block::CodeBlock(c) => c.span,
            Block::Quote(q) => q.span,
            Block::ThematicBreak(span) => *span,
        }
    }
}

/// Section heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading<'a> {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text, closing `#` run removed.
    pub text: CowStr<'a>,
    /// Source span.
    pub span: Span,
}

/// Paragraph text, one source line per `\n`-separated line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph<'a> {
    pub text: CowStr<'a>,
    pub span: Span,
}

/// A block of text displayed in a fixed-width font.
///
/// Inline markup and escapes are not interpreted inside code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    /// The code, with indentation removed, tabs expanded and surrounding
    /// blank lines trimmed. Lines are separated by `\n`.
    pub text: String,
    /// Language named after the opening fence (e.g. "rust" for ```` ```rust ````).
    ///
    /// Indented blocks and bare fences have no language.
    pub language: Option<CowStr<'a>>,
    /// Source span, closing fence included.
    pub span: Span,
}

impl fmt::Display for CodeBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Block quotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote<'a> {
    /// Blocks inside the quote, scanned one nesting level deeper.
    pub blocks: Vec<Block<'a>>,
    pub span: Span,
}
