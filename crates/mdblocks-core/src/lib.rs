//! # mdblocks Core
//!
//! A forward-only Markdown block scanner.
//!
//! The scanner walks a region of a document line by line and segments it into
//! typed blocks: fenced and indented code, block quotes, headings, thematic
//! breaks and paragraphs. Block text is delivered raw; inline markup is left
//! to the consumer.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdblocks_core::{Block, Parser};
//!
//! let input = "# Hello\n\n    let x = 1;\n\n> quoted";
//! let doc = Parser::new().parse(input);
//!
//! assert_eq!(doc.blocks.len(), 3);
//! assert!(matches!(doc.blocks[1], Block::CodeBlock(_)));
//! ```
//!
//! ## Single rules
//!
//! Block rules are speculative: they either match and report where the block
//! ends, or answer [`Scan::NoMatch`] so the caller can try another rule at the
//! same offset.
//!
//! ```rust
//! use mdblocks_core::{parse_code_block, Scan};
//!
//! let input = "> ```\n> foo\n> ```\nafter";
//! let scan = parse_code_block(input, 0, input.len(), 1);
//! assert_eq!(scan.block().map(|b| b.text.as_str()), Some("foo"));
//! assert_eq!(scan.actual_end(0), 18);
//!
//! assert_eq!(parse_code_block("plain text", 0, 10, 0), Scan::NoMatch);
//! ```

pub mod ast;
pub mod code_block;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod scan;
pub mod span;

pub use ast::{Block, BlockKind, CodeBlock, Document};
pub use code_block::parse_code_block;
pub use error::ScanError;
pub use parser::Parser;
pub use scan::Scan;
