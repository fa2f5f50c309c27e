//! mdblocks CLI - Scan Markdown documents into blocks
//!
//! Usage:
//!   mdblocks [OPTIONS] <COMMAND> <FILE>
//!
//! Commands:
//!   parse     Parse and display the block structure
//!   scan      Run the code-block rule once at an offset
//!   code      Extract code blocks
//!   stats     Show document statistics

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser as ClapParser, Subcommand};
use mdblocks_core::parser::DEFAULT_MAX_QUOTE_DEPTH;
use mdblocks_core::{Block, CodeBlock, Document, Parser, Scan};
use serde::Serialize;

#[derive(ClapParser, Debug)]
#[command(name = "mdblocks")]
#[command(about = "Scan Markdown documents into typed blocks")]
#[command(version)]
struct Cli {
    /// Deepest block-quote nesting to interpret
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_QUOTE_DEPTH)]
    max_quote_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and display the block structure
    Parse {
        #[command(flatten)]
        input: InputArgs,
        /// Show block contents
        #[arg(short, long)]
        verbose: bool,
    },
    /// Run the code-block rule once at an offset
    Scan {
        #[command(flatten)]
        input: InputArgs,
        /// Byte offset to scan from
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Exclusive byte offset to stop at (defaults to the end of input)
        #[arg(long)]
        end: Option<usize>,
        /// Number of enclosing `>` markers to strip
        #[arg(long, default_value_t = 0)]
        quote_depth: usize,
    },
    /// Extract code blocks
    Code {
        #[command(flatten)]
        input: InputArgs,
        /// Only blocks fenced with this language
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Show document statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Markdown file to read, or `-` for standard input
    file: PathBuf,
    /// Output in JSON format
    #[arg(short, long)]
    json: bool,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let parser = Parser::new().with_max_quote_depth(cli.max_quote_depth);

    match cli.command {
        Command::Parse { input, verbose } => {
            let text = read_input(&input.file)?;
            cmd_parse(&parser, &text, input.json, verbose)
        }
        Command::Scan {
            input,
            start,
            end,
            quote_depth,
        } => {
            let text = read_input(&input.file)?;
            let end = end.unwrap_or(text.len());
            cmd_scan(&parser, &text, start, end, quote_depth, input.json)
        }
        Command::Code { input, lang } => {
            let text = read_input(&input.file)?;
            cmd_code(&parser, &text, lang.as_deref(), input.json)
        }
        Command::Stats { input } => {
            let text = read_input(&input.file)?;
            cmd_stats(&parser, &text, input.json)
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        return Ok(text);
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    log::debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(parser: &Parser, input: &str, json: bool, verbose: bool) -> Result<()> {
    let doc = parser.parse(input);

    if json {
        print_json(&convert_document(&doc))
    } else {
        print_document(&doc, verbose);
        Ok(())
    }
}

// =============================================================================
// Scan Command
// =============================================================================

fn cmd_scan(
    parser: &Parser,
    input: &str,
    start: usize,
    end: usize,
    quote_depth: usize,
    json: bool,
) -> Result<()> {
    let scan = parser
        .scan_code_block(input, start, end, quote_depth)
        .with_context(|| format!("cannot scan {}..{}", start, end))?;

    if json {
        let result = JsonScan {
            matched: scan.is_match(),
            end: scan.actual_end(start),
            block: scan.block().map(convert_code_block),
        };
        return print_json(&result);
    }

    match scan {
        Scan::Matched { block, end } => {
            println!("{}", describe_code_block(&block));
            println!("End: {}", end);
            println!("{}", block.text);
        }
        Scan::NoMatch => println!("no match at {}", start),
    }
    Ok(())
}

// =============================================================================
// Code Command
// =============================================================================

fn cmd_code(parser: &Parser, input: &str, lang: Option<&str>, json: bool) -> Result<()> {
    let doc = parser.parse(input);
    let blocks: Vec<&CodeBlock> = doc
        .code_blocks()
        .into_iter()
        .filter(|code| lang.map_or(true, |l| code.language.as_deref() == Some(l)))
        .collect();

    if json {
        let blocks: Vec<_> = blocks.into_iter().map(convert_code_block).collect();
        return print_json(&blocks);
    }

    for (i, code) in blocks.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("--- [{}] {}", i + 1, describe_code_block(code));
        println!("{}", code.text);
    }
    Ok(())
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(parser: &Parser, input: &str, json: bool) -> Result<()> {
    let doc = parser.parse(input);
    let stats = DocumentStats::from_document(&doc, input);

    if json {
        return print_json(&stats);
    }

    println!("Document Statistics");
    println!("-------------------");
    println!("Content:");
    println!("  Total blocks:    {}", stats.total_blocks);
    println!("  Headings:        {}", stats.headings);
    println!("  Paragraphs:      {}", stats.paragraphs);
    println!("  Code blocks:     {}", stats.code_blocks);
    println!("    with language: {}", stats.tagged_code_blocks);
    println!("  Quotes:          {}", stats.quotes);
    println!("  Thematic breaks: {}", stats.thematic_breaks);
    println!("  Max quote depth: {}", stats.max_quote_depth);
    println!();
    println!("Size:");
    println!("  Bytes:           {}", stats.bytes);
    println!("  Lines:           {}", stats.lines);
    println!("  Code lines:      {}", stats.code_lines);

    Ok(())
}

#[derive(Debug, Default, Serialize)]
struct DocumentStats {
    total_blocks: usize,
    headings: usize,
    paragraphs: usize,
    code_blocks: usize,
    /// Code blocks whose fence carries a language tag.
    tagged_code_blocks: usize,
    quotes: usize,
    thematic_breaks: usize,
    max_quote_depth: usize,
    bytes: usize,
    lines: usize,
    code_lines: usize,
}

impl DocumentStats {
    fn from_document(doc: &Document, input: &str) -> Self {
        let mut stats = Self {
            bytes: input.len(),
            lines: input.lines().count(),
            ..Self::default()
        };

        stats.count_blocks(&doc.blocks, 0);
        stats
    }

    fn count_blocks(&mut self, blocks: &[Block], depth: usize) {
        self.max_quote_depth = self.max_quote_depth.max(depth);
        for block in blocks {
            self.total_blocks += 1;
            match block {
                Block::Heading(_) => self.headings += 1,
                Block::Paragraph(_) => self.paragraphs += 1,
                Block::CodeBlock(c) => {
                    self.code_blocks += 1;
                    self.code_lines += c.text.lines().count();
                    if c.language.is_some() {
                        self.tagged_code_blocks += 1;
                    }
                }
                Block::Quote(q) => {
                    self.quotes += 1;
                    self.count_blocks(&q.blocks, depth + 1);
                }
                Block::ThematicBreak(_) => self.thematic_breaks += 1,
            }
        }
    }
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    start: usize,
    end: usize,
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonBlock<'a> {
    Heading {
        level: u8,
        text: &'a str,
        start: usize,
        end: usize,
    },
    Paragraph {
        text: &'a str,
        start: usize,
        end: usize,
    },
    CodeBlock(JsonCodeBlock<'a>),
    Quote {
        blocks: Vec<JsonBlock<'a>>,
        start: usize,
        end: usize,
    },
    ThematicBreak {
        start: usize,
        end: usize,
    },
}

#[derive(Serialize)]
struct JsonCodeBlock<'a> {
    language: Option<&'a str>,
    text: &'a str,
    start: usize,
    end: usize,
}

#[derive(Serialize)]
struct JsonScan<'a> {
    matched: bool,
    end: usize,
    block: Option<JsonCodeBlock<'a>>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}

fn convert_document<'a>(doc: &'a Document) -> JsonDocument<'a> {
    JsonDocument {
        start: doc.span.start,
        end: doc.span.end,
        blocks: doc.blocks.iter().map(convert_block).collect(),
    }
}

fn convert_code_block<'a>(c: &'a CodeBlock) -> JsonCodeBlock<'a> {
    JsonCodeBlock {
        language: c.language.as_deref(),
        text: &c.text,
        start: c.span.start,
        end: c.span.end,
    }
}

fn convert_block<'a>(block: &'a Block) -> JsonBlock<'a> {
    match block {
        Block::Heading(h) => JsonBlock::Heading {
            level: h.level,
            text: &h.text,
            start: h.span.start,
            end: h.span.end,
        },
        Block::Paragraph(p) => JsonBlock::Paragraph {
            text: &p.text,
            start: p.span.start,
            end: p.span.end,
        },
        Block::CodeBlock(c) => JsonBlock::CodeBlock(convert_code_block(c)),
        Block::Quote(q) => JsonBlock::Quote {
            blocks: q.blocks.iter().map(convert_block).collect(),
            start: q.span.start,
            end: q.span.end,
        },
        Block::ThematicBreak(span) => JsonBlock::ThematicBreak {
            start: span.start,
            end: span.end,
        },
    }
}

// =============================================================================
// Text Output
// =============================================================================

fn print_document(doc: &Document, verbose: bool) {
    println!("Span: {}..{}", doc.span.start, doc.span.end);
    println!("Blocks: {}", doc.blocks.len());
    for (i, block) in doc.blocks.iter().enumerate() {
        print_block(block, &format!("{}", i + 1), 1, verbose);
    }
}

fn print_block(block: &Block, label: &str, indent: usize, verbose: bool) {
    let prefix = "  ".repeat(indent);
    let span = block.span();
    println!(
        "{}[{}] {} @ {}..{}",
        prefix,
        label,
        describe_block(block),
        span.start,
        span.end
    );

    match block {
        Block::Quote(q) => {
            for (i, child) in q.blocks.iter().enumerate() {
                print_block(child, &format!("{}.{}", label, i + 1), indent + 1, verbose);
            }
        }
        Block::CodeBlock(c) if verbose => print_preview(&prefix, &c.text),
        Block::Paragraph(p) if verbose => print_preview(&prefix, &p.text),
        _ => {}
    }
}

fn print_preview(prefix: &str, text: &str) {
    let preview: String = text.chars().take(60).collect();
    let ellipsis = if text.chars().count() > 60 { "..." } else { "" };
    println!(
        "{}  Content: {}{}",
        prefix,
        preview.replace('\n', "\\n"),
        ellipsis
    );
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Heading(h) => format!("Heading (level {}): {}", h.level, h.text),
        Block::Paragraph(p) => format!("Paragraph ({} lines)", p.text.lines().count()),
        Block::CodeBlock(c) => describe_code_block(c),
        Block::Quote(q) => format!("Quote ({} blocks)", q.blocks.len()),
        Block::ThematicBreak(_) => "ThematicBreak".to_string(),
    }
}

fn describe_code_block(c: &CodeBlock) -> String {
    match &c.language {
        Some(lang) => format!("CodeBlock (lang: {}, {} lines)", lang, c.text.lines().count()),
        None => format!("CodeBlock ({} lines)", c.text.lines().count()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_option_after_subcommand() {
        let args = ["mdblocks", "scan", "doc.md", "--start", "4", "--max-quote-depth", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.max_quote_depth, 3);
        match cli.command {
            Command::Scan {
                input,
                start,
                end,
                quote_depth,
            } => {
                assert_eq!(input.file, PathBuf::from("doc.md"));
                assert_eq!(start, 4);
                assert_eq!(end, None);
                assert_eq!(quote_depth, 0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_json_block_shape() {
        let doc = Parser::new().parse("# T\n\n```rust\nx\n```");
        let value = serde_json::to_value(convert_document(&doc)).unwrap();
        assert_eq!(value["blocks"][0]["type"], "Heading");
        assert_eq!(value["blocks"][1]["type"], "CodeBlock");
        assert_eq!(value["blocks"][1]["language"], "rust");
        assert_eq!(value["blocks"][1]["text"], "x");
        assert_eq!(value["blocks"][1]["start"], 5);
        assert_eq!(value["blocks"][1]["end"], 18);
    }

    #[test]
    fn test_stats_descend_into_quotes() {
        let input = "> ```sh\n> ls\n> ```\n>\n> > deep\n\n    code";
        let doc = Parser::new().parse(input);
        let stats = DocumentStats::from_document(&doc, input);
        assert_eq!(stats.code_blocks, 2);
        assert_eq!(stats.tagged_code_blocks, 1);
        assert_eq!(stats.quotes, 2);
        assert_eq!(stats.max_quote_depth, 2);
        assert_eq!(stats.paragraphs, 1);
    }

    #[test]
    fn test_stats_count_language_tags_not_fences() {
        let input = "```\nx\n```\n\n```rust\ny\n```\n\n    z";
        let doc = Parser::new().parse(input);
        let stats = DocumentStats::from_document(&doc, input);
        assert_eq!(stats.code_blocks, 3);
        assert_eq!(stats.tagged_code_blocks, 1);
    }
}
