//! Python bindings for the mdblocks scanner.
//!
//! All offsets are byte offsets into the UTF-8 encoding of the input.

use mdblocks_core::{
    ast::{Block, CodeBlock, Document},
    error::ScanError,
    span::Span as CoreSpan,
    Parser as CoreParser, Scan,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyList;

fn to_py_err(e: ScanError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ============================================================================
// Span
// ============================================================================

/// Source location in the input text (byte offsets).
#[pyclass(frozen, get_all, eq, name = "Span")]
#[derive(Clone, PartialEq, Eq)]
pub struct PySpan {
    pub start: usize,
    pub end: usize,
}

#[pymethods]
impl PySpan {
    fn __repr__(&self) -> String {
        format!("Span({}, {})", self.start, self.end)
    }

    #[getter]
    fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

impl From<CoreSpan> for PySpan {
    fn from(s: CoreSpan) -> Self {
        PySpan {
            start: s.start,
            end: s.end,
        }
    }
}

// ============================================================================
// Block types
// ============================================================================

/// Section heading.
#[pyclass(frozen, get_all, name = "Heading")]
pub struct PyHeading {
    pub level: u8,
    pub text: String,
    pub span: PySpan,
}

#[pymethods]
impl PyHeading {
    fn __repr__(&self) -> String {
        format!("Heading({}, {:?})", self.level, self.text)
    }
}

/// Text paragraph. Inline markup is left as written.
#[pyclass(frozen, get_all, name = "Paragraph")]
pub struct PyParagraph {
    pub text: String,
    pub span: PySpan,
}

#[pymethods]
impl PyParagraph {
    fn __repr__(&self) -> String {
        format!("Paragraph({:?})", self.text)
    }
}

/// Fenced or indented code block.
///
/// `language` is None for indented blocks and for fences without a tag.
#[pyclass(frozen, get_all, name = "CodeBlock")]
pub struct PyCodeBlock {
    pub language: Option<String>,
    pub text: String,
    pub span: PySpan,
}

#[pymethods]
impl PyCodeBlock {
    fn __repr__(&self) -> String {
        format!("CodeBlock(language={:?}, text={:?})", self.language, self.text)
    }

    fn __str__(&self) -> String {
        self.text.clone()
    }
}

/// Block quote.
#[pyclass(frozen, get_all, name = "Quote")]
pub struct PyQuote {
    pub blocks: PyObject,
    pub span: PySpan,
}

/// Horizontal rule.
#[pyclass(frozen, get_all, name = "ThematicBreak")]
pub struct PyThematicBreak {
    pub span: PySpan,
}

// ============================================================================
// Conversion
// ============================================================================

impl From<CodeBlock<'_>> for PyCodeBlock {
    fn from(c: CodeBlock<'_>) -> Self {
        PyCodeBlock {
            language: c.language.map(|l| l.into_owned()),
            text: c.text,
            span: c.span.into(),
        }
    }
}

fn convert_blocks(py: Python<'_>, blocks: Vec<Block>) -> PyResult<PyObject> {
    let list = PyList::empty(py);
    for block in blocks {
        list.append(convert_block(py, block)?)?;
    }
    Ok(list.into())
}

fn convert_block(py: Python<'_>, block: Block) -> PyResult<PyObject> {
    let obj = match block {
        Block::Heading(h) => Py::new(
            py,
            PyHeading {
                level: h.level,
                text: h.text.into_owned(),
                span: h.span.into(),
            },
        )?
        .into_any(),
        Block::Paragraph(p) => Py::new(
            py,
            PyParagraph {
                text: p.text.into_owned(),
                span: p.span.into(),
            },
        )?
        .into_any(),
        Block::CodeBlock(c) => Py::new(py, PyCodeBlock::from(c))?.into_any(),
        Block::Quote(q) => Py::new(
            py,
            PyQuote {
                blocks: convert_blocks(py, q.blocks)?,
                span: q.span.into(),
            },
        )?
        .into_any(),
        Block::ThematicBreak(span) => {
            Py::new(py, PyThematicBreak { span: span.into() })?.into_any()
        }
    };
    Ok(obj)
}

// ============================================================================
// Document
// ============================================================================

/// A scanned Markdown document.
#[pyclass(frozen, name = "Document")]
pub struct PyDocument {
    #[pyo3(get)]
    pub blocks: PyObject,
    #[pyo3(get)]
    pub span: PySpan,
}

#[pymethods]
impl PyDocument {
    fn __repr__(&self, py: Python<'_>) -> PyResult<String> {
        Ok(format!(
            "Document(blocks={}, span={}..{})",
            self.__len__(py)?,
            self.span.start,
            self.span.end
        ))
    }

    fn __len__(&self, py: Python<'_>) -> PyResult<usize> {
        let blocks = self.blocks.downcast_bound::<PyList>(py)?;
        Ok(blocks.len())
    }
}

fn convert_document(py: Python<'_>, doc: Document) -> PyResult<PyDocument> {
    Ok(PyDocument {
        blocks: convert_blocks(py, doc.blocks)?,
        span: doc.span.into(),
    })
}

// ============================================================================
// Parser
// ============================================================================

/// Markdown block scanner.
///
/// Args:
///     max_quote_depth: deepest block-quote nesting to interpret (default 32)
#[pyclass(frozen, name = "Parser")]
pub struct PyParser {
    inner: CoreParser,
}

#[pymethods]
impl PyParser {
    #[new]
    #[pyo3(signature = (max_quote_depth=None), text_signature = "(max_quote_depth=None)")]
    fn new(max_quote_depth: Option<usize>) -> Self {
        let mut inner = CoreParser::new();
        if let Some(depth) = max_quote_depth {
            inner = inner.with_max_quote_depth(depth);
        }
        PyParser { inner }
    }

    #[getter]
    fn max_quote_depth(&self) -> usize {
        self.inner.max_quote_depth()
    }

    /// Parse a whole string into blocks.
    #[pyo3(text_signature = "(self, input)")]
    fn parse(&self, py: Python<'_>, input: &str) -> PyResult<PyDocument> {
        convert_document(py, self.inner.parse(input))
    }

    /// Parse the UTF-8 byte region `start..end`, not character indices.
    /// Raises ValueError on a bad region.
    #[pyo3(text_signature = "(self, input, start, end)")]
    fn parse_region(
        &self,
        py: Python<'_>,
        input: &str,
        start: usize,
        end: usize,
    ) -> PyResult<PyDocument> {
        let doc = self
            .inner
            .parse_region(input, start, end)
            .map_err(to_py_err)?;
        convert_document(py, doc)
    }

    fn __repr__(&self) -> String {
        format!("Parser(max_quote_depth={})", self.inner.max_quote_depth())
    }
}

// ============================================================================
// Module functions
// ============================================================================

/// Parse a Markdown string with default settings.
///
/// Args:
///     input: Markdown text
///
/// Returns:
///     Document
#[pyfunction]
fn parse(py: Python<'_>, input: &str) -> PyResult<PyDocument> {
    convert_document(py, CoreParser::new().parse(input))
}

/// Try the code-block rule once at `start`.
///
/// Args:
///     input: Markdown text
///     start: UTF-8 byte offset of the first line to look at
///     max_end: exclusive UTF-8 byte offset to stop at (default: end of input)
///
/// Offsets count bytes of `input.encode("utf-8")`, not characters, so
/// `len(input)` is not a valid `max_end` for non-ASCII text. The returned
/// `end` and every `Span` use the same byte offsets.
///     quote_depth: number of enclosing `>` markers to strip
///
/// Returns:
///     (CodeBlock, end) on a match, otherwise None
///
/// Raises:
///     ValueError: the region is inverted, out of bounds, or splits a character
#[pyfunction]
#[pyo3(signature = (input, start=0, max_end=None, quote_depth=0))]
fn parse_code_block(
    input: &str,
    start: usize,
    max_end: Option<usize>,
    quote_depth: usize,
) -> PyResult<Option<(PyCodeBlock, usize)>> {
    let max_end = max_end.unwrap_or(input.len());
    let scan = CoreParser::new()
        .scan_code_block(input, start, max_end, quote_depth)
        .map_err(to_py_err)?;
    Ok(match scan {
        Scan::Matched { block, end } => Some((block.into(), end)),
        Scan::NoMatch => None,
    })
}

#[pymodule]
fn pymdblocks(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySpan>()?;
    m.add_class::<PyParser>()?;
    m.add_class::<PyDocument>()?;
    m.add_class::<PyHeading>()?;
    m.add_class::<PyParagraph>()?;
    m.add_class::<PyCodeBlock>()?;
    m.add_class::<PyQuote>()?;
    m.add_class::<PyThematicBreak>()?;
    m.add_function(wrap_pyfunction!(parse, m)?)?;
    m.add_function(wrap_pyfunction!(parse_code_block, m)?)?;
    Ok(())
}
