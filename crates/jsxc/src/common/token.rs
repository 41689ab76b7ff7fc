//! Tokens used as diagnostic anchors

use std::fmt;
use std::rc::Rc;

use super::Span;

/// A source token: the text it was scanned from plus where it came from.
///
/// Statements keep the token of their leading keyword (or of their leading
/// expression) so that diagnostics and fault logs can point back at the
/// source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    filename: Option<Rc<str>>,
    line: u32,
    column: u32,
    span: Span,
}

impl Token {
    pub fn new(value: impl Into<String>, filename: Option<Rc<str>>, line: u32, column: u32, span: Span) -> Self {
        Self {
            value: value.into(),
            filename,
            line,
            column,
            span,
        }
    }

    /// A token with no file information, mostly useful for synthesized nodes
    pub fn synthetic(value: impl Into<String>) -> Self {
        Self::new(value, None, 0, 0, Span::default())
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filename().unwrap_or("<unknown>"),
            self.line,
            self.column
        )
    }
}
