//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream};
use thiserror::Error;

use super::Token;

/// A user-facing compile error, anchored at a source token.
///
/// These go to the analysis context's error sink. They never stop the
/// analysis of sibling statements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("[{token}] {message}")]
    Semantic { message: String, token: Token },

    #[error("[{token}] {message}")]
    Type { message: String, token: Token },
}

impl CompileError {
    pub fn semantic(token: &Token, message: impl Into<String>) -> Self {
        Self::Semantic {
            message: message.into(),
            token: token.clone(),
        }
    }

    pub fn type_error(token: &Token, message: impl Into<String>) -> Self {
        Self::Type {
            message: message.into(),
            token: token.clone(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Semantic { message, .. } | Self::Type { message, .. } => message,
        }
    }

    pub fn token(&self) -> &Token {
        match self {
            Self::Semantic { token, .. } | Self::Type { token, .. } => token,
        }
    }
}

/// A fault in the compiler itself, as opposed to a defect in the program
/// being compiled.
///
/// Faults abort the analysis of the enclosing function body and are
/// propagated to the driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFault {
    #[error("logic flaw at {token}: {message}")]
    LogicFlaw { message: String, token: Token },

    #[error("malformed statement tree at {token}: {message}")]
    MalformedTree { message: String, token: Token },
}

impl AnalysisFault {
    pub fn logic_flaw(token: &Token, message: impl Into<String>) -> Self {
        Self::LogicFlaw {
            message: message.into(),
            token: token.clone(),
        }
    }

    pub fn malformed(token: &Token, message: impl Into<String>) -> Self {
        Self::MalformedTree {
            message: message.into(),
            token: token.clone(),
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisFault>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    fn diagnostic(file_id: usize, error: &CompileError) -> Diagnostic<usize> {
        let header = match error {
            CompileError::Semantic { .. } => "Semantic error",
            CompileError::Type { .. } => "Type error",
        };
        let span = error.token().span();
        Diagnostic::error()
            .with_message(header)
            .with_labels(vec![
                Label::primary(file_id, span.start..span.end).with_message(error.message())
            ])
    }

    /// Print an error to stderr
    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let diagnostic = Self::diagnostic(file_id, error);
        let _ = term::emit(&mut writer.lock(), &self.config, &self.files, &diagnostic);
    }

    /// Render an error without colors, e.g. for snapshots in tests
    pub fn render(&self, file_id: usize, error: &CompileError) -> String {
        let mut buffer = NoColor::new(Vec::new());
        let diagnostic = Self::diagnostic(file_id, error);
        if term::emit(&mut buffer, &self.config, &self.files, &diagnostic).is_err() {
            return error.to_string();
        }
        String::from_utf8_lossy(&buffer.into_inner()).into_owned()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
