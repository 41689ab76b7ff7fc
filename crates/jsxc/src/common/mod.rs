//! Common infrastructure shared by the AST and the analyzer

mod error;
mod span;
mod token;

pub use error::{AnalysisFault, AnalysisResult, CompileError, DiagnosticReporter};
pub use span::Span;
pub use token::Token;
