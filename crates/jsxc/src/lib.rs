//! JSX Compiler - statement-level semantic analysis
//!
//! This library checks the statements of function bodies: where `break`
//! and `continue` may appear and which labels they may name, the types of
//! statements that carry expressions (`return`, `switch`/`case`, `delete`,
//! constructor invocations, `assert`, `log`), and the block stack used for
//! local variable flow tracking.
//!
//! ## Architecture
//!
//! - **AST** (`ast/`): statement nodes, the expression seam and the
//!   structural serializer
//! - **Sema** (`sema/`): analysis context, block stack, per-statement checks
//! - **Driver** (`driver/`): configuration and the per-function entry point
//! - **Common** (`common/`): tokens, spans, errors and diagnostic rendering
//! - **Types** (`types/`): the type comparisons and class lookups analysis needs

pub mod common;
pub mod types;
pub mod ast;
pub mod sema;
pub mod driver;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use common::{AnalysisFault, AnalysisResult, CompileError, DiagnosticReporter, Span, Token};
pub use ast::{Serializable, Statement, StatementNode};
pub use sema::{AnalysisContext, ClassRegistry, FunctionDefinition};
pub use driver::{AnalysisReport, AnalyzerConfig, FunctionAnalyzer, FunctionBody};
