//! Semantic analysis of statements
//!
//! This module validates control flow (break/continue placement, labels),
//! checks the types of statements that carry expressions and keeps the
//! block stack used for local variable flow tracking.

mod analyzer;
mod block;
mod context;
mod jump;

pub use analyzer::analyze_statements;
pub use block::{BlockContext, BlockGuard, BlockOwner, BlockStack, LocalVariableStatus, LocalVariableStatuses};
pub use context::{AnalysisContext, ClassRegistry, FunctionDefinition};
