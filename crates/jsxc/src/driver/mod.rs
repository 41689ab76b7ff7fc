//! Analysis driver: runs the statement analyzer over function bodies

use std::rc::Rc;

use crate::ast::{Statement, serialize_array};
use crate::common::{AnalysisResult, CompileError};
use crate::sema::{AnalysisContext, ClassRegistry, FunctionDefinition, LocalVariableStatuses, analyze_statements};

/// Configuration options for the analyzer
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    /// Log each function as it is analyzed
    pub verbose: bool,
    /// Log the structural form of each body after analysis
    pub dump_tree: bool,
    /// Keep at most this many diagnostics per report
    pub error_limit: Option<usize>,
}

/// A function body waiting to be analyzed
#[derive(Debug)]
pub struct FunctionBody {
    pub def: FunctionDefinition,
    /// Parameters and locals with their status at function entry
    pub locals: LocalVariableStatuses,
    pub statements: Vec<Statement>,
}

impl FunctionBody {
    pub fn new(def: FunctionDefinition, locals: LocalVariableStatuses, statements: Vec<Statement>) -> Self {
        Self { def, locals, statements }
    }
}

/// Diagnostics collected by an analysis run
#[derive(Debug, Default)]
pub struct AnalysisReport {
    pub errors: Vec<CompileError>,
    /// Diagnostics dropped because of `AnalyzerConfig::error_limit`
    pub suppressed: usize,
}

impl AnalysisReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.suppressed != 0
    }

    fn absorb(&mut self, errors: Vec<CompileError>, limit: Option<usize>) {
        for error in errors {
            match limit {
                Some(limit) if self.errors.len() >= limit => self.suppressed += 1,
                _ => self.errors.push(error),
            }
        }
    }
}

/// Runs statement analysis for the functions of a compilation unit
pub struct FunctionAnalyzer {
    config: AnalyzerConfig,
    classes: Rc<ClassRegistry>,
}

impl FunctionAnalyzer {
    pub fn new(classes: ClassRegistry) -> Self {
        Self::with_config(classes, AnalyzerConfig::default())
    }

    pub fn with_config(classes: ClassRegistry, config: AnalyzerConfig) -> Self {
        Self {
            config,
            classes: Rc::new(classes),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one function body.
    ///
    /// User errors end up in the report; a fault aborts the body and is
    /// returned as the error.
    pub fn analyze_body(&self, body: &mut FunctionBody) -> AnalysisResult<AnalysisReport> {
        let mut report = AnalysisReport::default();
        self.analyze_into(body, &mut report)?;
        Ok(report)
    }

    /// Analyze every body of a unit, continuing past user errors and
    /// stopping at the first fault
    pub fn analyze_unit(&self, bodies: &mut [FunctionBody]) -> AnalysisResult<AnalysisReport> {
        let mut report = AnalysisReport::default();
        for body in bodies {
            self.analyze_into(body, &mut report)?;
        }
        Ok(report)
    }

    fn analyze_into(&self, body: &mut FunctionBody, report: &mut AnalysisReport) -> AnalysisResult<()> {
        if self.config.verbose {
            tracing::info!(
                function = body.def.name(),
                class = body.def.class_def.name(),
                statements = body.statements.len(),
                "analyzing function body"
            );
        }

        let mut ctx = AnalysisContext::new(
            body.def.clone(),
            body.locals.clone(),
            Rc::clone(&self.classes),
        );
        analyze_statements(&mut body.statements, &mut ctx)?;
        debug_assert_eq!(ctx.block_stack.depth(), 1);

        if self.config.dump_tree {
            let tree = serialize_array(&body.statements);
            tracing::debug!(function = body.def.name(), %tree, "analyzed body");
        }
        if self.config.verbose {
            tracing::info!(
                function = body.def.name(),
                errors = ctx.errors.len(),
                "finished function body"
            );
        }

        report.absorb(ctx.errors, self.config.error_limit);
        Ok(())
    }
}

/// Structural form of a whole body
pub fn serialize_body(statements: &[Statement]) -> String {
    serialize_array(statements).to_string()
}
