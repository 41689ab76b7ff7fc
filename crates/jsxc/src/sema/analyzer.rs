//! Statement analyzer - control flow validation and type checking

use std::rc::Rc;

use crate::ast::*;
use crate::common::{AnalysisFault, AnalysisResult, CompileError};
use crate::types::{MemberMode, MemberType, Type};
use super::jump::check_jump;
use super::{AnalysisContext, BlockOwner};

/// Per-variant semantic check
trait Analyze: StatementNode {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()>;
}

/// Run a variant's check. A fault is logged with the statement's location
/// and handed back to the caller untouched; user errors never surface
/// here, they are in `ctx.errors`.
fn analyze_logged<S: Analyze + ?Sized>(stmt: &mut S, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
    stmt.do_analyze(ctx).inspect_err(|fault| {
        let token = stmt.token();
        tracing::error!(
            file = token.filename().unwrap_or("<unknown>"),
            line = token.line(),
            statement = stmt.name(),
            %fault,
            "fatal error while compiling statement"
        );
    })
}

impl Statement {
    /// Analyze this statement and everything nested in it
    pub fn analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        for_each_variant!(self, s => analyze_logged(s, ctx))
    }
}

/// Analyze a statement list in the current frame
pub fn analyze_statements(statements: &mut [Statement], ctx: &mut AnalysisContext) -> AnalysisResult<()> {
    for statement in statements {
        statement.analyze(ctx)?;
    }
    Ok(())
}

/// Analyze a statement list in a fresh frame owned by `owner`
fn analyze_in_block(
    statements: &mut [Statement],
    owner: BlockOwner,
    ctx: &mut AnalysisContext,
) -> AnalysisResult<()> {
    let mut block = ctx.enter_block(owner);
    analyze_statements(statements, &mut block)
}

impl Analyze for ConstructorInvocationStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        let class_def = if self.qualified_name.is_bare_super() {
            let current = &ctx.func_def.class_def;
            let Some(parent) = current.extend_class_def().map(Rc::clone) else {
                let message = format!("class '{}' has no super class", current.name());
                ctx.errors.push(CompileError::semantic(self.qualified_name.token(), message));
                return Ok(());
            };
            parent
        } else {
            // error is reported by get_class
            let Some(class_def) = self.qualified_name.get_class(ctx) else {
                return Ok(());
            };
            class_def
        };

        // error is reported by the failing argument
        let Some(arg_types) = analyze_args(&mut self.args, ctx) else {
            return Ok(());
        };

        let ctor_type = match class_def
            .member_type_by_name("constructor", MemberMode::ClassOnly)
            .and_then(MemberType::as_function)
        {
            None => {
                if !self.args.is_empty() {
                    ctx.errors.push(CompileError::type_error(
                        self.qualified_name.token(),
                        "no function with matching arguments",
                    ));
                    return Ok(());
                }
                None
            }
            Some(ctor) => {
                match ctor.deduce_by_argument_types(&mut ctx.errors, self.qualified_name.token(), &arg_types) {
                    Some(signature) => Some(signature),
                    None => return Ok(()),
                }
            }
        };

        self.ctor_class_def = Some(class_def);
        self.ctor_type = ctor_type;
        Ok(())
    }
}

/// Analyze call arguments; `None` if any of them failed or has no type
fn analyze_args(args: &mut [Box<dyn Expression>], ctx: &mut AnalysisContext) -> Option<Vec<Type>> {
    let mut types = Vec::with_capacity(args.len());
    for arg in args {
        if !arg.analyze(ctx) {
            return None;
        }
        types.push(arg.ty()?.clone());
    }
    Some(types)
}

impl Analyze for ExpressionStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        self.expr.analyze(ctx);
        Ok(())
    }
}

impl Analyze for ReturnStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        if !self.expr.analyze(ctx) {
            return Ok(());
        }
        let Some(expr_type) = self.expr.ty() else {
            return Ok(());
        };
        let return_type = &ctx.func_def.return_type;
        if !expr_type.is_convertible_to(return_type) {
            let message = format!(
                "cannot convert '{}' to return type '{}'",
                expr_type, return_type
            );
            ctx.errors.push(CompileError::type_error(&self.token, message));
        }
        Ok(())
    }
}

impl Analyze for DeleteStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        const NOT_A_HASH: &str = "only properties of a hash object can be deleted";

        if !self.expr.analyze(ctx) {
            return Ok(());
        }
        let Some(key) = self.expr.index_key() else {
            ctx.errors.push(CompileError::semantic(&self.token, NOT_A_HASH));
            return Ok(());
        };
        // already reported if unknown
        let Some(key_type) = key.ty() else {
            return Ok(());
        };
        if key_type.resolve_if_may_be_undefined() != &Type::String {
            ctx.errors.push(CompileError::semantic(&self.token, NOT_A_HASH));
        }
        Ok(())
    }
}

impl Analyze for JumpStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        check_jump(self, ctx);
        Ok(())
    }
}

impl Analyze for DoWhileStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        self.expr.analyze(ctx);
        let owner = BlockOwner::DoWhile { label: self.label.clone() };
        analyze_in_block(&mut self.statements, owner, ctx)
    }
}

impl Analyze for ForInStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        self.expr.analyze(ctx);
        let owner = BlockOwner::ForIn { label: self.label.clone() };
        analyze_in_block(&mut self.statements, owner, ctx)
    }
}

impl Analyze for ForStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        for expr in [&mut self.init_expr, &mut self.cond_expr, &mut self.post_expr]
            .into_iter()
            .flatten()
        {
            expr.analyze(ctx);
        }
        let owner = BlockOwner::For { label: self.label.clone() };
        analyze_in_block(&mut self.statements, owner, ctx)
    }
}

impl Analyze for WhileStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        self.expr.analyze(ctx);
        let owner = BlockOwner::While { label: self.label.clone() };
        analyze_in_block(&mut self.statements, owner, ctx)
    }
}

impl Analyze for IfStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        self.expr.analyze(ctx);
        // both arms start from the same snapshot
        analyze_in_block(&mut self.on_true_statements, BlockOwner::If, ctx)?;
        analyze_in_block(&mut self.on_false_statements, BlockOwner::If, ctx)
    }
}

impl Analyze for SwitchStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        let expr_type = if self.expr.analyze(ctx) {
            self.expr.ty().cloned()
        } else {
            None
        };
        if let Some(ty) = &expr_type {
            if !matches!(ty, Type::Boolean | Type::Int | Type::Number | Type::String) {
                ctx.errors.push(CompileError::type_error(
                    &self.token,
                    "switch statement only accepts boolean, number, or string expressions",
                ));
            }
        }
        let owner = BlockOwner::Switch { label: self.label.clone(), expr_type };
        analyze_in_block(&mut self.statements, owner, ctx)
    }
}

/// Whether a case of type `case_type` may appear in a switch over
/// `switch_type`
fn is_case_compatible(switch_type: &Type, case_type: &Type) -> bool {
    case_type == switch_type
        || (case_type.is_integer_or_number() && switch_type.is_integer_or_number())
        || (switch_type == &Type::String && case_type.is_null())
}

impl Analyze for CaseStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        if !self.expr.analyze(ctx) {
            return Ok(());
        }
        let BlockOwner::Switch { expr_type, .. } = &ctx.top_block().owner else {
            return Err(AnalysisFault::logic_flaw(&self.token, "case statement outside of a switch body"));
        };
        let (Some(expected), Some(actual)) = (expr_type, self.expr.ty()) else {
            return Ok(());
        };
        if !is_case_compatible(expected, actual) {
            let message = format!(
                "type mismatch; expected type was '{}' but got '{}'",
                expected, actual
            );
            ctx.errors.push(CompileError::type_error(&self.token, message));
        }
        Ok(())
    }
}

impl Analyze for DefaultStatement {
    fn do_analyze(&mut self, _ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        Ok(())
    }
}

impl Analyze for TryStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        analyze_in_block(&mut self.try_statements, BlockOwner::Try, ctx)?;
        if let Some(catch_statements) = &mut self.catch_statements {
            analyze_in_block(catch_statements, BlockOwner::Try, ctx)?;
        }
        if let Some(finally_statements) = &mut self.finally_statements {
            analyze_in_block(finally_statements, BlockOwner::Try, ctx)?;
        }
        Ok(())
    }
}

/// Analyze the operands of an information statement, stopping at the
/// first one that fails
fn analyze_exprs(exprs: &mut [Box<dyn Expression>], ctx: &mut AnalysisContext) -> bool {
    exprs.iter_mut().all(|expr| expr.analyze(ctx))
}

impl Analyze for AssertStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        if self.exprs.is_empty() {
            return Err(AnalysisFault::malformed(&self.token, "assert statement without an expression"));
        }
        if !analyze_exprs(&mut self.exprs, ctx) {
            return Ok(());
        }
        let Some(expr_type) = self.exprs.last().and_then(|expr| expr.ty()) else {
            return Ok(());
        };
        if expr_type.is_void() {
            ctx.errors.push(CompileError::type_error(&self.token, "cannot assert type void"));
        } else if expr_type.is_null() {
            ctx.errors.push(CompileError::type_error(&self.token, "assertion never succeeds"));
        }
        Ok(())
    }
}

impl Analyze for LogStatement {
    fn do_analyze(&mut self, ctx: &mut AnalysisContext) -> AnalysisResult<()> {
        if !analyze_exprs(&mut self.exprs, ctx) {
            return Ok(());
        }
        for expr in &self.exprs {
            let Some(expr_type) = expr.ty() else {
                return Ok(());
            };
            if expr_type.is_void() {
                ctx.errors.push(CompileError::type_error(&self.token, "cannot log a void expression"));
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Token;
    use crate::sema::{ClassRegistry, FunctionDefinition, LocalVariableStatus, LocalVariableStatuses};
    use crate::testing::{self, tok};
    use crate::types::{ClassDefinition, FunctionType, Signature};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(ctx: &mut AnalysisContext, mut statements: Vec<Statement>) -> AnalysisResult<()> {
        let result = analyze_statements(&mut statements, ctx);
        assert_eq!(ctx.block_stack.depth(), 1, "block stack not restored");
        result
    }

    fn messages(ctx: &AnalysisContext) -> Vec<&str> {
        ctx.errors.iter().map(CompileError::message).collect()
    }

    fn label(name: &str) -> Option<Token> {
        Some(tok(name))
    }

    fn brk(label: Option<Token>) -> Statement {
        JumpStatement::new_break(tok("break"), label).into()
    }

    fn cont(label: Option<Token>) -> Statement {
        JumpStatement::new_continue(tok("continue"), label).into()
    }

    fn while_loop(label: Option<Token>, statements: Vec<Statement>) -> Statement {
        WhileStatement::new(tok("while"), label, testing::value(Type::Boolean), statements).into()
    }

    fn if_else(on_true: Vec<Statement>, on_false: Vec<Statement>) -> Statement {
        IfStatement::new(tok("if"), testing::value(Type::Boolean), on_true, on_false).into()
    }

    fn switch_over(ty: Type, statements: Vec<Statement>) -> Statement {
        SwitchStatement::new(tok("switch"), None, testing::value(ty), statements).into()
    }

    fn case_of(ty: Type) -> Statement {
        CaseStatement::new(tok("case"), testing::value(ty)).into()
    }

    fn context_with_local(name: &str) -> AnalysisContext {
        let mut locals = LocalVariableStatuses::new();
        locals.declare(name, LocalVariableStatus::Unset);
        AnalysisContext::new(testing::function_def(Type::Void), locals, Rc::new(ClassRegistry::new()))
    }

    fn assign(name: &str) -> Statement {
        ExpressionStatement::new(Box::new(AssignLocalExpression::new(
            tok(name),
            testing::value(Type::Int),
        )))
        .into()
    }

    fn read(name: &str) -> Statement {
        ExpressionStatement::new(Box::new(LocalExpression::new(tok(name), Type::Int))).into()
    }

    // break / continue

    #[test]
    fn test_break_allowed_in_every_loop_and_switch() {
        let mut ctx = testing::context();
        let statements = vec![
            while_loop(None, vec![brk(None)]),
            DoWhileStatement::new(tok("do"), None, testing::value(Type::Boolean), vec![brk(None)]).into(),
            ForStatement::new(tok("for"), None, None, None, None, vec![brk(None)]).into(),
            ForInStatement::new(tok("for"), None, tok("k"), testing::value(Type::map_of(Type::Int)), vec![brk(None)])
                .into(),
            switch_over(Type::Int, vec![brk(None)]),
        ];
        run(&mut ctx, statements).unwrap();
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_continue_allowed_in_every_loop() {
        let mut ctx = testing::context();
        let statements = vec![
            while_loop(None, vec![cont(None)]),
            DoWhileStatement::new(tok("do"), None, testing::value(Type::Boolean), vec![cont(None)]).into(),
            ForStatement::new(tok("for"), None, None, None, None, vec![cont(None)]).into(),
            ForInStatement::new(tok("for"), None, tok("k"), testing::value(Type::map_of(Type::Int)), vec![cont(None)])
                .into(),
            while_loop(None, vec![switch_over(Type::Int, vec![case_of(Type::Int), cont(None)])]),
        ];
        run(&mut ctx, statements).unwrap();
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_break_in_bare_if_is_rejected_once() {
        let mut ctx = testing::context();
        run(&mut ctx, vec![if_else(vec![brk(None)], vec![])]).unwrap();
        assert_eq!(
            messages(&ctx),
            vec!["cannot break (a break statement is only allowed within the following statements: for/do-while/while/switch)"]
        );
    }

    #[test]
    fn test_continue_in_switch_without_loop_is_rejected() {
        let mut ctx = testing::context();
        run(&mut ctx, vec![switch_over(Type::Int, vec![case_of(Type::Int), cont(None)])]).unwrap();
        assert_eq!(
            messages(&ctx),
            vec!["cannot continue (a continue statement is only allowed within the following statements: for/do-while/while)"]
        );
    }

    #[test]
    fn test_jump_through_if_and_try_reaches_loop() {
        let mut ctx = testing::context();
        let body = vec![TryStatement::new(tok("try"), vec![if_else(vec![cont(None)], vec![brk(None)])], None, None, None)
            .into()];
        run(&mut ctx, vec![while_loop(None, body)]).unwrap();
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_labelled_break_to_outer_loop() {
        let mut ctx = testing::context();
        let inner = ForStatement::new(tok("for"), None, None, None, None, vec![brk(label("outer"))]).into();
        run(&mut ctx, vec![while_loop(label("outer"), vec![inner])]).unwrap();
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_undefined_label_reported_once() {
        let mut ctx = testing::context();
        run(&mut ctx, vec![while_loop(label("outer"), vec![cont(label("inner"))])]).unwrap();
        assert_eq!(
            messages(&ctx),
            vec!["label 'inner' is either not defined or invalid as the destination"]
        );
    }

    #[test]
    fn test_label_of_sibling_loop_is_not_visible() {
        let mut ctx = testing::context();
        let statements = vec![
            while_loop(label("first"), vec![]),
            while_loop(None, vec![brk(label("first"))]),
        ];
        run(&mut ctx, statements).unwrap();
        assert_eq!(ctx.errors.len(), 1);
    }

    // switch / case

    #[test]
    fn test_case_compatibility_rules() {
        let mut ctx = testing::context();
        let statements = vec![
            switch_over(Type::Int, vec![case_of(Type::Int), case_of(Type::Number)]),
            switch_over(Type::Number, vec![case_of(Type::Int)]),
            switch_over(Type::String, vec![case_of(Type::String), case_of(Type::Null)]),
            switch_over(Type::Boolean, vec![case_of(Type::Boolean), DefaultStatement::new(tok("default")).into()]),
        ];
        run(&mut ctx, statements).unwrap();
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_case_mismatch_names_both_types() {
        let mut ctx = testing::context();
        run(&mut ctx, vec![switch_over(Type::Int, vec![case_of(Type::String)])]).unwrap();
        assert_eq!(
            messages(&ctx),
            vec!["type mismatch; expected type was 'int' but got 'string'"]
        );
    }

    #[test]
    fn test_null_case_only_allowed_for_string_switch() {
        let mut ctx = testing::context();
        run(&mut ctx, vec![switch_over(Type::Int, vec![case_of(Type::Null)])]).unwrap();
        assert_eq!(messages(&ctx), vec!["type mismatch; expected type was 'int' but got 'null'"]);
    }

    #[test]
    fn test_switch_on_unsupported_type_still_checks_body() {
        let mut ctx = testing::context();
        let ty = Type::array_of(Type::Int);
        run(&mut ctx, vec![switch_over(ty, vec![case_of(Type::Int), brk(None)])]).unwrap();
        assert_eq!(
            messages(&ctx),
            vec![
                "switch statement only accepts boolean, number, or string expressions",
                "type mismatch; expected type was 'int[]' but got 'int'",
            ]
        );
    }

    #[test]
    fn test_case_skipped_when_switch_type_unknown() {
        let mut ctx = testing::context();
        let switch = SwitchStatement::new(tok("switch"), None, testing::failing(), vec![case_of(Type::String)]);
        run(&mut ctx, vec![switch.into()]).unwrap();
        assert_eq!(messages(&ctx), vec!["expression failed"]);
    }

    #[test]
    fn test_case_outside_switch_is_a_fault() {
        let mut ctx = testing::context();
        let result = run(&mut ctx, vec![while_loop(None, vec![if_else(vec![case_of(Type::Int)], vec![])])]);
        assert!(matches!(result, Err(AnalysisFault::LogicFlaw { .. })));
        assert!(ctx.errors.is_empty());
    }

    // return

    #[test]
    fn test_return_convertible_type() {
        let mut ctx = testing::context_returning(Type::Number);
        let statements = vec![
            ReturnStatement::new(tok("return"), testing::value(Type::Int)).into(),
            ReturnStatement::new(tok("return"), testing::value(Type::Number)).into(),
        ];
        run(&mut ctx, statements).unwrap();
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_return_inconvertible_type() {
        let mut ctx = testing::context_returning(Type::Int);
        let ret = ReturnStatement::new(tok("return"), testing::value(Type::String));
        run(&mut ctx, vec![ret.into()]).unwrap();
        assert_eq!(messages(&ctx), vec!["cannot convert 'string' to return type 'int'"]);
        assert_eq!(ctx.errors[0].token().value(), "return");
    }

    #[test]
    fn test_return_of_unknown_type_is_silent() {
        let mut ctx = testing::context_returning(Type::Int);
        let statements = vec![
            ReturnStatement::new(tok("return"), testing::untyped()).into(),
            ReturnStatement::new(tok("return"), testing::failing()).into(),
        ];
        run(&mut ctx, statements).unwrap();
        assert_eq!(messages(&ctx), vec!["expression failed"]);
    }

    // delete

    fn delete_index(key: Type) -> Statement {
        let expr = IndexExpression::new(tok("["), testing::value(Type::map_of(Type::Int)), testing::value(key));
        DeleteStatement::new(tok("delete"), Box::new(expr)).into()
    }

    #[test]
    fn test_delete_string_keyed_element() {
        let mut ctx = testing::context();
        let statements = vec![
            delete_index(Type::String),
            delete_index(Type::may_be_undefined(Type::String)),
        ];
        run(&mut ctx, statements).unwrap();
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_delete_rejects_other_operands() {
        let mut ctx = testing::context();
        let statements = vec![
            delete_index(Type::Int),
            DeleteStatement::new(tok("delete"), testing::value(Type::map_of(Type::Int))).into(),
        ];
        run(&mut ctx, statements).unwrap();
        assert_eq!(
            messages(&ctx),
            vec![
                "only properties of a hash object can be deleted",
                "only properties of a hash object can be deleted",
            ]
        );
    }

    #[test]
    fn test_delete_with_failing_operand_reports_nothing_more() {
        let mut ctx = testing::context();
        run(&mut ctx, vec![DeleteStatement::new(tok("delete"), testing::failing()).into()]).unwrap();
        assert_eq!(messages(&ctx), vec!["expression failed"]);
    }

    // assert / log

    fn assert_of(types: Vec<Type>) -> Statement {
        AssertStatement::new(tok("assert"), types.into_iter().map(testing::value).collect()).into()
    }

    fn log_of(exprs: Vec<Box<dyn Expression>>) -> Statement {
        LogStatement::new(tok("log"), exprs).into()
    }

    #[test]
    fn test_assert_operand_rules() {
        let mut ctx = testing::context();
        let statements = vec![
            assert_of(vec![Type::Boolean]),
            assert_of(vec![Type::Boolean, Type::Void]),
            assert_of(vec![Type::Null]),
            assert_of(vec![Type::Void, Type::Int]),
        ];
        run(&mut ctx, statements).unwrap();
        assert_eq!(messages(&ctx), vec!["cannot assert type void", "assertion never succeeds"]);
    }

    #[test]
    fn test_assert_stops_at_failing_operand() {
        let mut ctx = testing::context();
        let assert = AssertStatement::new(tok("assert"), vec![testing::failing(), testing::value(Type::Void)]);
        run(&mut ctx, vec![assert.into()]).unwrap();
        assert_eq!(messages(&ctx), vec!["expression failed"]);
    }

    #[test]
    fn test_empty_assert_is_a_fault() {
        let mut ctx = testing::context();
        let result = run(&mut ctx, vec![AssertStatement::new(tok("assert"), vec![]).into()]);
        assert!(matches!(result, Err(AnalysisFault::MalformedTree { .. })));
    }

    #[test]
    fn test_log_reports_first_void_only() {
        let mut ctx = testing::context();
        let statements = vec![
            log_of(vec![testing::value(Type::String), testing::value(Type::Int)]),
            log_of(vec![testing::value(Type::Void), testing::value(Type::Void)]),
        ];
        run(&mut ctx, statements).unwrap();
        assert_eq!(messages(&ctx), vec!["cannot log a void expression"]);
    }

    #[test]
    fn test_log_stops_at_unknown_type() {
        let mut ctx = testing::context();
        run(&mut ctx, vec![log_of(vec![testing::untyped(), testing::value(Type::Void)])]).unwrap();
        assert!(ctx.errors.is_empty());
    }

    // flow statuses

    #[test]
    fn test_if_branches_do_not_share_assignments() {
        let mut ctx = context_with_local("x");
        run(&mut ctx, vec![if_else(vec![assign("x"), read("x")], vec![read("x")])]).unwrap();
        assert_eq!(messages(&ctx), vec!["variable is not initialized: x"]);
    }

    #[test]
    fn test_try_parts_start_from_pre_try_snapshot() {
        let mut ctx = context_with_local("x");
        let try_stmt = TryStatement::new(
            tok("try"),
            vec![assign("x")],
            Some(tok("e")),
            Some(vec![read("x")]),
            Some(vec![read("x")]),
        );
        run(&mut ctx, vec![try_stmt.into()]).unwrap();
        assert_eq!(ctx.errors.len(), 2);
    }

    #[test]
    fn test_assignment_before_loop_is_visible_inside() {
        let mut ctx = context_with_local("x");
        run(&mut ctx, vec![assign("x"), while_loop(None, vec![read("x")])]).unwrap();
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_depth_restored_after_nested_errors() {
        let mut ctx = testing::context();
        let nested = vec![
            TryStatement::new(
                tok("try"),
                vec![switch_over(Type::Int, vec![case_of(Type::String), brk(label("missing"))])],
                None,
                Some(vec![if_else(vec![cont(None)], vec![])]),
                Some(vec![ForStatement::new(tok("for"), None, Some(testing::failing()), None, None, vec![]).into()]),
            )
            .into(),
        ];
        run(&mut ctx, vec![while_loop(None, nested)]).unwrap();
        assert_eq!(ctx.errors.len(), 3);
    }

    // constructor invocation

    fn ctor_context(class_def: ClassDefinition, registry: ClassRegistry) -> AnalysisContext {
        let class_def = Rc::new(class_def);
        let def = FunctionDefinition::new(tok("constructor"), Type::Void, &class_def);
        AnalysisContext::new(def, LocalVariableStatuses::new(), Rc::new(registry))
    }

    fn invoke(name: QualifiedName, args: Vec<Box<dyn Expression>>) -> ConstructorInvocationStatement {
        ConstructorInvocationStatement::new(name, args)
    }

    fn analyze_invocation(ctx: &mut AnalysisContext, mut stmt: ConstructorInvocationStatement) -> ConstructorInvocationStatement {
        stmt.do_analyze(ctx).unwrap();
        stmt
    }

    #[test]
    fn test_super_call_resolves_parent_constructor() {
        let ctor = FunctionType::new(Signature::new(vec![Type::Number], Type::Void));
        let base = Rc::new(ClassDefinition::new("Base").with_constructor(ctor));
        let mut ctx = ctor_context(ClassDefinition::new("Derived").extends(&base), ClassRegistry::new());

        let stmt = analyze_invocation(&mut ctx, invoke(QualifiedName::new(tok("super")), vec![testing::value(Type::Int)]));
        assert!(ctx.errors.is_empty());
        assert_eq!(stmt.constructing_class_def().map(|c| c.name()), Some("Base"));
        assert_eq!(
            stmt.constructor_type(),
            Some(&Signature::new(vec![Type::Number], Type::Void))
        );
    }

    #[test]
    fn test_super_call_without_superclass() {
        let mut ctx = ctor_context(ClassDefinition::new("Root"), ClassRegistry::new());
        let stmt = analyze_invocation(&mut ctx, invoke(QualifiedName::new(tok("super")), vec![]));
        assert_eq!(messages(&ctx), vec!["class 'Root' has no super class"]);
        assert!(stmt.constructing_class_def().is_none());
    }

    #[test]
    fn test_named_class_lookup() {
        let mixin = Rc::new(ClassDefinition::new("Mixin"));
        let mut registry = ClassRegistry::new();
        registry.register_imported("m", &mixin);
        let mut ctx = ctor_context(ClassDefinition::new("C"), registry);

        let found = analyze_invocation(
            &mut ctx,
            invoke(QualifiedName::imported(tok("m"), tok("Mixin")), vec![]),
        );
        assert_eq!(found.constructing_class_def().map(|c| c.name()), Some("Mixin"));
        assert!(found.constructor_type().is_none());

        let missing = analyze_invocation(&mut ctx, invoke(QualifiedName::new(tok("Mixin")), vec![]));
        assert!(missing.constructing_class_def().is_none());
        assert_eq!(messages(&ctx), vec!["no class definition for 'Mixin'"]);
    }

    #[test]
    fn test_arguments_without_constructor_member() {
        let base = Rc::new(ClassDefinition::new("Base"));
        let mut ctx = ctor_context(ClassDefinition::new("Derived").extends(&base), ClassRegistry::new());
        let stmt = analyze_invocation(&mut ctx, invoke(QualifiedName::new(tok("super")), vec![testing::value(Type::Int)]));
        assert_eq!(messages(&ctx), vec!["no function with matching arguments"]);
        assert!(stmt.constructing_class_def().is_none());
        assert!(stmt.constructor_type().is_none());
    }

    #[test]
    fn test_constructor_is_looked_up_on_class_only() {
        let ctor = FunctionType::new(Signature::new(vec![Type::Int], Type::Void));
        let grand = Rc::new(ClassDefinition::new("Grand").with_constructor(ctor));
        let base = Rc::new(ClassDefinition::new("Base").extends(&grand));
        let mut ctx = ctor_context(ClassDefinition::new("Derived").extends(&base), ClassRegistry::new());
        analyze_invocation(&mut ctx, invoke(QualifiedName::new(tok("super")), vec![testing::value(Type::Int)]));
        assert_eq!(messages(&ctx), vec!["no function with matching arguments"]);
    }

    #[test]
    fn test_failing_argument_aborts_resolution() {
        let ctor = FunctionType::new(Signature::new(vec![Type::Int], Type::Void));
        let base = Rc::new(ClassDefinition::new("Base").with_constructor(ctor));
        let mut ctx = ctor_context(ClassDefinition::new("Derived").extends(&base), ClassRegistry::new());
        let stmt = analyze_invocation(&mut ctx, invoke(QualifiedName::new(tok("super")), vec![testing::failing()]));
        assert_eq!(messages(&ctx), vec!["expression failed"]);
        assert!(stmt.constructing_class_def().is_none());
    }

    // serialization

    #[test]
    fn test_serialized_form_of_loops() {
        let for_stmt: Statement =
            ForStatement::new(tok("for"), label("l"), None, Some(testing::value(Type::Boolean)), None, vec![brk(None)])
                .into();
        assert_eq!(
            for_stmt.serialize(),
            json!([
                "ForStatement",
                ["l", null, 1, 1],
                null,
                ["ValueExpression", ["v", null, 1, 1], "boolean"],
                null,
                [["BreakStatement", ["break", null, 1, 1], null]]
            ])
        );
    }

    #[test]
    fn test_serialized_form_of_try_without_catch() {
        let try_stmt: Statement = TryStatement::new(tok("try"), vec![], None, None, Some(vec![])).into();
        assert_eq!(try_stmt.serialize(), json!(["TryStatement", [], null, null, []]));
        assert_eq!(try_stmt.name(), "TryStatement");
    }

    #[test]
    fn test_serialization_is_deterministic_after_analysis() {
        let build = || {
            vec![
                while_loop(label("outer"), vec![
                    switch_over(Type::String, vec![case_of(Type::Null), DefaultStatement::new(tok("default")).into(), brk(label("outer"))]),
                ]),
                assert_of(vec![Type::Boolean]),
            ]
        };
        let mut first = build();
        let mut second = build();
        analyze_statements(&mut first, &mut testing::context()).unwrap();
        analyze_statements(&mut second, &mut testing::context()).unwrap();

        let first = serialize_array(&first).to_string();
        assert_eq!(first, serialize_array(&second).to_string());
        assert_eq!(first, serialize_array(&second).to_string());
    }
}
