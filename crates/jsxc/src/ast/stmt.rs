//! Statement AST nodes

use std::rc::Rc;

use serde_json::{Value, json};

use crate::common::Token;
use crate::types::{ClassDefinition, Signature};
use super::serialize::{Serializable, serialize_array, serialize_nullable, serialize_nullable_array};
use super::{Expression, QualifiedName};

/// Statement node
#[derive(Debug)]
pub enum Statement {
    /// `super(args)` or `Base(args)` inside a constructor
    ConstructorInvocation(ConstructorInvocationStatement),
    /// expr;
    Expression(ExpressionStatement),
    /// return expr;
    Return(ReturnStatement),
    /// delete map[key];
    Delete(DeleteStatement),
    /// break [label]; / continue [label];
    Jump(JumpStatement),
    /// do { ... } while (expr);
    DoWhile(DoWhileStatement),
    /// for (identifier in expr) { ... }
    ForIn(ForInStatement),
    /// for (init; cond; post) { ... }
    For(ForStatement),
    /// if (expr) { ... } else { ... }
    If(IfStatement),
    /// switch (expr) { ... }
    Switch(SwitchStatement),
    /// case expr:
    Case(CaseStatement),
    /// default:
    Default(DefaultStatement),
    /// while (expr) { ... }
    While(WhileStatement),
    /// try { ... } catch (e) { ... } finally { ... }
    Try(TryStatement),
    /// assert expr, ...;
    Assert(AssertStatement),
    /// log expr, ...;
    Log(LogStatement),
}

/// Shared surface of every statement variant
pub trait StatementNode: Serializable {
    /// Tag used in the structural form
    fn name(&self) -> &'static str;

    /// Location diagnostics and fault logs refer to
    fn token(&self) -> &Token;
}

macro_rules! for_each_variant {
    ($stmt:expr, $s:ident => $body:expr) => {
        match $stmt {
            Statement::ConstructorInvocation($s) => $body,
            Statement::Expression($s) => $body,
            Statement::Return($s) => $body,
            Statement::Delete($s) => $body,
            Statement::Jump($s) => $body,
            Statement::DoWhile($s) => $body,
            Statement::ForIn($s) => $body,
            Statement::For($s) => $body,
            Statement::If($s) => $body,
            Statement::Switch($s) => $body,
            Statement::Case($s) => $body,
            Statement::Default($s) => $body,
            Statement::While($s) => $body,
            Statement::Try($s) => $body,
            Statement::Assert($s) => $body,
            Statement::Log($s) => $body,
        }
    };
}

pub(crate) use for_each_variant;

impl StatementNode for Statement {
    fn name(&self) -> &'static str {
        for_each_variant!(self, s => s.name())
    }

    fn token(&self) -> &Token {
        for_each_variant!(self, s => s.token())
    }
}

impl Serializable for Statement {
    fn serialize(&self) -> Value {
        for_each_variant!(self, s => s.serialize())
    }
}

fn label_slot(label: Option<&Token>) -> Value {
    serialize_nullable(label)
}

// Statements built around a single expression

#[derive(Debug)]
pub struct ConstructorInvocationStatement {
    pub(crate) qualified_name: QualifiedName,
    pub(crate) args: Vec<Box<dyn Expression>>,
    pub(crate) ctor_class_def: Option<Rc<ClassDefinition>>,
    pub(crate) ctor_type: Option<Signature>,
}

impl ConstructorInvocationStatement {
    pub fn new(qualified_name: QualifiedName, args: Vec<Box<dyn Expression>>) -> Self {
        Self {
            qualified_name,
            args,
            ctor_class_def: None,
            ctor_type: None,
        }
    }

    pub fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }

    pub fn arguments(&self) -> &[Box<dyn Expression>] {
        &self.args
    }

    /// Class whose constructor is invoked; set by a successful analysis
    pub fn constructing_class_def(&self) -> Option<&Rc<ClassDefinition>> {
        self.ctor_class_def.as_ref()
    }

    /// Constructor signature picked for the arguments; set by a successful
    /// analysis of a class that declares a constructor
    pub fn constructor_type(&self) -> Option<&Signature> {
        self.ctor_type.as_ref()
    }
}

impl StatementNode for ConstructorInvocationStatement {
    fn name(&self) -> &'static str {
        "ConstructorInvocationStatement"
    }

    fn token(&self) -> &Token {
        self.qualified_name.token()
    }
}

impl Serializable for ConstructorInvocationStatement {
    fn serialize(&self) -> Value {
        json!([self.name(), self.qualified_name.serialize(), serialize_array(&self.args)])
    }
}

#[derive(Debug)]
pub struct ExpressionStatement {
    pub(crate) expr: Box<dyn Expression>,
}

impl ExpressionStatement {
    pub fn new(expr: Box<dyn Expression>) -> Self {
        Self { expr }
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }
}

impl StatementNode for ExpressionStatement {
    fn name(&self) -> &'static str {
        "ExpressionStatement"
    }

    fn token(&self) -> &Token {
        self.expr.token()
    }
}

impl Serializable for ExpressionStatement {
    fn serialize(&self) -> Value {
        json!([self.name(), self.expr.serialize()])
    }
}

#[derive(Debug)]
pub struct ReturnStatement {
    pub(crate) token: Token,
    pub(crate) expr: Box<dyn Expression>,
}

impl ReturnStatement {
    pub fn new(token: Token, expr: Box<dyn Expression>) -> Self {
        Self { token, expr }
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }

    /// The `return` keyword
    pub fn keyword(&self) -> &Token {
        &self.token
    }
}

impl StatementNode for ReturnStatement {
    fn name(&self) -> &'static str {
        "ReturnStatement"
    }

    // Anchored at the returned expression; diagnostics use the keyword.
    fn token(&self) -> &Token {
        self.expr.token()
    }
}

impl Serializable for ReturnStatement {
    fn serialize(&self) -> Value {
        json!([self.name(), self.expr.serialize()])
    }
}

#[derive(Debug)]
pub struct DeleteStatement {
    pub(crate) token: Token,
    pub(crate) expr: Box<dyn Expression>,
}

impl DeleteStatement {
    pub fn new(token: Token, expr: Box<dyn Expression>) -> Self {
        Self { token, expr }
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }
}

impl StatementNode for DeleteStatement {
    fn name(&self) -> &'static str {
        "DeleteStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for DeleteStatement {
    fn serialize(&self) -> Value {
        json!([self.name(), self.expr.serialize()])
    }
}

// break and continue

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Break,
    Continue,
}

#[derive(Debug, Clone)]
pub struct JumpStatement {
    pub(crate) kind: JumpKind,
    pub(crate) token: Token,
    pub(crate) label: Option<Token>,
}

impl JumpStatement {
    pub fn new(kind: JumpKind, token: Token, label: Option<Token>) -> Self {
        Self { kind, token, label }
    }

    pub fn new_break(token: Token, label: Option<Token>) -> Self {
        Self::new(JumpKind::Break, token, label)
    }

    pub fn new_continue(token: Token, label: Option<Token>) -> Self {
        Self::new(JumpKind::Continue, token, label)
    }

    pub fn kind(&self) -> JumpKind {
        self.kind
    }

    pub fn label(&self) -> Option<&Token> {
        self.label.as_ref()
    }
}

impl StatementNode for JumpStatement {
    fn name(&self) -> &'static str {
        match self.kind {
            JumpKind::Break => "BreakStatement",
            JumpKind::Continue => "ContinueStatement",
        }
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for JumpStatement {
    fn serialize(&self) -> Value {
        json!([self.name(), self.token.serialize(), label_slot(self.label.as_ref())])
    }
}

// Labellable statements: loops and switch

#[derive(Debug)]
pub struct DoWhileStatement {
    pub(crate) token: Token,
    pub(crate) label: Option<Token>,
    pub(crate) expr: Box<dyn Expression>,
    pub(crate) statements: Vec<Statement>,
}

impl DoWhileStatement {
    pub fn new(token: Token, label: Option<Token>, expr: Box<dyn Expression>, statements: Vec<Statement>) -> Self {
        Self { token, label, expr, statements }
    }

    pub fn label(&self) -> Option<&Token> {
        self.label.as_ref()
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

impl StatementNode for DoWhileStatement {
    fn name(&self) -> &'static str {
        "DoWhileStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for DoWhileStatement {
    fn serialize(&self) -> Value {
        json!([
            self.name(),
            label_slot(self.label.as_ref()),
            self.expr.serialize(),
            serialize_array(&self.statements)
        ])
    }
}

#[derive(Debug)]
pub struct ForInStatement {
    pub(crate) token: Token,
    pub(crate) label: Option<Token>,
    pub(crate) identifier: Token,
    pub(crate) expr: Box<dyn Expression>,
    pub(crate) statements: Vec<Statement>,
}

impl ForInStatement {
    pub fn new(
        token: Token,
        label: Option<Token>,
        identifier: Token,
        expr: Box<dyn Expression>,
        statements: Vec<Statement>,
    ) -> Self {
        Self { token, label, identifier, expr, statements }
    }

    pub fn label(&self) -> Option<&Token> {
        self.label.as_ref()
    }

    /// The loop variable
    pub fn identifier(&self) -> &Token {
        &self.identifier
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

impl StatementNode for ForInStatement {
    fn name(&self) -> &'static str {
        "ForInStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for ForInStatement {
    fn serialize(&self) -> Value {
        json!([
            self.name(),
            label_slot(self.label.as_ref()),
            self.identifier.serialize(),
            self.expr.serialize(),
            serialize_array(&self.statements)
        ])
    }
}

#[derive(Debug)]
pub struct ForStatement {
    pub(crate) token: Token,
    pub(crate) label: Option<Token>,
    pub(crate) init_expr: Option<Box<dyn Expression>>,
    pub(crate) cond_expr: Option<Box<dyn Expression>>,
    pub(crate) post_expr: Option<Box<dyn Expression>>,
    pub(crate) statements: Vec<Statement>,
}

impl ForStatement {
    pub fn new(
        token: Token,
        label: Option<Token>,
        init_expr: Option<Box<dyn Expression>>,
        cond_expr: Option<Box<dyn Expression>>,
        post_expr: Option<Box<dyn Expression>>,
        statements: Vec<Statement>,
    ) -> Self {
        Self { token, label, init_expr, cond_expr, post_expr, statements }
    }

    pub fn label(&self) -> Option<&Token> {
        self.label.as_ref()
    }

    pub fn init_expr(&self) -> Option<&dyn Expression> {
        self.init_expr.as_deref()
    }

    pub fn cond_expr(&self) -> Option<&dyn Expression> {
        self.cond_expr.as_deref()
    }

    pub fn post_expr(&self) -> Option<&dyn Expression> {
        self.post_expr.as_deref()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

impl StatementNode for ForStatement {
    fn name(&self) -> &'static str {
        "ForStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for ForStatement {
    fn serialize(&self) -> Value {
        json!([
            self.name(),
            label_slot(self.label.as_ref()),
            serialize_nullable(self.init_expr.as_ref()),
            serialize_nullable(self.cond_expr.as_ref()),
            serialize_nullable(self.post_expr.as_ref()),
            serialize_array(&self.statements)
        ])
    }
}

#[derive(Debug)]
pub struct SwitchStatement {
    pub(crate) token: Token,
    pub(crate) label: Option<Token>,
    pub(crate) expr: Box<dyn Expression>,
    pub(crate) statements: Vec<Statement>,
}

impl SwitchStatement {
    pub fn new(token: Token, label: Option<Token>, expr: Box<dyn Expression>, statements: Vec<Statement>) -> Self {
        Self { token, label, expr, statements }
    }

    pub fn label(&self) -> Option<&Token> {
        self.label.as_ref()
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

impl StatementNode for SwitchStatement {
    fn name(&self) -> &'static str {
        "SwitchStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for SwitchStatement {
    fn serialize(&self) -> Value {
        json!([
            self.name(),
            label_slot(self.label.as_ref()),
            self.expr.serialize(),
            serialize_array(&self.statements)
        ])
    }
}

#[derive(Debug)]
pub struct WhileStatement {
    pub(crate) token: Token,
    pub(crate) label: Option<Token>,
    pub(crate) expr: Box<dyn Expression>,
    pub(crate) statements: Vec<Statement>,
}

impl WhileStatement {
    pub fn new(token: Token, label: Option<Token>, expr: Box<dyn Expression>, statements: Vec<Statement>) -> Self {
        Self { token, label, expr, statements }
    }

    pub fn label(&self) -> Option<&Token> {
        self.label.as_ref()
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

impl StatementNode for WhileStatement {
    fn name(&self) -> &'static str {
        "WhileStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for WhileStatement {
    fn serialize(&self) -> Value {
        json!([
            self.name(),
            label_slot(self.label.as_ref()),
            self.expr.serialize(),
            serialize_array(&self.statements)
        ])
    }
}

// Other control flow

#[derive(Debug)]
pub struct IfStatement {
    pub(crate) token: Token,
    pub(crate) expr: Box<dyn Expression>,
    pub(crate) on_true_statements: Vec<Statement>,
    pub(crate) on_false_statements: Vec<Statement>,
}

impl IfStatement {
    pub fn new(
        token: Token,
        expr: Box<dyn Expression>,
        on_true_statements: Vec<Statement>,
        on_false_statements: Vec<Statement>,
    ) -> Self {
        Self { token, expr, on_true_statements, on_false_statements }
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }

    pub fn on_true_statements(&self) -> &[Statement] {
        &self.on_true_statements
    }

    pub fn on_false_statements(&self) -> &[Statement] {
        &self.on_false_statements
    }
}

impl StatementNode for IfStatement {
    fn name(&self) -> &'static str {
        "IfStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for IfStatement {
    fn serialize(&self) -> Value {
        json!([
            self.name(),
            self.expr.serialize(),
            serialize_array(&self.on_true_statements),
            serialize_array(&self.on_false_statements)
        ])
    }
}

#[derive(Debug)]
pub struct CaseStatement {
    pub(crate) token: Token,
    pub(crate) expr: Box<dyn Expression>,
}

impl CaseStatement {
    pub fn new(token: Token, expr: Box<dyn Expression>) -> Self {
        Self { token, expr }
    }

    pub fn expr(&self) -> &dyn Expression {
        self.expr.as_ref()
    }
}

impl StatementNode for CaseStatement {
    fn name(&self) -> &'static str {
        "CaseStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for CaseStatement {
    fn serialize(&self) -> Value {
        json!([self.name(), self.expr.serialize()])
    }
}

#[derive(Debug, Clone)]
pub struct DefaultStatement {
    pub(crate) token: Token,
}

impl DefaultStatement {
    pub fn new(token: Token) -> Self {
        Self { token }
    }
}

impl StatementNode for DefaultStatement {
    fn name(&self) -> &'static str {
        "DefaultStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for DefaultStatement {
    fn serialize(&self) -> Value {
        json!([self.name()])
    }
}

#[derive(Debug)]
pub struct TryStatement {
    pub(crate) token: Token,
    pub(crate) try_statements: Vec<Statement>,
    pub(crate) catch_identifier: Option<Token>,
    pub(crate) catch_statements: Option<Vec<Statement>>,
    pub(crate) finally_statements: Option<Vec<Statement>>,
}

impl TryStatement {
    pub fn new(
        token: Token,
        try_statements: Vec<Statement>,
        catch_identifier: Option<Token>,
        catch_statements: Option<Vec<Statement>>,
        finally_statements: Option<Vec<Statement>>,
    ) -> Self {
        Self { token, try_statements, catch_identifier, catch_statements, finally_statements }
    }

    pub fn try_statements(&self) -> &[Statement] {
        &self.try_statements
    }

    pub fn catch_identifier(&self) -> Option<&Token> {
        self.catch_identifier.as_ref()
    }

    pub fn catch_statements(&self) -> Option<&[Statement]> {
        self.catch_statements.as_deref()
    }

    pub fn finally_statements(&self) -> Option<&[Statement]> {
        self.finally_statements.as_deref()
    }
}

impl StatementNode for TryStatement {
    fn name(&self) -> &'static str {
        "TryStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for TryStatement {
    fn serialize(&self) -> Value {
        json!([
            self.name(),
            serialize_array(&self.try_statements),
            serialize_nullable(self.catch_identifier.as_ref()),
            serialize_nullable_array(self.catch_statements.as_deref()),
            serialize_nullable_array(self.finally_statements.as_deref())
        ])
    }
}

// Information statements

#[derive(Debug)]
pub struct AssertStatement {
    pub(crate) token: Token,
    pub(crate) exprs: Vec<Box<dyn Expression>>,
}

impl AssertStatement {
    pub fn new(token: Token, exprs: Vec<Box<dyn Expression>>) -> Self {
        Self { token, exprs }
    }

    pub fn exprs(&self) -> &[Box<dyn Expression>] {
        &self.exprs
    }
}

impl StatementNode for AssertStatement {
    fn name(&self) -> &'static str {
        "AssertStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for AssertStatement {
    fn serialize(&self) -> Value {
        json!([self.name(), serialize_array(&self.exprs)])
    }
}

#[derive(Debug)]
pub struct LogStatement {
    pub(crate) token: Token,
    pub(crate) exprs: Vec<Box<dyn Expression>>,
}

impl LogStatement {
    pub fn new(token: Token, exprs: Vec<Box<dyn Expression>>) -> Self {
        Self { token, exprs }
    }

    pub fn exprs(&self) -> &[Box<dyn Expression>] {
        &self.exprs
    }
}

impl StatementNode for LogStatement {
    fn name(&self) -> &'static str {
        "LogStatement"
    }

    fn token(&self) -> &Token {
        &self.token
    }
}

impl Serializable for LogStatement {
    fn serialize(&self) -> Value {
        json!([self.name(), serialize_array(&self.exprs)])
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Statement {
                fn from(stmt: $ty) -> Self {
                    Statement::$variant(stmt)
                }
            }
        )*
    };
}

impl_from_variant! {
    ConstructorInvocation(ConstructorInvocationStatement),
    Expression(ExpressionStatement),
    Return(ReturnStatement),
    Delete(DeleteStatement),
    Jump(JumpStatement),
    DoWhile(DoWhileStatement),
    ForIn(ForInStatement),
    For(ForStatement),
    If(IfStatement),
    Switch(SwitchStatement),
    Case(CaseStatement),
    Default(DefaultStatement),
    While(WhileStatement),
    Try(TryStatement),
    Assert(AssertStatement),
    Log(LogStatement),
}
