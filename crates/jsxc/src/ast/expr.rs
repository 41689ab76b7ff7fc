//! Expressions, as far as statement analysis is concerned
//!
//! Expression type inference lives outside this crate. Statements only
//! need to analyze an expression, ask for its type and, for `delete`, look
//! inside an index access. The concrete expressions here cover exactly that
//! surface: pre-typed values, local variable reads and writes, and index
//! access on hash objects.

use std::fmt;

use serde_json::{Value, json};

use crate::common::{CompileError, Token};
use crate::sema::{AnalysisContext, LocalVariableStatus};
use crate::types::Type;
use super::serialize::Serializable;

/// An expression node.
///
/// `analyze` returns `false` when it reported an error; the caller must not
/// add a follow-up diagnostic in that case. `ty` is `None` until a
/// successful analysis and may stay `None` when the type is unknown because
/// of an error reported elsewhere.
pub trait Expression: Serializable + fmt::Debug {
    fn token(&self) -> &Token;

    fn analyze(&mut self, ctx: &mut AnalysisContext) -> bool;

    fn ty(&self) -> Option<&Type>;

    /// The key operand if this is a `base[key]` access
    fn index_key(&self) -> Option<&dyn Expression> {
        None
    }
}

/// A value whose type is already known (literals, calls resolved upstream)
#[derive(Debug, Clone)]
pub struct ValueExpression {
    token: Token,
    declared: Option<Type>,
    failure: Option<String>,
    ty: Option<Type>,
}

impl ValueExpression {
    pub fn typed(token: Token, ty: Type) -> Self {
        Self { token, declared: Some(ty), failure: None, ty: None }
    }

    /// A value whose analysis reports `message` and fails
    pub fn failing(token: Token, message: impl Into<String>) -> Self {
        Self { token, declared: None, failure: Some(message.into()), ty: None }
    }

    /// A value that analyzes cleanly but whose type stays unknown
    pub fn untyped(token: Token) -> Self {
        Self { token, declared: None, failure: None, ty: None }
    }
}

impl Expression for ValueExpression {
    fn token(&self) -> &Token {
        &self.token
    }

    fn analyze(&mut self, ctx: &mut AnalysisContext) -> bool {
        if let Some(message) = &self.failure {
            ctx.errors.push(CompileError::type_error(&self.token, message.clone()));
            return false;
        }
        self.ty.clone_from(&self.declared);
        true
    }

    fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }
}

impl Serializable for ValueExpression {
    fn serialize(&self) -> Value {
        json!([
            "ValueExpression",
            self.token.serialize(),
            self.declared.as_ref().map(Type::to_string)
        ])
    }
}

/// Read of a local variable
#[derive(Debug, Clone)]
pub struct LocalExpression {
    token: Token,
    declared: Type,
    ty: Option<Type>,
}

impl LocalExpression {
    pub fn new(token: Token, declared: Type) -> Self {
        Self { token, declared, ty: None }
    }
}

impl Expression for LocalExpression {
    fn token(&self) -> &Token {
        &self.token
    }

    fn analyze(&mut self, ctx: &mut AnalysisContext) -> bool {
        let name = self.token.value();
        match ctx.top_block().statuses.status(name) {
            Some(LocalVariableStatus::Set) => {
                self.ty = Some(self.declared.clone());
                true
            }
            Some(LocalVariableStatus::Unset) => {
                ctx.errors.push(CompileError::semantic(
                    &self.token,
                    format!("variable is not initialized: {}", name),
                ));
                false
            }
            None => {
                ctx.errors.push(CompileError::semantic(
                    &self.token,
                    format!("local variable '{}' is not declared", name),
                ));
                false
            }
        }
    }

    fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }
}

impl Serializable for LocalExpression {
    fn serialize(&self) -> Value {
        json!(["LocalExpression", self.token.serialize(), self.declared.to_string()])
    }
}

/// `name = value` where `name` is a local variable
#[derive(Debug)]
pub struct AssignLocalExpression {
    token: Token,
    value: Box<dyn Expression>,
    ty: Option<Type>,
}

impl AssignLocalExpression {
    pub fn new(token: Token, value: Box<dyn Expression>) -> Self {
        Self { token, value, ty: None }
    }
}

impl Expression for AssignLocalExpression {
    fn token(&self) -> &Token {
        &self.token
    }

    fn analyze(&mut self, ctx: &mut AnalysisContext) -> bool {
        if !self.value.analyze(ctx) {
            return false;
        }
        let name = self.token.value();
        if !ctx.top_block_mut().statuses.set(name) {
            ctx.errors.push(CompileError::semantic(
                &self.token,
                format!("local variable '{}' is not declared", name),
            ));
            return false;
        }
        self.ty = self.value.ty().cloned();
        true
    }

    fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }
}

impl Serializable for AssignLocalExpression {
    fn serialize(&self) -> Value {
        json!(["AssignmentExpression", self.token.serialize(), self.value.serialize()])
    }
}

/// `base[key]`
#[derive(Debug)]
pub struct IndexExpression {
    token: Token,
    base: Box<dyn Expression>,
    key: Box<dyn Expression>,
    ty: Option<Type>,
}

impl IndexExpression {
    pub fn new(token: Token, base: Box<dyn Expression>, key: Box<dyn Expression>) -> Self {
        Self { token, base, key, ty: None }
    }
}

impl Expression for IndexExpression {
    fn token(&self) -> &Token {
        &self.token
    }

    fn analyze(&mut self, ctx: &mut AnalysisContext) -> bool {
        if !self.base.analyze(ctx) || !self.key.analyze(ctx) {
            return false;
        }
        let Some(base_ty) = self.base.ty() else {
            return true;
        };
        match base_ty.resolve_if_may_be_undefined() {
            Type::Map(element) | Type::Array(element) => {
                self.ty = Some(Type::may_be_undefined((**element).clone()));
                true
            }
            Type::Variant => {
                self.ty = Some(Type::Variant);
                true
            }
            other => {
                ctx.errors.push(CompileError::type_error(
                    &self.token,
                    format!("cannot apply operator '[]' to type '{}'", other),
                ));
                false
            }
        }
    }

    fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    fn index_key(&self) -> Option<&dyn Expression> {
        Some(self.key.as_ref())
    }
}

impl Serializable for IndexExpression {
    fn serialize(&self) -> Value {
        json!([
            "ArrayExpression",
            self.token.serialize(),
            self.base.serialize(),
            self.key.serialize()
        ])
    }
}
