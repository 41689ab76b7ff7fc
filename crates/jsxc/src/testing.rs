//! Fixture builders shared by the unit tests

use std::rc::Rc;

use crate::ast::{Expression, ValueExpression};
use crate::common::{Span, Token};
use crate::sema::{AnalysisContext, ClassRegistry, FunctionDefinition, LocalVariableStatuses};
use crate::types::{ClassDefinition, Type};

pub fn tok(value: &str) -> Token {
    Token::new(value, None, 1, 1, Span::default())
}

pub fn value(ty: Type) -> Box<dyn Expression> {
    Box::new(ValueExpression::typed(tok("v"), ty))
}

pub fn failing() -> Box<dyn Expression> {
    Box::new(ValueExpression::failing(tok("bad"), "expression failed"))
}

pub fn untyped() -> Box<dyn Expression> {
    Box::new(ValueExpression::untyped(tok("unknown")))
}

pub fn function_def(return_type: Type) -> FunctionDefinition {
    let class_def = Rc::new(ClassDefinition::new("Test"));
    FunctionDefinition::new(tok("f"), return_type, &class_def)
}

pub fn context() -> AnalysisContext {
    context_returning(Type::Void)
}

pub fn context_returning(return_type: Type) -> AnalysisContext {
    AnalysisContext::new(
        function_def(return_type),
        LocalVariableStatuses::new(),
        Rc::new(ClassRegistry::new()),
    )
}
