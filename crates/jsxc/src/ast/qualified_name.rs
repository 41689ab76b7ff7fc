//! Possibly import-qualified class names

use std::rc::Rc;

use serde_json::{Value, json};

use crate::common::{CompileError, Token};
use crate::sema::AnalysisContext;
use crate::types::ClassDefinition;
use super::serialize::{Serializable, serialize_nullable};

/// `Name` or `alias.Name`, where `alias` names an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    token: Token,
    import: Option<Token>,
}

impl QualifiedName {
    pub fn new(token: Token) -> Self {
        Self { token, import: None }
    }

    pub fn imported(import: Token, token: Token) -> Self {
        Self { token, import: Some(import) }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn import(&self) -> Option<&Token> {
        self.import.as_ref()
    }

    /// `super` written without an import prefix
    pub fn is_bare_super(&self) -> bool {
        self.import.is_none() && self.token.value() == "super"
    }

    /// Resolve the class, reporting to the context when it does not exist
    pub fn get_class(&self, ctx: &mut AnalysisContext) -> Option<Rc<ClassDefinition>> {
        let alias = self.import.as_ref().map(Token::value);
        if let Some(class_def) = ctx.classes.lookup(alias, self.token.value()) {
            return Some(Rc::clone(class_def));
        }
        let message = match alias {
            Some(alias) => format!(
                "no class definition for '{}' in import '{}'",
                self.token.value(),
                alias
            ),
            None => format!("no class definition for '{}'", self.token.value()),
        };
        ctx.errors.push(CompileError::semantic(&self.token, message));
        None
    }
}

impl Serializable for QualifiedName {
    fn serialize(&self) -> Value {
        json!([
            "QualifiedName",
            self.token.serialize(),
            serialize_nullable(self.import.as_ref())
        ])
    }
}
