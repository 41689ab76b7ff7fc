//! Class definitions and function signatures

use std::fmt;
use std::rc::Rc;

use crate::common::{CompileError, Token};
use super::Type;

/// Where to look when resolving a member by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberMode {
    /// Only the class itself, not its superclasses
    ClassOnly,
    /// The class and then each superclass in turn
    All,
}

/// One callable signature
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub return_type: Type,
    pub params: Vec<Type>,
}

impl Signature {
    pub fn new(params: Vec<Type>, return_type: Type) -> Self {
        Self { return_type, params }
    }

    fn matches_exactly(&self, args: &[Type]) -> bool {
        self.params.len() == args.len() && self.params.iter().zip(args).all(|(p, a)| p == a)
    }

    fn accepts(&self, args: &[Type]) -> bool {
        self.params.len() == args.len()
            && self.params.iter().zip(args).all(|(p, a)| a.is_convertible_to(p))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function (")?;
        for (i, param) in self.params.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") : {}", self.return_type)
    }
}

/// A function member, possibly overloaded
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    signatures: Vec<Signature>,
}

impl FunctionType {
    pub fn new(signature: Signature) -> Self {
        Self { signatures: vec![signature] }
    }

    pub fn overloaded(signatures: Vec<Signature>) -> Self {
        Self { signatures }
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Pick the signature to call with `arg_types`.
    ///
    /// An exact match wins; otherwise the one signature that accepts the
    /// arguments through conversion. Failure is reported to `errors` and
    /// yields `None`.
    pub fn deduce_by_argument_types(
        &self,
        errors: &mut Vec<CompileError>,
        token: &Token,
        arg_types: &[Type],
    ) -> Option<Signature> {
        if let Some(exact) = self.signatures.iter().find(|s| s.matches_exactly(arg_types)) {
            return Some(exact.clone());
        }
        let mut candidates = self.signatures.iter().filter(|s| s.accepts(arg_types));
        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Some(found.clone()),
            (Some(_), Some(_)) => {
                errors.push(CompileError::type_error(token, "result of function resolution is ambiguous"));
                None
            }
            (None, _) => {
                errors.push(CompileError::type_error(token, "no function with matching arguments"));
                None
            }
        }
    }
}

/// Type of a class member
#[derive(Debug, Clone, PartialEq)]
pub enum MemberType {
    Field(Type),
    Function(FunctionType),
}

impl MemberType {
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            MemberType::Function(f) => Some(f),
            MemberType::Field(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct MemberDefinition {
    name: String,
    ty: MemberType,
}

/// A class as far as statement analysis needs it: its name, its
/// superclass and its members
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    name: String,
    extend_class_def: Option<Rc<ClassDefinition>>,
    members: Vec<MemberDefinition>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extend_class_def: None,
            members: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: &Rc<ClassDefinition>) -> Self {
        self.extend_class_def = Some(Rc::clone(superclass));
        self
    }

    pub fn with_member(mut self, name: impl Into<String>, ty: MemberType) -> Self {
        self.members.push(MemberDefinition { name: name.into(), ty });
        self
    }

    /// Shorthand for adding a `constructor` member
    pub fn with_constructor(self, ctor: FunctionType) -> Self {
        self.with_member("constructor", MemberType::Function(ctor))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extend_class_def(&self) -> Option<&Rc<ClassDefinition>> {
        self.extend_class_def.as_ref()
    }

    pub fn member_type_by_name(&self, name: &str, mode: MemberMode) -> Option<&MemberType> {
        if let Some(member) = self.members.iter().find(|m| m.name == name) {
            return Some(&member.ty);
        }
        match (mode, &self.extend_class_def) {
            (MemberMode::All, Some(parent)) => parent.member_type_by_name(name, mode),
            _ => None,
        }
    }

    /// Whether this class is `other` or inherits from it
    pub fn is_subclass_of(&self, other: &ClassDefinition) -> bool {
        if self == other {
            return true;
        }
        self.extend_class_def
            .as_ref()
            .is_some_and(|parent| parent.is_subclass_of(other))
    }
}

impl PartialEq for ClassDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
