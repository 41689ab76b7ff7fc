//! Value types as seen by the statement analyzer

use std::fmt;
use std::rc::Rc;

use super::ClassDefinition;

/// Type of an expression.
///
/// Only the comparisons needed by statement analysis are implemented here:
/// equality, convertibility, the int-or-number family test and unwrapping of
/// `MayBeUndefined`.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Void,
    Null,
    Boolean,
    Int,
    Number,
    String,
    Variant,
    /// `T` that may also be `undefined`
    MayBeUndefined(Box<Type>),
    /// Instance of a class
    Object(Rc<ClassDefinition>),
    /// `T[]`
    Array(Box<Type>),
    /// `Map.<T>`, the hash object
    Map(Box<Type>),
}

impl Type {
    pub fn may_be_undefined(inner: Type) -> Self {
        match inner {
            Type::MayBeUndefined(_) => inner,
            other => Type::MayBeUndefined(Box::new(other)),
        }
    }

    pub fn array_of(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn map_of(element: Type) -> Self {
        Type::Map(Box::new(element))
    }

    pub fn object(class_def: &Rc<ClassDefinition>) -> Self {
        Type::Object(Rc::clone(class_def))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Null)
    }

    /// Int and number are interchangeable for comparisons.
    pub fn is_integer_or_number(&self) -> bool {
        matches!(self, Type::Int | Type::Number)
    }

    /// Strip one `MayBeUndefined` wrapper, if any
    pub fn resolve_if_may_be_undefined(&self) -> &Type {
        match self {
            Type::MayBeUndefined(inner) => inner,
            other => other,
        }
    }

    /// Whether `null` is a valid value of this type
    fn accepts_null(&self) -> bool {
        match self {
            Type::String | Type::Object(_) | Type::Array(_) | Type::Map(_) | Type::Variant => true,
            Type::MayBeUndefined(inner) => inner.accepts_null(),
            _ => false,
        }
    }

    /// Whether a value of this type may be used where `target` is expected
    pub fn is_convertible_to(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        match (self, target) {
            (Type::Void, _) | (_, Type::Void) => false,
            (_, Type::Variant) => true,
            (Type::Null, _) => target.accepts_null(),
            (Type::Int, Type::Number) | (Type::Number, Type::Int) => true,
            (Type::MayBeUndefined(source), Type::MayBeUndefined(inner)) => source.is_convertible_to(inner),
            (Type::MayBeUndefined(_), _) => false,
            (_, Type::MayBeUndefined(inner)) => self.is_convertible_to(inner),
            (Type::Object(source), Type::Object(dest)) => source.is_subclass_of(dest),
            (Type::Array(source), Type::Array(dest)) | (Type::Map(source), Type::Map(dest)) => source == dest,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Boolean => write!(f, "boolean"),
            Type::Int => write!(f, "int"),
            Type::Number => write!(f, "number"),
            Type::String => write!(f, "string"),
            Type::Variant => write!(f, "variant"),
            Type::MayBeUndefined(inner) => write!(f, "MayBeUndefined.<{}>", inner),
            Type::Object(class_def) => write!(f, "{}", class_def.name()),
            Type::Array(element) => write!(f, "{}[]", element),
            Type::Map(element) => write!(f, "Map.<{}>", element),
        }
    }
}
