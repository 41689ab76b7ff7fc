//! Abstract Syntax Tree definitions for function bodies

mod expr;
mod qualified_name;
mod serialize;
mod stmt;

pub use expr::{AssignLocalExpression, Expression, IndexExpression, LocalExpression, ValueExpression};
pub use qualified_name::QualifiedName;
pub use serialize::{Serializable, serialize_array, serialize_nullable, serialize_nullable_array};
pub use stmt::*;

pub(crate) use stmt::for_each_variant;
