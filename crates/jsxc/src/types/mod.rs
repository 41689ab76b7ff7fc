//! Type information consumed by statement analysis

mod class_def;
mod ty;

pub use class_def::{ClassDefinition, FunctionType, MemberMode, MemberType, Signature};
pub use ty::Type;
