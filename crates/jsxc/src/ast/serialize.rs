//! Structural serialization of analyzed trees
//!
//! Every node serializes to a JSON array whose first element is the node's
//! tag. Absent optional children are `null`; statement and expression lists
//! are nested arrays.

use serde_json::{Value, json};

use crate::common::Token;

/// A node that can be dumped to its structural form
pub trait Serializable {
    fn serialize(&self) -> Value;
}

impl<T: Serializable + ?Sized> Serializable for Box<T> {
    fn serialize(&self) -> Value {
        (**self).serialize()
    }
}

impl Serializable for Token {
    fn serialize(&self) -> Value {
        json!([self.value(), self.filename(), self.line(), self.column()])
    }
}

pub fn serialize_nullable<T: Serializable + ?Sized>(node: Option<&T>) -> Value {
    node.map_or(Value::Null, Serializable::serialize)
}

pub fn serialize_array<T: Serializable>(nodes: &[T]) -> Value {
    Value::Array(nodes.iter().map(Serializable::serialize).collect())
}

pub fn serialize_nullable_array<T: Serializable>(nodes: Option<&[T]>) -> Value {
    nodes.map_or(Value::Null, serialize_array)
}
