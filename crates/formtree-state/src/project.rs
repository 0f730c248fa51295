//! Model projection: from a state node tree back to plain data.
//!
//! The exact inverse of derivation. Leaves project to their raw value,
//! records to objects in field order, array containers to sequences of
//! their elements' projections. Classification failures cannot occur here;
//! the deriver already rejected anything it could not classify, so
//! projection is total and infallible over derived state.

use crate::node::{FieldNode, FieldValue};
use serde_json::{Map, Value};

/// Project a node's subtree to a plain value.
pub(crate) fn project(node: &FieldNode) -> Value {
    project_field(&node.lock().value)
}

pub(crate) fn project_field(value: &FieldValue) -> Value {
    match value {
        FieldValue::Leaf(v) => v.clone(),
        FieldValue::Record(fields) => {
            let mut obj = Map::with_capacity(fields.len());
            for (name, node) in fields {
                obj.insert(name.clone(), project(node));
            }
            Value::Object(obj)
        }
        FieldValue::Array(arr) => Value::Array(arr.items().iter().map(project).collect()),
    }
}
