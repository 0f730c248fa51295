//! Structural equality oracle.
//!
//! Dirtiness is defined as inequality between a node's current value and its
//! creation-time snapshot. The comparison walks the live state tree (which
//! mixes nodes, array containers and raw values) against a plain JSON value
//! in lock-step, unwrapping node and container layers as it goes. The
//! predicate is total: it classifies rather than fails, and it never panics.
//!
//! Record comparison checks key-set cardinality and then iterates one side's
//! keys only. With equal counts and a key missing on the other side the
//! pair compares unequal here; descriptors fix the key set of every record
//! the deriver produces, so equal-count-different-keys cannot reach this
//! code from derived state.

use crate::node::{FieldNode, FieldValue};
use serde_json::Value;

/// Structural equality over plain JSON values.
///
/// Null only equals null. Scalars compare strictly (`1` and `1.0` are
/// distinct). Sequences require equal length and element-wise equality;
/// records require equal key count and per-key equality. Both walks
/// short-circuit on the first mismatch.
pub fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| value_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| value_eq(x, y)))
        }
        _ => false,
    }
}

/// Equality between a live field value and a plain snapshot.
///
/// Node and container layers unwrap to their contents one level at a time;
/// the recursion makes nested wrapping unwrap fully.
pub(crate) fn field_eq(current: &FieldValue, original: &Value) -> bool {
    match current {
        FieldValue::Leaf(v) => value_eq(v, original),
        FieldValue::Record(fields) => match original {
            Value::Object(obj) => {
                fields.len() == obj.len()
                    && fields
                        .iter()
                        .all(|(name, node)| obj.get(name).is_some_and(|ov| node_eq(node, ov)))
            }
            _ => false,
        },
        FieldValue::Array(arr) => match original {
            Value::Array(items) => {
                arr.len() == items.len()
                    && arr
                        .items()
                        .iter()
                        .zip(items)
                        .all(|(node, ov)| node_eq(node, ov))
            }
            _ => false,
        },
    }
}

fn node_eq(node: &FieldNode, original: &Value) -> bool {
    field_eq(&node.lock().value, original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_only_equals_null() {
        assert!(value_eq(&json!(null), &json!(null)));
        assert!(!value_eq(&json!(null), &json!("")));
        assert!(!value_eq(&json!(0), &json!(null)));
        assert!(!value_eq(&json!(null), &json!(false)));
    }

    #[test]
    fn test_scalar_strictness() {
        assert!(value_eq(&json!("a"), &json!("a")));
        assert!(!value_eq(&json!("a"), &json!("b")));
        assert!(value_eq(&json!(3), &json!(3)));
        assert!(!value_eq(&json!(1), &json!(1.0)));
        assert!(!value_eq(&json!(true), &json!(1)));
    }

    #[test]
    fn test_sequences() {
        assert!(value_eq(&json!([1, 2, 3]), &json!([1, 2, 3])));
        assert!(!value_eq(&json!([1, 2]), &json!([1, 2, 3])));
        assert!(!value_eq(&json!([1, 2, 3]), &json!([1, 9, 3])));
        assert!(value_eq(&json!([]), &json!([])));
        assert!(!value_eq(&json!([]), &json!({})));
    }

    #[test]
    fn test_records() {
        assert!(value_eq(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!value_eq(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!value_eq(&json!({"a": 1}), &json!({"b": 1})));
        assert!(!value_eq(&json!({"a": {"x": 1}}), &json!({"a": {"x": 2}})));
    }

    #[test]
    fn test_deep_nesting() {
        let a = json!({"p": {"q": [{"r": [1, 2]}]}});
        let b = json!({"p": {"q": [{"r": [1, 2]}]}});
        let c = json!({"p": {"q": [{"r": [1, 3]}]}});
        assert!(value_eq(&a, &b));
        assert!(!value_eq(&a, &c));
    }
}
