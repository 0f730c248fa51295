//! Tree derivation: from a plain value plus descriptor to a state node tree.
//!
//! Derivation walks the value and its descriptor together and produces one
//! node per reachable position, the isomorphism every other part of the
//! engine relies on. Record derivation follows the value's own key order
//! and looks each key up in the descriptor; a key the descriptor does not
//! declare is a construction error, as is any value/descriptor kind
//! mismatch. Union positions resolve their concrete record variant from the
//! discriminant field in the value itself, so the runtime shape wins over
//! the statically declared union.

use crate::array::FormArray;
use crate::ctx::PathCtx;
use crate::error::{value_type_name, FormError, FormResult};
use crate::form::FormCore;
use crate::node::{FieldNode, FieldValue};
use formtree_contract::{Descriptor, RecordDescriptor};
use serde_json::Value;
use std::sync::{Arc, Weak};

/// Derive a state node for `value` under `ctx`.
pub(crate) fn derive_node(
    value: &Value,
    descriptor: &Descriptor,
    ctx: Arc<PathCtx>,
    required: bool,
    form: Weak<FormCore>,
) -> FormResult<FieldNode> {
    let field_value = derive_value(value, descriptor, &ctx, &form)?;
    Ok(FieldNode::new(
        ctx,
        descriptor.clone(),
        value.clone(),
        field_value,
        required,
        form,
    ))
}

/// Derive the inner field value only, without wrapping it in a node.
///
/// Also used when an existing node swaps its value wholesale: the fresh
/// sub-tree hangs off the node's own context, so descendant paths stay
/// anchored correctly.
pub(crate) fn derive_value(
    value: &Value,
    descriptor: &Descriptor,
    ctx: &Arc<PathCtx>,
    form: &Weak<FormCore>,
) -> FormResult<FieldValue> {
    // Null is a valid value for any position: optional scalars, absent
    // nested objects, nullable references. It derives to a null leaf that
    // set_value can later replace with a real sub-tree.
    if value.is_null() {
        return Ok(FieldValue::Leaf(Value::Null));
    }

    match descriptor {
        Descriptor::Primitive(kind) => {
            if !kind.accepts(value) {
                return Err(FormError::schema_mismatch(
                    ctx.path(),
                    kind.expects(),
                    value_type_name(value),
                ));
            }
            Ok(FieldValue::Leaf(value.clone()))
        }
        Descriptor::Sequence(seq) => {
            let Some(elements) = value.as_array() else {
                return Err(FormError::schema_mismatch(
                    ctx.path(),
                    "array",
                    value_type_name(value),
                ));
            };
            let mut items = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                let child_ctx = PathCtx::indexed(ctx, index);
                items.push(derive_node(
                    element,
                    seq.element(),
                    child_ctx,
                    false,
                    form.clone(),
                )?);
            }
            Ok(FieldValue::Array(FormArray::new(
                items,
                seq.element().clone(),
                Arc::clone(ctx),
            )))
        }
        Descriptor::Record(record) => derive_record(value, record, ctx, form),
        Descriptor::Union(union) => {
            let Some(obj) = value.as_object() else {
                return Err(FormError::schema_mismatch(
                    ctx.path(),
                    "object",
                    value_type_name(value),
                ));
            };
            let Some(tag) = obj.get(union.tag_field()).and_then(Value::as_str) else {
                return Err(FormError::missing_discriminant(
                    ctx.path(),
                    union.tag_field(),
                ));
            };
            let Some(record) = union.variant_named(tag) else {
                return Err(FormError::unknown_variant(ctx.path(), tag));
            };
            derive_record(value, record, ctx, form)
        }
    }
}

fn derive_record(
    value: &Value,
    record: &RecordDescriptor,
    ctx: &Arc<PathCtx>,
    form: &Weak<FormCore>,
) -> FormResult<FieldValue> {
    let Some(obj) = value.as_object() else {
        return Err(FormError::schema_mismatch(
            ctx.path(),
            "object",
            value_type_name(value),
        ));
    };

    // Field order follows the value's own key enumeration, and the derived
    // record mirrors exactly the keys the value carries.
    let mut fields = Vec::with_capacity(obj.len());
    for (name, child_value) in obj {
        let Some(field) = record.field_named(name) else {
            return Err(FormError::unknown_field(ctx.path(), name.as_str()));
        };
        let child_ctx = PathCtx::keyed(ctx, name);
        fields.push((
            name.clone(),
            derive_node(
                child_value,
                &field.descriptor,
                child_ctx,
                field.required,
                form.clone(),
            )?,
        ));
    }
    Ok(FieldValue::Record(fields))
}
