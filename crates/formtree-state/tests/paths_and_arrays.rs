//! Path computation and array structural edits.
//!
//! Paths are reconstructed from context chains, never stored, so every
//! structural edit that renumbers elements must leave the whole subtree
//! reporting renumbered paths.

use formtree_contract::testing::AcceptAll;
use formtree_contract::{Descriptor, RecordDescriptor, ValidationContext};
use formtree_state::{FieldNode, FormError, FormState};
use serde_json::{json, Value};
use std::sync::Arc;

fn item() -> Descriptor {
    Descriptor::record(
        RecordDescriptor::new("Item")
            .required_field("StreetAddress1", Descriptor::string())
            .field("City", Descriptor::string()),
    )
}

fn order() -> Descriptor {
    Descriptor::record(
        RecordDescriptor::new("Order")
            .field("Label", Descriptor::string())
            .field("Items", Descriptor::sequence(item())),
    )
}

fn derive(value: Value) -> FormState {
    FormState::derive_with_descriptor(
        value,
        order(),
        Arc::new(AcceptAll),
        ValidationContext::new(),
    )
    .unwrap()
}

fn items_node(form: &FormState) -> FieldNode {
    form.root().child("Items").unwrap()
}

fn street(n: u32) -> Value {
    json!({"StreetAddress1": format!("{n} Main St"), "City": "Springfield"})
}

// ============================================================================
// Path shape
// ============================================================================

#[test]
fn test_root_path_is_empty() {
    let form = derive(json!({"Label": "a", "Items": []}));
    assert_eq!(form.root().path().to_string(), "");
}

#[test]
fn test_nested_path_through_array() {
    let form = derive(json!({"Items": [street(1), street(2)]}));
    let node = items_node(&form)
        .array_item(1)
        .unwrap()
        .child("StreetAddress1")
        .unwrap();
    assert_eq!(node.path().to_string(), ".Items[1].StreetAddress1");
}

#[test]
fn test_record_child_path() {
    let form = derive(json!({"Label": "a"}));
    assert_eq!(
        form.root().child("Label").unwrap().path().to_string(),
        ".Label"
    );
}

// ============================================================================
// Removal renumbers
// ============================================================================

#[test]
fn test_remove_first_renumbers_descendants() {
    let form = derive(json!({"Items": [street(1), street(2)]}));
    let items = items_node(&form);

    // Grab a deep handle into the second element before removal.
    let second_street = items
        .array_item(1)
        .unwrap()
        .child("StreetAddress1")
        .unwrap();
    assert_eq!(second_street.path().to_string(), ".Items[1].StreetAddress1");

    let removed = items.array_remove(0).unwrap();
    assert_eq!(removed.value()["StreetAddress1"], "1 Main St");

    // The retained handle now reports its renumbered position.
    assert_eq!(items.array_len().unwrap(), 1);
    assert_eq!(second_street.path().to_string(), ".Items[0].StreetAddress1");
    assert_eq!(form.model()["Items"][0]["StreetAddress1"], "2 Main St");
}

#[test]
fn test_push_two_remove_first() {
    let form = derive(json!({"Items": []}));
    let items = items_node(&form);

    items.array_push(&street(1)).unwrap();
    let second = items.array_push(&street(2)).unwrap();
    assert_eq!(second.path().to_string(), ".Items[1]");

    items.array_remove(0).unwrap();
    assert_eq!(items.array_len().unwrap(), 1);
    assert_eq!(second.path().to_string(), ".Items[0]");
}

// ============================================================================
// Insert and splice renumber in both directions
// ============================================================================

#[test]
fn test_insert_shifts_subsequent() {
    let form = derive(json!({"Items": [street(1), street(3)]}));
    let items = items_node(&form);
    let tail = items.array_item(1).unwrap();

    let inserted = items.array_insert(1, &street(2)).unwrap();
    assert_eq!(inserted.path().to_string(), ".Items[1]");
    assert_eq!(tail.path().to_string(), ".Items[2]");

    let streets: Vec<Value> = items
        .array_items()
        .unwrap()
        .iter()
        .map(|n| n.value()["StreetAddress1"].clone())
        .collect();
    assert_eq!(streets, vec![json!("1 Main St"), json!("2 Main St"), json!("3 Main St")]);
}

#[test]
fn test_splice_replaces_and_renumbers() {
    let form = derive(json!({"Items": [street(1), street(2), street(3), street(4)]}));
    let items = items_node(&form);
    let last = items.array_item(3).unwrap();

    let removed = items.array_splice(1, 2, &[street(9)]).unwrap();
    assert_eq!(removed.len(), 2);
    assert_eq!(removed[0].value()["StreetAddress1"], "2 Main St");
    assert_eq!(removed[1].value()["StreetAddress1"], "3 Main St");

    assert_eq!(items.array_len().unwrap(), 3);
    assert_eq!(last.path().to_string(), ".Items[2]");

    // No gaps, no duplicates: item paths are the identity sequence.
    let paths: Vec<String> = items
        .array_items()
        .unwrap()
        .iter()
        .map(|n| n.path().to_string())
        .collect();
    assert_eq!(paths, vec![".Items[0]", ".Items[1]", ".Items[2]"]);
}

#[test]
fn test_splice_clamps_delete_count() {
    let form = derive(json!({"Items": [street(1), street(2)]}));
    let items = items_node(&form);
    let removed = items.array_splice(1, 99, &[]).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(items.array_len().unwrap(), 1);
}

// ============================================================================
// Bounds and kind errors
// ============================================================================

#[test]
fn test_remove_out_of_bounds() {
    let form = derive(json!({"Items": [street(1)]}));
    let err = items_node(&form).array_remove(5).unwrap_err();
    assert!(matches!(
        err,
        FormError::IndexOutOfBounds { index: 5, len: 1, .. }
    ));
}

#[test]
fn test_insert_out_of_bounds() {
    let form = derive(json!({"Items": []}));
    let err = items_node(&form).array_insert(1, &street(1)).unwrap_err();
    assert!(matches!(err, FormError::IndexOutOfBounds { .. }));
}

#[test]
fn test_splice_start_out_of_bounds() {
    let form = derive(json!({"Items": [street(1)]}));
    let err = items_node(&form).array_splice(2, 0, &[]).unwrap_err();
    assert!(matches!(err, FormError::IndexOutOfBounds { .. }));
}

#[test]
fn test_array_item_out_of_range_is_none() {
    let form = derive(json!({"Items": [street(1)]}));
    assert!(items_node(&form).array_item(1).is_none());
}

#[test]
fn test_array_ops_on_scalar_field() {
    let form = derive(json!({"Label": "a"}));
    let label = form.root().child("Label").unwrap();
    assert!(matches!(
        label.array_len().unwrap_err(),
        FormError::NotSequence { .. }
    ));
    assert!(matches!(
        label.array_push(&json!("x")).unwrap_err(),
        FormError::NotSequence { .. }
    ));
    assert!(label.array_item(0).is_none());
}

#[test]
fn test_push_derives_against_element_descriptor() {
    let form = derive(json!({"Items": []}));
    let err = items_node(&form).array_push(&json!("not an item")).unwrap_err();
    assert!(matches!(err, FormError::SchemaMismatch { .. }));
    assert_eq!(items_node(&form).array_len().unwrap(), 0);
}
