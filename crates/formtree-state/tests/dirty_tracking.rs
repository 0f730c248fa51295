//! Derived dirtiness: comparisons against the creation-time snapshot.

use formtree_contract::testing::AcceptAll;
use formtree_contract::{Descriptor, RecordDescriptor, ValidationContext};
use formtree_state::FormState;
use serde_json::{json, Value};
use std::sync::Arc;

fn person() -> Descriptor {
    Descriptor::record(
        RecordDescriptor::new("Person")
            .required_field("FirstName", Descriptor::string())
            .field("Addresses", Descriptor::sequence(Descriptor::record(
                RecordDescriptor::new("Address")
                    .required_field("StreetAddress1", Descriptor::string())
                    .field("City", Descriptor::string()),
            ))),
    )
}

fn derive(value: Value) -> FormState {
    FormState::derive_with_descriptor(
        value,
        person(),
        Arc::new(AcceptAll),
        ValidationContext::new(),
    )
    .unwrap()
}

#[test]
fn test_pristine_form_is_clean() {
    let form = derive(json!({
        "FirstName": "Ada",
        "Addresses": [{"StreetAddress1": "1 Main St", "City": "Springfield"}],
    }));
    assert!(!form.dirty());
    assert!(!form.root().dirty());
    assert!(!form.root().child("FirstName").unwrap().dirty());
}

#[test]
fn test_leaf_change_propagates_up_three_levels() {
    let form = derive(json!({
        "FirstName": "Ada",
        "Addresses": [{"StreetAddress1": "1 Main St", "City": "Springfield"}],
    }));
    let addresses = form.root().child("Addresses").unwrap();
    let address = addresses.array_item(0).unwrap();
    let street = address.child("StreetAddress1").unwrap();

    street.set_value(&json!("2 Side St")).unwrap();

    assert!(street.dirty());
    assert!(address.dirty());
    assert!(addresses.dirty());
    assert!(form.root().dirty());
    assert!(form.dirty());

    // Siblings stay clean; dirtiness is positional, not global.
    assert!(!address.child("City").unwrap().dirty());
    assert!(!form.root().child("FirstName").unwrap().dirty());
}

#[test]
fn test_revert_restores_clean() {
    let form = derive(json!({
        "FirstName": "Ada",
        "Addresses": [{"StreetAddress1": "1 Main St", "City": "Springfield"}],
    }));
    let street = form
        .root()
        .child("Addresses")
        .unwrap()
        .array_item(0)
        .unwrap()
        .child("StreetAddress1")
        .unwrap();

    street.set_value(&json!("2 Side St")).unwrap();
    assert!(form.dirty());

    street.set_value(&json!("1 Main St")).unwrap();
    assert!(!street.dirty());
    assert!(!form.dirty());
}

#[test]
fn test_array_push_and_remove_restore_clean() {
    let form = derive(json!({
        "FirstName": "Ada",
        "Addresses": [{"StreetAddress1": "1 Main St"}],
    }));
    let addresses = form.root().child("Addresses").unwrap();

    addresses
        .array_push(&json!({"StreetAddress1": "2 Side St"}))
        .unwrap();
    assert!(addresses.dirty());
    assert!(form.dirty());

    addresses.array_remove(1).unwrap();
    assert!(!addresses.dirty());
    assert!(!form.dirty());
}

#[test]
fn test_whole_object_swap_and_restore() {
    let original = json!({
        "FirstName": "Ada",
        "Addresses": [{"StreetAddress1": "1 Main St", "City": "Springfield"}],
    });
    let form = derive(original.clone());
    let address = form
        .root()
        .child("Addresses")
        .unwrap()
        .array_item(0)
        .unwrap();

    address
        .set_value(&json!({"StreetAddress1": "9 Oak Ave", "City": "Shelbyville"}))
        .unwrap();
    assert!(address.dirty());
    assert!(form.dirty());

    address
        .set_value(&json!({"StreetAddress1": "1 Main St", "City": "Springfield"}))
        .unwrap();
    assert!(!address.dirty());
    assert!(!form.dirty());
}

#[test]
fn test_flags_do_not_affect_dirtiness() {
    let form = derive(json!({"FirstName": "Ada", "Addresses": []}));
    let first_name = form.root().child("FirstName").unwrap();

    first_name.set_touched(true);
    first_name.set_disabled(true);
    first_name.set_visible(false);
    first_name.set_errors(vec!["bad".to_string()]);

    assert!(!first_name.dirty());
    assert!(!form.dirty());
}

#[test]
fn test_on_change_without_runtime_still_edits() {
    // Outside an async runtime on_change performs the synchronous part of
    // the cycle and skips the validation trigger.
    let form = derive(json!({"FirstName": "Ada", "Addresses": []}));
    let first_name = form.root().child("FirstName").unwrap();

    let pending = first_name.on_change(json!("Grace")).unwrap();
    assert!(!pending.is_scheduled());
    pending.detach();

    assert!(first_name.touched());
    assert!(first_name.dirty());
    assert_eq!(form.model()["FirstName"], "Grace");
}
