//! Observable form state trees derived from typed values.
//!
//! This crate derives a mutable, per-field state tree from an immutable
//! value, mirroring the value's shape position-for-position: every scalar,
//! record and sequence in the value gets exactly one [`FieldNode`] tracking
//! its current value, validation errors, and UI flags (visible, disabled,
//! touched, required). The tree projects back into a plain model on demand,
//! and an asynchronous validation pipeline maps externally produced result
//! trees onto the matching nodes by structural correspondence.
//!
//! UI layers bind to individual nodes; nothing here renders, lays out, or
//! talks to the network.
//!
//! # Quick start
//!
//! ```
//! use formtree_contract::{Descriptor, RecordDescriptor, ValidationContext};
//! use formtree_contract::testing::AcceptAll;
//! use formtree_state::FormState;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let descriptor = Descriptor::record(
//!     RecordDescriptor::new("Person")
//!         .required_field("FirstName", Descriptor::string())
//!         .field("Addresses", Descriptor::sequence(Descriptor::record(
//!             RecordDescriptor::new("Address")
//!                 .required_field("StreetAddress1", Descriptor::string()),
//!         ))),
//! );
//!
//! let form = FormState::derive_with_descriptor(
//!     json!({"FirstName": "Ada", "Addresses": [{"StreetAddress1": "1 Main St"}]}),
//!     descriptor,
//!     Arc::new(AcceptAll),
//!     ValidationContext::new(),
//! ).unwrap();
//!
//! let street = form.root()
//!     .child("Addresses").unwrap()
//!     .array_item(0).unwrap()
//!     .child("StreetAddress1").unwrap();
//! assert_eq!(street.path().to_string(), ".Addresses[0].StreetAddress1");
//!
//! // Edits show up in the recomputed model; dirtiness is derived, not stored.
//! street.set_value(&json!("2 Side St")).unwrap();
//! assert!(form.dirty());
//! assert_eq!(form.model()["Addresses"][0]["StreetAddress1"], "2 Side St");
//! ```

mod array;
mod ctx;
mod derive;
mod project;

pub mod equals;
pub mod error;
pub mod form;
pub mod node;
pub mod pipeline;

pub use equals::value_eq;
pub use error::{value_type_name, FormError, FormResult};
pub use form::{derive_form_state, FormState};
pub use node::{FieldNode, PendingValidation};
pub use pipeline::{Outcome, Phase};

// The contracts travel with the engine for convenience.
pub use formtree_contract::{
    Descriptor, Path, PrimitiveKind, RecordDescriptor, ResultTree, Schema, Seg,
    SequenceDescriptor, UnionDescriptor, ValidationContext, Validator, ValidatorError,
};
