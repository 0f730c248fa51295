//! Contracts consumed by the formtree engine.
//!
//! This crate defines the capabilities the form state engine requires from
//! its collaborators, without implementing any of them:
//!
//! - [`Descriptor`] / [`Schema`]: type descriptors resolved at registration
//!   time, telling the deriver the declared shape of each position.
//! - [`Validator`]: asynchronous rule execution over a projected model.
//! - [`ResultTree`]: the validator's output, shaped like the model.
//! - [`ValidationContext`]: an opaque bag threaded through to the validator.
//! - [`Path`] / [`Seg`]: field addressing shared by both sides.
//!
//! The engine lives in the `formtree-state` crate.

pub mod context;
pub mod descriptor;
pub mod path;
pub mod result;
pub mod testing;
pub mod validate;

pub use context::ValidationContext;
pub use descriptor::{
    Descriptor, FieldDescriptor, PrimitiveKind, RecordDescriptor, Schema, SequenceDescriptor,
    UnionDescriptor,
};
pub use path::{Path, Seg};
pub use result::ResultTree;
pub use validate::{Validator, ValidatorError};
