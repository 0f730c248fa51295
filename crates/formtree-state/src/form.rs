//! The form state facade.
//!
//! [`FormState`] is the single entry point: derive it from a typed value,
//! read and edit fields through the root [`FieldNode`], project the current
//! model at any time, and run whole-form validation. Observers subscribe to
//! a revision channel; every logical mutation, including a batch of error
//! updates from one validation apply, publishes exactly one revision bump
//! after the mutation completes.

use crate::ctx::PathCtx;
use crate::derive::derive_node;
use crate::error::{FormError, FormResult};
use crate::node::FieldNode;
use crate::pipeline::{self, Outcome, Phase};
use crate::project::project;
use formtree_contract::{Descriptor, Schema, ValidationContext, Validator};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tokio::sync::watch;

/// Shared state behind a form: the validator, the context threaded through
/// to it, the root node, and the observer plumbing. Nodes hold a weak
/// back-reference to this; the form holds the nodes strongly.
pub(crate) struct FormCore {
    pub(crate) validator: Arc<dyn Validator>,
    pub(crate) context: ValidationContext,
    root: OnceLock<FieldNode>,
    phase: Mutex<Phase>,
    revision: watch::Sender<u64>,
}

impl FormCore {
    pub(crate) fn root_node(&self) -> FormResult<FieldNode> {
        self.root.get().cloned().ok_or(FormError::FormDropped)
    }

    /// Publish one revision bump; observers see everything mutated so far.
    pub(crate) fn commit(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    pub(crate) fn set_phase(&self, phase: Phase) {
        let mut current = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(from = ?*current, to = ?phase, "validation phase");
        *current = phase;
    }

    pub(crate) fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Observable form state derived from a typed value.
///
/// # Examples
///
/// ```
/// use formtree_contract::{Descriptor, RecordDescriptor, ValidationContext};
/// use formtree_contract::testing::AcceptAll;
/// use formtree_state::FormState;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let descriptor = Descriptor::record(
///     RecordDescriptor::new("Person")
///         .required_field("FirstName", Descriptor::string())
///         .field("Age", Descriptor::integer()),
/// );
/// let form = FormState::derive_with_descriptor(
///     json!({"FirstName": "Ada", "Age": 36}),
///     descriptor,
///     Arc::new(AcceptAll),
///     ValidationContext::new(),
/// ).unwrap();
///
/// let first_name = form.root().child("FirstName").unwrap();
/// assert_eq!(first_name.path().to_string(), ".FirstName");
/// assert!(first_name.required());
/// assert!(!form.dirty());
/// assert_eq!(form.model(), json!({"FirstName": "Ada", "Age": 36}));
/// ```
pub struct FormState {
    core: Arc<FormCore>,
    root: FieldNode,
}

impl FormState {
    /// Derive form state from a typed value using its published schema.
    pub fn derive<T>(
        value: &T,
        validator: Arc<dyn Validator>,
        context: ValidationContext,
    ) -> FormResult<Self>
    where
        T: Schema + Serialize,
    {
        let plain = serde_json::to_value(value)?;
        Self::derive_with_descriptor(plain, T::describe(), validator, context)
    }

    /// Derive form state from a plain value and an explicit descriptor.
    pub fn derive_with_descriptor(
        value: Value,
        descriptor: Descriptor,
        validator: Arc<dyn Validator>,
        context: ValidationContext,
    ) -> FormResult<Self> {
        let (revision, _) = watch::channel(0u64);
        let core = Arc::new(FormCore {
            validator,
            context,
            root: OnceLock::new(),
            phase: Mutex::new(Phase::Idle),
            revision,
        });
        let root = derive_node(
            &value,
            &descriptor,
            PathCtx::root(),
            false,
            Arc::downgrade(&core),
        )?;
        let _ = core.root.set(root.clone());
        Ok(Self { core, root })
    }

    /// The root of the field state tree.
    pub fn root(&self) -> &FieldNode {
        &self.root
    }

    /// The current model: a fresh projection of the state tree.
    ///
    /// Recomputed on every access, never cached, so it always reflects the
    /// latest edits.
    pub fn model(&self) -> Value {
        project(&self.root)
    }

    /// The current model deserialized into a typed instance.
    pub fn model_as<T: DeserializeOwned>(&self) -> FormResult<T> {
        Ok(serde_json::from_value(self.model())?)
    }

    /// True when any field differs from the value the form was derived from.
    pub fn dirty(&self) -> bool {
        self.root.dirty()
    }

    /// Run whole-form validation and apply the findings.
    ///
    /// A validator call failure propagates to the caller; domain findings
    /// never do; they land on the nodes and in the returned outcome.
    pub async fn validate(&self) -> FormResult<Outcome> {
        pipeline::run_validation(Arc::clone(&self.core), None).await
    }

    /// Subscribe to commit notifications.
    ///
    /// The channel carries a monotonically increasing revision; one bump per
    /// logical mutation, published after the mutation completes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.core.revision.subscribe()
    }

    /// The current revision number.
    pub fn revision(&self) -> u64 {
        *self.core.revision.borrow()
    }

    /// Where the validation pipeline currently stands.
    ///
    /// With overlapping in-flight runs this reflects the most recent
    /// transition of any of them.
    pub fn validation_phase(&self) -> Phase {
        self.core.phase()
    }
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("dirty", &self.dirty())
            .field("revision", &self.revision())
            .field("phase", &self.validation_phase())
            .finish_non_exhaustive()
    }
}

/// Derive form state from a typed value (the conventional entry point).
///
/// Equivalent to [`FormState::derive`].
pub fn derive_form_state<T>(
    value: &T,
    validator: Arc<dyn Validator>,
    context: ValidationContext,
) -> FormResult<FormState>
where
    T: Schema + Serialize,
{
    FormState::derive(value, validator, context)
}
