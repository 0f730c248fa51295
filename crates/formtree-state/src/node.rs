//! Input state nodes.
//!
//! A [`FieldNode`] is the editable state of one field: its current value
//! (scalar, nested record, or array container), validation errors, UI flags,
//! and the snapshot of the value it was derived from. Nodes are cheap-clone
//! handles over shared state, in the same spirit as a shared document cell:
//! mutations lock briefly, and every clone observes them.
//!
//! Dirtiness is never stored. It is recomputed on read by comparing the
//! current value against the creation-time snapshot with the structural
//! equality oracle.

use crate::array::FormArray;
use crate::ctx::PathCtx;
use crate::derive::derive_value;
use crate::equals::field_eq;
use crate::error::{FormError, FormResult};
use crate::form::FormCore;
use crate::pipeline;
use crate::project::project_field;
use formtree_contract::{Descriptor, Path};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// The current value held by a node.
pub(crate) enum FieldValue {
    /// A scalar (or null) value held directly.
    Leaf(Value),
    /// Child nodes per record field, in the domain value's key order.
    Record(Vec<(String, FieldNode)>),
    /// An ordered container of element nodes.
    Array(FormArray),
}

/// Mutable per-node state behind the node's lock.
pub(crate) struct FieldCore {
    pub(crate) value: FieldValue,
    pub(crate) errors: Vec<String>,
    pub(crate) visible: bool,
    pub(crate) disabled: bool,
    pub(crate) touched: bool,
    pub(crate) required: bool,
}

struct FieldNodeInner {
    ctx: Arc<PathCtx>,
    descriptor: Descriptor,
    /// Value captured at derivation time; the fixed point for dirtiness.
    original: Value,
    core: Mutex<FieldCore>,
    /// Non-owning back-reference to the form that derived this node, used
    /// to trigger validation and publish commits.
    form: Weak<FormCore>,
}

/// Handle to the editable state of one field.
///
/// Clones share the same underlying state. A node for a record field exposes
/// children via [`child`](FieldNode::child); a node for a sequence field is
/// its own array container and exposes the `array_*` operations.
#[derive(Clone)]
pub struct FieldNode(Arc<FieldNodeInner>);

impl FieldNode {
    pub(crate) fn new(
        ctx: Arc<PathCtx>,
        descriptor: Descriptor,
        original: Value,
        value: FieldValue,
        required: bool,
        form: Weak<FormCore>,
    ) -> Self {
        Self(Arc::new(FieldNodeInner {
            ctx,
            descriptor,
            original,
            core: Mutex::new(FieldCore {
                value,
                errors: Vec::new(),
                visible: true,
                disabled: false,
                touched: false,
                required,
            }),
            form,
        }))
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, FieldCore> {
        self.0.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn form(&self) -> Option<Arc<FormCore>> {
        self.0.form.upgrade()
    }

    pub(crate) fn set_ctx_index(&self, index: usize) {
        self.0.ctx.set_index(index);
    }

    fn commit(&self) {
        if let Some(form) = self.form() {
            form.commit();
        }
    }

    // ------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------

    /// The declared descriptor of this field.
    pub fn descriptor(&self) -> &Descriptor {
        &self.0.descriptor
    }

    /// The value this node was derived from.
    pub fn original(&self) -> &Value {
        &self.0.original
    }

    /// The field's path, reconstructed from its context chain.
    pub fn path(&self) -> Path {
        self.0.ctx.path()
    }

    /// The current value as plain data (projects composites on the fly).
    pub fn value(&self) -> Value {
        project_field(&self.lock().value)
    }

    /// Current validation errors.
    pub fn errors(&self) -> Vec<String> {
        self.lock().errors.clone()
    }

    /// Whether the field is visible.
    pub fn visible(&self) -> bool {
        self.lock().visible
    }

    /// Whether the field is disabled.
    pub fn disabled(&self) -> bool {
        self.lock().disabled
    }

    /// Whether the field has been edited through [`on_change`](Self::on_change).
    pub fn touched(&self) -> bool {
        self.lock().touched
    }

    /// Whether the field is required.
    pub fn required(&self) -> bool {
        self.lock().required
    }

    /// True when the current value differs structurally from the value this
    /// node was derived from. Recomputed on every read, never cached.
    pub fn dirty(&self) -> bool {
        !field_eq(&self.lock().value, &self.0.original)
    }

    /// Child node of a record field, by name.
    pub fn child(&self, name: &str) -> Option<FieldNode> {
        match &self.lock().value {
            FieldValue::Record(fields) => fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, node)| node.clone()),
            _ => None,
        }
    }

    /// Child nodes of a record field, in key order.
    pub fn children(&self) -> Vec<(String, FieldNode)> {
        match &self.lock().value {
            FieldValue::Record(fields) => fields.clone(),
            _ => Vec::new(),
        }
    }

    /// True when this node holds an array container.
    pub fn is_array(&self) -> bool {
        matches!(self.lock().value, FieldValue::Array(_))
    }

    /// Direct child nodes regardless of container kind; empty for leaves.
    pub(crate) fn child_nodes(&self) -> Vec<FieldNode> {
        match &self.lock().value {
            FieldValue::Leaf(_) => Vec::new(),
            FieldValue::Record(fields) => fields.iter().map(|(_, n)| n.clone()).collect(),
            FieldValue::Array(arr) => arr.items().to_vec(),
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Replace this field's value and trigger validation for its subtree.
    ///
    /// The value swap, touched flag and commit happen synchronously; the
    /// validation runs on a spawned task and its findings arrive later via
    /// the usual apply walk. The returned [`PendingValidation`] can be
    /// awaited for test determinism or dropped for fire-and-forget use;
    /// dropping does not cancel the run. A failed background run is logged
    /// at warn level and leaves errors untouched.
    pub fn on_change(&self, value: Value) -> FormResult<PendingValidation> {
        let next = derive_value(&value, &self.0.descriptor, &self.0.ctx, &self.0.form)?;
        {
            let mut core = self.lock();
            core.value = next;
            core.touched = true;
        }
        self.commit();
        Ok(PendingValidation {
            handle: self.spawn_scoped_validation(),
        })
    }

    /// Replace this field's value without triggering validation.
    ///
    /// Re-derives a fresh sub-state tree from `value` under this node's
    /// original descriptor and context. Intended for swapping a nested
    /// object or nullable reference wholesale; the creation-time snapshot is
    /// kept, so dirtiness still compares against the originally derived
    /// value.
    pub fn set_value(&self, value: &Value) -> FormResult<()> {
        let next = derive_value(value, &self.0.descriptor, &self.0.ctx, &self.0.form)?;
        self.lock().value = next;
        self.commit();
        Ok(())
    }

    /// Replace the error list.
    ///
    /// No-op (including no observer notification) when the new list equals
    /// the current one element-for-element.
    pub fn set_errors(&self, errors: Vec<String>) {
        if self.set_errors_silent(&errors) {
            self.commit();
        }
    }

    /// Set errors without committing; returns whether anything changed.
    /// The validation pipeline batches many of these into one commit.
    pub(crate) fn set_errors_silent(&self, errors: &[String]) -> bool {
        let mut core = self.lock();
        if core.errors.as_slice() == errors {
            return false;
        }
        core.errors = errors.to_vec();
        true
    }

    /// Set the visible flag.
    pub fn set_visible(&self, visible: bool) {
        self.lock().visible = visible;
        self.commit();
    }

    /// Set the disabled flag.
    pub fn set_disabled(&self, disabled: bool) {
        self.lock().disabled = disabled;
        self.commit();
    }

    /// Set the required flag.
    pub fn set_required(&self, required: bool) {
        self.lock().required = required;
        self.commit();
    }

    /// Set the touched flag.
    pub fn set_touched(&self, touched: bool) {
        self.lock().touched = touched;
        self.commit();
    }

    /// Run validation scoped to this field's path and apply the findings.
    ///
    /// A validator call failure propagates, since the caller chose to await
    /// this run rather than fire and forget.
    pub async fn validate(&self) -> FormResult<pipeline::Outcome> {
        let form = self.form().ok_or(FormError::FormDropped)?;
        pipeline::run_validation(form, Some(self.path())).await
    }

    fn spawn_scoped_validation(&self) -> Option<tokio::task::JoinHandle<()>> {
        let Some(form) = self.form() else {
            tracing::debug!(path = %self.path(), "change on detached node; skipping validation");
            return None;
        };
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(path = %self.path(), "no async runtime; skipping validation trigger");
            return None;
        };
        let scope = self.path();
        Some(rt.spawn(async move {
            if let Err(error) = pipeline::run_validation(form, Some(scope)).await {
                tracing::warn!(%error, "background validation failed");
            }
        }))
    }

    // ------------------------------------------------------------------
    // Array container operations
    // ------------------------------------------------------------------
    //
    // A sequence-typed node is its own container. All mutators uphold the
    // invariant that items[i] computes a path ending in [i] once the
    // operation returns, and each publishes exactly one commit.

    /// Number of elements. Errors when this node is not a sequence field.
    pub fn array_len(&self) -> FormResult<usize> {
        match &self.lock().value {
            FieldValue::Array(arr) => Ok(arr.len()),
            _ => Err(FormError::not_sequence(self.path())),
        }
    }

    /// Element node at `index`, if this is a sequence field and in range.
    pub fn array_item(&self, index: usize) -> Option<FieldNode> {
        match &self.lock().value {
            FieldValue::Array(arr) => arr.item(index),
            _ => None,
        }
    }

    /// All element nodes, in order.
    pub fn array_items(&self) -> FormResult<Vec<FieldNode>> {
        match &self.lock().value {
            FieldValue::Array(arr) => Ok(arr.items().to_vec()),
            _ => Err(FormError::not_sequence(self.path())),
        }
    }

    /// Derive a node for `value` and append it.
    pub fn array_push(&self, value: &Value) -> FormResult<FieldNode> {
        let node = {
            let mut core = self.lock();
            let FieldValue::Array(arr) = &mut core.value else {
                return Err(FormError::not_sequence(self.path()));
            };
            arr.push(value, &self.0.form)?
        };
        self.commit();
        Ok(node)
    }

    /// Derive a node for `value` and insert it at `index`, shifting and
    /// renumbering subsequent elements.
    pub fn array_insert(&self, index: usize, value: &Value) -> FormResult<FieldNode> {
        let node = {
            let mut core = self.lock();
            let FieldValue::Array(arr) = &mut core.value else {
                return Err(FormError::not_sequence(self.path()));
            };
            arr.insert(index, value, &self.0.form)?
        };
        self.commit();
        Ok(node)
    }

    /// Remove and return the element at `index`, renumbering the rest.
    pub fn array_remove(&self, index: usize) -> FormResult<FieldNode> {
        let node = {
            let mut core = self.lock();
            let FieldValue::Array(arr) = &mut core.value else {
                return Err(FormError::not_sequence(self.path()));
            };
            arr.remove(index)?
        };
        self.commit();
        Ok(node)
    }

    /// General insert/remove: delete `delete_count` elements starting at
    /// `start`, insert nodes derived from `values` in their place, and
    /// renumber every retained element. Returns the removed nodes.
    pub fn array_splice(
        &self,
        start: usize,
        delete_count: usize,
        values: &[Value],
    ) -> FormResult<Vec<FieldNode>> {
        let removed = {
            let mut core = self.lock();
            let FieldValue::Array(arr) = &mut core.value else {
                return Err(FormError::not_sequence(self.path()));
            };
            arr.splice(start, delete_count, values, &self.0.form)?
        };
        self.commit();
        Ok(removed)
    }
}

impl std::fmt::Debug for FieldNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.lock();
        f.debug_struct("FieldNode")
            .field("path", &self.path().to_string())
            .field("errors", &core.errors)
            .field("touched", &core.touched)
            .field("required", &core.required)
            .finish_non_exhaustive()
    }
}

/// Handle to a validation run triggered by [`FieldNode::on_change`].
///
/// Await [`wait`](Self::wait) when the caller needs the findings applied
/// before proceeding; drop (or call [`detach`](Self::detach)) to let it run
/// in the background. When no async runtime was available at trigger time,
/// no run was scheduled and `wait` returns immediately.
#[must_use = "dropping detaches the validation run; call wait() to await it"]
pub struct PendingValidation {
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl PendingValidation {
    /// Wait for the validation run (if any) to finish applying results.
    pub async fn wait(self) {
        if let Some(handle) = self.handle {
            let _ = handle.await;
        }
    }

    /// Explicitly release the run to the background.
    pub fn detach(self) {}

    /// Whether a run was actually scheduled.
    pub fn is_scheduled(&self) -> bool {
        self.handle.is_some()
    }
}
