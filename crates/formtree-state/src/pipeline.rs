//! The validation pipeline.
//!
//! One validation cycle moves through `Idle → Triggered → Pending →
//! Applying → Idle`: project the current model, call the external validator,
//! walk its result tree onto the state tree, publish one commit. Validation
//! is always asynchronous relative to edits, so a result can arrive after
//! further changes or after an array element was removed; the apply walk
//! skips positions that no longer exist and never fails on them.
//!
//! There is deliberately no sequencing guard: overlapping triggers are
//! independent in-flight calls and results apply in whichever order they
//! resolve, last one wins. See DESIGN.md for the decision record.

use crate::error::FormResult;
use crate::form::FormCore;
use crate::node::FieldNode;
use crate::project::project;
use formtree_contract::{Path, ResultTree};
use std::sync::Arc;

/// Where a validation cycle currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No cycle in flight.
    #[default]
    Idle,
    /// A trigger fired; the model is being projected.
    Triggered,
    /// The external validator call is in flight.
    Pending,
    /// A result tree is being walked onto the state tree.
    Applying,
}

/// Outcome of a whole-form validation run.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// The validator's result tree, as applied.
    pub result: ResultTree,
    /// Whether the tree carried no errors.
    pub is_valid: bool,
}

/// Run one validation cycle.
///
/// `scope` names the field that triggered the run (`None` for whole-form);
/// it is passed to the validator as a hint, and the returned tree is always
/// applied from the root. A validator call failure resets the phase and
/// propagates without touching any errors.
pub(crate) async fn run_validation(
    form: Arc<FormCore>,
    scope: Option<Path>,
) -> FormResult<Outcome> {
    form.set_phase(Phase::Triggered);
    let root = form.root_node()?;
    let model = project(&root);

    form.set_phase(Phase::Pending);
    let outcome = form
        .validator
        .validate(&model, &form.context, scope.as_ref())
        .await;
    let tree = match outcome {
        Ok(tree) => tree,
        Err(err) => {
            form.set_phase(Phase::Idle);
            return Err(err.into());
        }
    };

    form.set_phase(Phase::Applying);
    let changed = apply_results(&root, &tree);
    form.set_phase(Phase::Idle);
    if changed {
        form.commit();
    }

    Ok(Outcome {
        is_valid: tree.is_valid(),
        result: tree,
    })
}

/// Walk a result tree and the state tree in lock-step, setting errors.
///
/// Returns whether any node's errors actually changed; re-applying the same
/// tree is a no-op against the per-node change guard. Positions present in
/// the result but absent from the state tree are skipped: validation racing
/// a structural edit is expected, not an error.
///
/// `Clean` asserts the absence of findings for the whole subtree it lands
/// on, so it clears every descendant's errors, matching
/// [`ResultTree::is_valid`]. A record result that wants to leave a field's
/// errors untouched omits the field instead.
pub(crate) fn apply_results(node: &FieldNode, tree: &ResultTree) -> bool {
    match tree {
        ResultTree::Clean => clear_subtree(node),
        ResultTree::Leaf(errors) => node.set_errors_silent(errors),
        ResultTree::Record(fields) => {
            let mut changed = false;
            for (name, sub) in fields {
                if let Some(child) = node.child(name) {
                    changed |= apply_results(&child, sub);
                }
            }
            changed
        }
        ResultTree::Sequence { errors, items } => {
            // The parallel error list belongs to the sequence field itself,
            // distinct from its elements' errors.
            let mut changed = node.set_errors_silent(errors);
            for (index, sub) in items.iter().enumerate() {
                if let Some(item) = node.array_item(index) {
                    changed |= apply_results(&item, sub);
                }
            }
            changed
        }
    }
}

fn clear_subtree(node: &FieldNode) -> bool {
    let mut changed = node.set_errors_silent(&[]);
    for child in node.child_nodes() {
        changed |= clear_subtree(&child);
    }
    changed
}
