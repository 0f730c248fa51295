//! Form array containers.
//!
//! A [`FormArray`] holds the element nodes of one sequence-typed field. It
//! owns index renumbering: after any mutating operation returns, element
//! `i`'s path context carries index `i`, with no gaps or duplicates, so
//! every descendant path stays correct under structural edits.

use crate::ctx::PathCtx;
use crate::derive::derive_node;
use crate::error::{FormError, FormResult};
use crate::form::FormCore;
use crate::node::FieldNode;
use formtree_contract::Descriptor;
use serde_json::Value;
use std::sync::{Arc, Weak};

/// Ordered, mutable collection of element nodes for one sequence field.
pub(crate) struct FormArray {
    items: Vec<FieldNode>,
    /// Declared element type; new elements are derived against it.
    element: Descriptor,
    /// The owning node's context; element contexts hang off it.
    ctx: Arc<PathCtx>,
}

impl FormArray {
    pub(crate) fn new(items: Vec<FieldNode>, element: Descriptor, ctx: Arc<PathCtx>) -> Self {
        Self {
            items,
            element,
            ctx,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn item(&self, index: usize) -> Option<FieldNode> {
        self.items.get(index).cloned()
    }

    pub(crate) fn items(&self) -> &[FieldNode] {
        &self.items
    }

    /// Derive a node for `value` at the next index and append it.
    /// Appending needs no renumbering; existing indices are unaffected.
    pub(crate) fn push(&mut self, value: &Value, form: &Weak<FormCore>) -> FormResult<FieldNode> {
        let ctx = PathCtx::indexed(&self.ctx, self.items.len());
        let node = derive_node(value, &self.element, ctx, false, form.clone())?;
        self.items.push(node.clone());
        Ok(node)
    }

    /// Derive a node for `value` and insert it at `index`.
    pub(crate) fn insert(
        &mut self,
        index: usize,
        value: &Value,
        form: &Weak<FormCore>,
    ) -> FormResult<FieldNode> {
        if index > self.items.len() {
            return Err(FormError::index_out_of_bounds(
                self.ctx.path(),
                index,
                self.items.len(),
            ));
        }
        let ctx = PathCtx::indexed(&self.ctx, index);
        let node = derive_node(value, &self.element, ctx, false, form.clone())?;
        self.items.insert(index, node.clone());
        self.reindex();
        Ok(node)
    }

    /// Remove and return the element at `index`.
    pub(crate) fn remove(&mut self, index: usize) -> FormResult<FieldNode> {
        if index >= self.items.len() {
            return Err(FormError::index_out_of_bounds(
                self.ctx.path(),
                index,
                self.items.len(),
            ));
        }
        let node = self.items.remove(index);
        self.reindex();
        Ok(node)
    }

    /// Replace a range: remove `delete_count` elements at `start` (clamped
    /// to the available tail, like the conventional splice contract) and
    /// insert nodes derived from `values` in their place.
    ///
    /// Every retained element is renumbered, not only those after `start`:
    /// replace-in-place can shift indices in both directions.
    pub(crate) fn splice(
        &mut self,
        start: usize,
        delete_count: usize,
        values: &[Value],
        form: &Weak<FormCore>,
    ) -> FormResult<Vec<FieldNode>> {
        let len = self.items.len();
        if start > len {
            return Err(FormError::index_out_of_bounds(self.ctx.path(), start, len));
        }
        let delete_count = delete_count.min(len - start);

        let mut inserted = Vec::with_capacity(values.len());
        for (offset, value) in values.iter().enumerate() {
            let ctx = PathCtx::indexed(&self.ctx, start + offset);
            inserted.push(derive_node(value, &self.element, ctx, false, form.clone())?);
        }

        let removed: Vec<FieldNode> = self
            .items
            .splice(start..start + delete_count, inserted)
            .collect();
        self.reindex();
        Ok(removed)
    }

    fn reindex(&mut self) {
        for (i, item) in self.items.iter().enumerate() {
            item.set_ctx_index(i);
        }
    }
}
