//! Path context chains.
//!
//! Every state node owns exactly one [`PathCtx`]: a back-reference to its
//! parent's context plus the step (field name or array index) that leads to
//! it. Paths are never stored; they are reconstructed by walking the chain,
//! which is what keeps them correct when an array renumbers its elements:
//! the container rewrites the retained children's index steps in place and
//! every descendant's path follows.

use formtree_contract::{Path, Seg};
use std::sync::{Arc, Mutex, PoisonError};

/// One step from a node back to its parent.
///
/// The step is behind a `Mutex` so array containers can rewrite indices from
/// any context; locks are held only for the single read or write.
pub(crate) struct PathCtx {
    parent: Option<Arc<PathCtx>>,
    step: Mutex<Option<Seg>>,
}

impl PathCtx {
    /// The root context: no parent, no step.
    pub(crate) fn root() -> Arc<Self> {
        Arc::new(Self {
            parent: None,
            step: Mutex::new(None),
        })
    }

    /// A context for a named record field under `parent`.
    pub(crate) fn keyed(parent: &Arc<Self>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            parent: Some(Arc::clone(parent)),
            step: Mutex::new(Some(Seg::Key(name.into()))),
        })
    }

    /// A context for an array element at `index` under `parent`.
    pub(crate) fn indexed(parent: &Arc<Self>, index: usize) -> Arc<Self> {
        Arc::new(Self {
            parent: Some(Arc::clone(parent)),
            step: Mutex::new(Some(Seg::Index(index))),
        })
    }

    /// Rewrite this context's index step after an array mutation.
    ///
    /// Keyed and root contexts are left untouched; only index steps move.
    pub(crate) fn set_index(&self, index: usize) {
        let mut step = self.step.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*step, Some(Seg::Index(_))) {
            *step = Some(Seg::Index(index));
        }
    }

    /// Compute the full path by walking the chain to the root.
    pub(crate) fn path(&self) -> Path {
        let mut segs = Vec::new();
        let mut current = Some(self);
        while let Some(ctx) = current {
            let step = ctx.step.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(seg) = step.as_ref() {
                segs.push(seg.clone());
            }
            drop(step);
            current = ctx.parent.as_deref();
        }
        segs.reverse();
        Path::from_segments(segs)
    }
}

impl std::fmt::Debug for PathCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PathCtx").field(&self.path()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_empty() {
        let root = PathCtx::root();
        assert_eq!(root.path().to_string(), "");
    }

    #[test]
    fn test_chain_path() {
        let root = PathCtx::root();
        let items = PathCtx::keyed(&root, "Items");
        let elem = PathCtx::indexed(&items, 1);
        let street = PathCtx::keyed(&elem, "StreetAddress1");
        assert_eq!(street.path().to_string(), ".Items[1].StreetAddress1");
    }

    #[test]
    fn test_set_index_rewrites_descendant_paths() {
        let root = PathCtx::root();
        let items = PathCtx::keyed(&root, "Items");
        let elem = PathCtx::indexed(&items, 1);
        let street = PathCtx::keyed(&elem, "StreetAddress1");

        elem.set_index(0);
        assert_eq!(street.path().to_string(), ".Items[0].StreetAddress1");
    }

    #[test]
    fn test_set_index_ignores_keyed_steps() {
        let root = PathCtx::root();
        let name = PathCtx::keyed(&root, "FirstName");
        name.set_index(3);
        assert_eq!(name.path().to_string(), ".FirstName");
    }
}
