//! Validation result trees.
//!
//! A validator produces a [`ResultTree`] shaped like the model: each
//! position is either clean, a list of error strings, a record of nested
//! results, or a sequence that carries its own error list alongside
//! per-element results. The engine walks a result tree and the state tree
//! in lock-step and sets errors on the corresponding nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validation outcome for one position of the model and everything below it.
///
/// The serialized form is positional: `null` for clean, an array of strings
/// for leaf errors, an `{"errors": [...], "items": [...]}` object for
/// sequences, and a plain object for records. Variant declaration order
/// matters for untagged deserialization: sequences are tried before records,
/// so a record result over a model whose fields are named exactly `errors`
/// and `items` parses as a sequence. Models with that key pair cannot use
/// the serialized form; build the tree programmatically instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultTree {
    /// No findings at this position or below.
    Clean,
    /// Errors attached directly to this position.
    Leaf(Vec<String>),
    /// A sequence position: errors for the sequence itself plus one result
    /// per element, pairwise by index.
    Sequence {
        /// Errors on the sequence field itself (length limits and the like).
        errors: Vec<String>,
        /// Per-element results.
        items: Vec<ResultTree>,
    },
    /// A record position: results per field name. Fields not mentioned are
    /// left untouched by the apply walk.
    Record(BTreeMap<String, ResultTree>),
}

impl ResultTree {
    /// A clean result.
    #[inline]
    pub fn clean() -> Self {
        ResultTree::Clean
    }

    /// A leaf error list.
    pub fn leaf<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResultTree::Leaf(errors.into_iter().map(Into::into).collect())
    }

    /// An empty record result.
    #[inline]
    pub fn record() -> Self {
        ResultTree::Record(BTreeMap::new())
    }

    /// Add a field result to a record result (builder pattern).
    ///
    /// Converts the receiver into a record if it was clean; any other shape
    /// is replaced by a record holding just this field.
    pub fn with_field(self, name: impl Into<String>, result: ResultTree) -> Self {
        let mut map = match self {
            ResultTree::Record(map) => map,
            _ => BTreeMap::new(),
        };
        map.insert(name.into(), result);
        ResultTree::Record(map)
    }

    /// A sequence result.
    pub fn sequence<I, S>(errors: I, items: Vec<ResultTree>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResultTree::Sequence {
            errors: errors.into_iter().map(Into::into).collect(),
            items,
        }
    }

    /// True when no errors exist anywhere in this tree.
    pub fn is_valid(&self) -> bool {
        match self {
            ResultTree::Clean => true,
            ResultTree::Leaf(errors) => errors.is_empty(),
            ResultTree::Sequence { errors, items } => {
                errors.is_empty() && items.iter().all(ResultTree::is_valid)
            }
            ResultTree::Record(map) => map.values().all(ResultTree::is_valid),
        }
    }

    /// Total number of error strings in this tree.
    pub fn error_count(&self) -> usize {
        match self {
            ResultTree::Clean => 0,
            ResultTree::Leaf(errors) => errors.len(),
            ResultTree::Sequence { errors, items } => {
                errors.len() + items.iter().map(ResultTree::error_count).sum::<usize>()
            }
            ResultTree::Record(map) => map.values().map(ResultTree::error_count).sum(),
        }
    }
}

impl Default for ResultTree {
    fn default() -> Self {
        ResultTree::Clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(ResultTree::clean().is_valid());
        assert!(ResultTree::leaf(Vec::<String>::new()).is_valid());
        assert!(!ResultTree::leaf(["too long"]).is_valid());

        let record = ResultTree::record()
            .with_field("FirstName", ResultTree::leaf(["required"]))
            .with_field("LastName", ResultTree::clean());
        assert!(!record.is_valid());
        assert_eq!(record.error_count(), 1);
    }

    #[test]
    fn test_sequence_counts_own_errors() {
        let tree = ResultTree::sequence(
            ["at least one entry required"],
            vec![ResultTree::clean(), ResultTree::leaf(["bad zip"])],
        );
        assert!(!tree.is_valid());
        assert_eq!(tree.error_count(), 2);
    }

    #[test]
    fn test_serde_shapes() {
        let clean: ResultTree = serde_json::from_str("null").unwrap();
        assert_eq!(clean, ResultTree::Clean);

        let leaf: ResultTree = serde_json::from_str(r#"["required"]"#).unwrap();
        assert_eq!(leaf, ResultTree::leaf(["required"]));

        let seq: ResultTree =
            serde_json::from_str(r#"{"errors": [], "items": [null, ["bad"]]}"#).unwrap();
        assert!(matches!(seq, ResultTree::Sequence { .. }));

        let rec: ResultTree = serde_json::from_str(r#"{"FirstName": ["required"]}"#).unwrap();
        assert!(matches!(rec, ResultTree::Record(_)));
    }

    #[test]
    fn test_untagged_collision_parses_as_sequence() {
        // The documented trap: a record over fields literally named
        // `errors` and `items` is indistinguishable from a sequence result.
        let parsed: ResultTree =
            serde_json::from_str(r#"{"errors": ["x"], "items": [null]}"#).unwrap();
        assert!(matches!(parsed, ResultTree::Sequence { .. }));
    }

    #[test]
    fn test_serde_roundtrip() {
        let tree = ResultTree::record().with_field(
            "Addresses",
            ResultTree::sequence(
                Vec::<String>::new(),
                vec![ResultTree::record().with_field("Zip", ResultTree::leaf(["bad zip"]))],
            ),
        );
        let json = serde_json::to_string(&tree).unwrap();
        let parsed: ResultTree = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, parsed);
    }
}
