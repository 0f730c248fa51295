//! Error types for form state operations.
//!
//! Construction errors (a value the deriver cannot reconcile with its
//! descriptor) are fatal and surface immediately. Validation findings are
//! data, not errors; they live on the state nodes and never appear here.

use formtree_contract::{Path, ValidatorError};
use thiserror::Error;

/// Result type alias for form state operations.
pub type FormResult<T> = Result<T, FormError>;

/// Errors that can occur while deriving, mutating or validating form state.
#[derive(Debug, Error)]
pub enum FormError {
    /// The value at a position does not match its declared descriptor.
    #[error("schema mismatch at `{path}`: expected {expected}, found {found}")]
    SchemaMismatch {
        /// Where the mismatch occurred.
        path: Path,
        /// The kind the descriptor declares.
        expected: &'static str,
        /// The kind actually found in the value.
        found: &'static str,
    },

    /// A record value carries a key its descriptor does not declare.
    #[error("unknown field `{name}` at `{path}`")]
    UnknownField {
        /// The record position.
        path: Path,
        /// The undeclared key.
        name: String,
    },

    /// A union value's discriminant field is missing or not a string.
    #[error("missing discriminant `{tag_field}` at `{path}`")]
    MissingDiscriminant {
        /// The union position.
        path: Path,
        /// The declared discriminant field.
        tag_field: String,
    },

    /// A union value names a variant the descriptor does not declare.
    #[error("unknown variant `{tag}` at `{path}`")]
    UnknownVariant {
        /// The union position.
        path: Path,
        /// The unmatched discriminant value.
        tag: String,
    },

    /// Array index is out of bounds.
    #[error("index {index} out of bounds (len: {len}) at `{path}`")]
    IndexOutOfBounds {
        /// The array position.
        path: Path,
        /// The index that was accessed.
        index: usize,
        /// The actual length of the array.
        len: usize,
    },

    /// An array operation was invoked on a field that is not a sequence.
    #[error("array operation requires a sequence field at `{path}`")]
    NotSequence {
        /// The offending position.
        path: Path,
    },

    /// The owning form state has been dropped.
    #[error("form state no longer available")]
    FormDropped,

    /// The validator call itself failed.
    #[error(transparent)]
    Validator(#[from] ValidatorError),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormError {
    /// Create a schema mismatch error.
    #[inline]
    pub fn schema_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        FormError::SchemaMismatch {
            path,
            expected,
            found,
        }
    }

    /// Create an unknown field error.
    #[inline]
    pub fn unknown_field(path: Path, name: impl Into<String>) -> Self {
        FormError::UnknownField {
            path,
            name: name.into(),
        }
    }

    /// Create a missing discriminant error.
    #[inline]
    pub fn missing_discriminant(path: Path, tag_field: impl Into<String>) -> Self {
        FormError::MissingDiscriminant {
            path,
            tag_field: tag_field.into(),
        }
    }

    /// Create an unknown variant error.
    #[inline]
    pub fn unknown_variant(path: Path, tag: impl Into<String>) -> Self {
        FormError::UnknownVariant {
            path,
            tag: tag.into(),
        }
    }

    /// Create an index out of bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: Path, index: usize, len: usize) -> Self {
        FormError::IndexOutOfBounds { path, index, len }
    }

    /// Create a not-a-sequence error.
    #[inline]
    pub fn not_sequence(path: Path) -> Self {
        FormError::NotSequence { path }
    }
}

/// Get the type name of a JSON value, for diagnostics.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formtree_contract::path;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = FormError::schema_mismatch(path!("Addresses", 0), "object", "string");
        assert!(err.to_string().contains(".Addresses[0]"));
        assert!(err.to_string().contains("expected object"));
    }

    #[test]
    fn test_value_type_name() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!(1)), "number");
        assert_eq!(value_type_name(&json!("x")), "string");
        assert_eq!(value_type_name(&json!([])), "array");
        assert_eq!(value_type_name(&json!({})), "object");
    }

    #[test]
    fn test_validator_error_converts() {
        let err: FormError = ValidatorError::new("offline").into();
        assert!(matches!(err, FormError::Validator(_)));
    }
}
