//! The asynchronous validation contract.
//!
//! The form engine treats rule execution as an external capability: given
//! the current model, an opaque context, and an optional scope path, produce
//! a [`ResultTree`]. How rules are registered and evaluated is entirely the
//! validator's business.

use crate::{Path, ResultTree, ValidationContext};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure of a validator call itself (not a domain validation finding).
///
/// Domain findings are data and travel inside the [`ResultTree`]; this error
/// is for the call going wrong: rule engine unavailable, timeout, bug.
#[derive(Debug, Error)]
#[error("validator failed: {message}")]
pub struct ValidatorError {
    /// What went wrong.
    pub message: String,
}

impl ValidatorError {
    /// Create a validator error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Asynchronous validation over a projected model.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate a model and produce a result tree shaped like it.
    ///
    /// `scope` is a hint naming the field that triggered validation
    /// (`None` for a whole-form run). Implementations may use it to restrict
    /// which rules run, but the returned tree is always interpreted against
    /// the model root.
    async fn validate(
        &self,
        model: &Value,
        context: &ValidationContext,
        scope: Option<&Path>,
    ) -> Result<ResultTree, ValidatorError>;
}
