//! Validator stubs for tests and examples.

use crate::{Path, ResultTree, ValidationContext, Validator, ValidatorError};
use async_trait::async_trait;
use serde_json::Value;

/// A validator that accepts every model.
pub struct AcceptAll;

#[async_trait]
impl Validator for AcceptAll {
    async fn validate(
        &self,
        _model: &Value,
        _context: &ValidationContext,
        _scope: Option<&Path>,
    ) -> Result<ResultTree, ValidatorError> {
        Ok(ResultTree::Clean)
    }
}

/// A validator that returns the same fixed result tree on every call.
pub struct StaticValidator {
    tree: ResultTree,
}

impl StaticValidator {
    /// Create a validator returning `tree` on every call.
    pub fn new(tree: ResultTree) -> Self {
        Self { tree }
    }
}

#[async_trait]
impl Validator for StaticValidator {
    async fn validate(
        &self,
        _model: &Value,
        _context: &ValidationContext,
        _scope: Option<&Path>,
    ) -> Result<ResultTree, ValidatorError> {
        Ok(self.tree.clone())
    }
}

/// A validator that always fails the call itself.
pub struct FailingValidator {
    message: String,
}

impl FailingValidator {
    /// Create a validator that rejects with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Validator for FailingValidator {
    async fn validate(
        &self,
        _model: &Value,
        _context: &ValidationContext,
        _scope: Option<&Path>,
    ) -> Result<ResultTree, ValidatorError> {
        Err(ValidatorError::new(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accept_all() {
        let v = AcceptAll;
        let out = v
            .validate(&Value::Null, &ValidationContext::new(), None)
            .await
            .unwrap();
        assert!(out.is_valid());
    }

    #[tokio::test]
    async fn test_static_validator() {
        let v = StaticValidator::new(ResultTree::leaf(["nope"]));
        let out = v
            .validate(&Value::Null, &ValidationContext::new(), None)
            .await
            .unwrap();
        assert!(!out.is_valid());
    }

    #[tokio::test]
    async fn test_failing_validator() {
        let v = FailingValidator::new("rule engine offline");
        let err = v
            .validate(&Value::Null, &ValidationContext::new(), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rule engine offline"));
    }
}
