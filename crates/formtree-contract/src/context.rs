//! Opaque context handed through to validators.

use serde_json::{Map, Value};

/// A string-keyed bag of JSON values passed to every validator call.
///
/// The engine never inspects the contents; it exists so callers can thread
/// tenant ids, locale, feature flags and similar through to their rules.
#[derive(Clone, Debug, Default)]
pub struct ValidationContext {
    entries: Map<String, Value>,
}

impl ValidationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert an entry (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get an entry by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Check if a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the context has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_insert_get() {
        let ctx = ValidationContext::new()
            .with("tenant", "acme")
            .with("flags", json!({"strict": true}));

        assert_eq!(ctx.get("tenant"), Some(&json!("acme")));
        assert!(ctx.contains_key("flags"));
        assert_eq!(ctx.len(), 2);
        assert!(ctx.get("missing").is_none());
    }

    #[test]
    fn test_context_replace() {
        let mut ctx = ValidationContext::new();
        ctx.insert("k", 1);
        ctx.insert("k", 2);
        assert_eq!(ctx.get("k"), Some(&json!(2)));
        assert_eq!(ctx.len(), 1);
    }
}
