//! Key namespacing
//!
//! Every caller-visible key is prefixed with the configured namespace
//! before it reaches the backend, so one facade instance can be shared
//! across unrelated callers without collisions.

use hoard_core::{CacheError, Result};

/// Applies and strips the namespace prefix
#[derive(Debug, Clone)]
pub struct Keyspace {
    prefix: String,
}

impl Keyspace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Validate `key` and return its namespaced storage form
    pub fn namespaced(&self, key: &str) -> Result<String> {
        if key.is_empty() {
            return Err(CacheError::invalid_key(key, "key must not be empty"));
        }
        Ok(format!("{}:{}", self.prefix, key))
    }

    /// Strip the namespace from a storage key. Returns `None` for keys
    /// belonging to a different namespace.
    pub fn strip<'a>(&self, full_key: &'a str) -> Option<&'a str> {
        full_key
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
    }
}
