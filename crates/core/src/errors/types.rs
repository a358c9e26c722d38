//! Core error types for the caching layer

use std::time::Duration;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Boxed error type used for caller-supplied producer failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for cache operations
#[derive(Debug)]
pub enum CacheError {
    /// Configuration error
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },

    /// Serialization/deserialization of a cached value failed
    Serialization {
        key: String,
        operation: SerializationOp,
        source: Box<dyn std::error::Error + Send + Sync>,
        recovery_hint: RecoveryHint,
    },

    /// Invalid cache key
    InvalidKey {
        key: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// Invalidation pattern failed to compile
    InvalidPattern {
        pattern: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// Backing store unavailable
    StoreUnavailable {
        operation: &'static str,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// Caller-supplied producer failed during cache population
    Producer {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
        recovery_hint: RecoveryHint,
    },

    /// Timeout while coordinating with a concurrent populator
    Timeout {
        operation: &'static str,
        duration: Duration,
        recovery_hint: RecoveryHint,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone)]
pub enum RecoveryHint {
    /// Retry the operation
    Retry { after: Duration },

    /// Clear the cache and retry
    ClearAndRetry,

    /// Update cache configuration
    UpdateConfiguration,

    /// No automated recovery possible
    Manual { instructions: String },

    /// Operation can be safely ignored
    Ignore,
}

/// Serialization operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationOp {
    Serialize,
    Deserialize,
}

impl CacheError {
    /// Configuration error with a standard hint
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        }
    }

    /// Invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Use a non-empty key without the reserved prefix".to_string(),
            },
        }
    }

    /// Invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Patterns use `*` as a multi-character wildcard".to_string(),
            },
        }
    }

    /// Serialization failure for a specific key
    pub fn serialization(
        key: impl Into<String>,
        operation: SerializationOp,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization {
            key: key.into(),
            operation,
            source: Box::new(source),
            recovery_hint: RecoveryHint::ClearAndRetry,
        }
    }

    /// Backing store fault during the named operation
    pub fn store_unavailable(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            operation,
            reason: reason.into(),
            recovery_hint: RecoveryHint::Retry {
                after: Duration::from_millis(100),
            },
        }
    }

    /// Producer failure during population of `key`
    pub fn producer(key: impl Into<String>, source: BoxError) -> Self {
        Self::Producer {
            key: key.into(),
            source,
            recovery_hint: RecoveryHint::Ignore,
        }
    }
}
