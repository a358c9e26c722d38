//! Display implementations for cache errors

use super::types::CacheError;
use std::fmt;

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message, .. } => {
                write!(f, "Cache configuration error: {message}")
            }
            Self::Serialization {
                key,
                operation,
                source,
                ..
            } => write!(f, "Failed to {operation:?} cache entry '{key}': {source}"),
            Self::InvalidKey { key, reason, .. } => {
                write!(f, "Invalid cache key '{key}': {reason}")
            }
            Self::InvalidPattern {
                pattern, reason, ..
            } => write!(f, "Invalid invalidation pattern '{pattern}': {reason}"),
            Self::StoreUnavailable {
                operation, reason, ..
            } => write!(f, "Cache store unavailable during {operation}: {reason}"),
            Self::Producer { key, source, .. } => {
                write!(f, "Producer failed while populating '{key}': {source}")
            }
            Self::Timeout {
                operation,
                duration,
                ..
            } => write!(f, "Timed out during {operation} after {duration:?}"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialization { source, .. } | Self::Producer { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}
