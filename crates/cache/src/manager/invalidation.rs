//! Bulk invalidation by tag and by key pattern
//!
//! Both operations are best-effort with respect to concurrent writes: a
//! `set` racing an in-flight sweep may or may not be caught by it, and a
//! later write may shadow an invalidation that logically preceded it.
//! Callers needing strict ordering serialize externally via the lock
//! manager.

use super::CacheManager;
use globset::Glob;
use hoard_core::{CacheError, Result};

impl CacheManager {
    /// Delete every key currently indexed under `tag`.
    /// Returns how many entries were removed.
    pub async fn invalidate_by_tag(&self, tag: &str) -> Result<usize> {
        let keys = self.store.take_tagged_keys(tag);
        let mut invalidated = 0;

        for key in keys {
            match self.store.delete(&key).await {
                Ok(true) => invalidated += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(key = %key, tag, "Tag invalidation skipped entry: {}", e);
                }
            }
        }

        tracing::debug!(tag, invalidated, "Invalidated entries by tag");
        Ok(invalidated)
    }

    /// Delete every key matching `pattern`, where `*` is a
    /// multi-character wildcard. A malformed pattern fails fast.
    ///
    /// This is a full linear scan of live keys; no secondary index is
    /// maintained for patterns.
    pub async fn invalidate_by_pattern(&self, pattern: &str) -> Result<usize> {
        let matcher = Glob::new(pattern)
            .map_err(|e| CacheError::invalid_pattern(pattern, e.to_string()))?
            .compile_matcher();

        let keys = match self.store.scan_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(pattern, "Pattern invalidation degraded: {}", e);
                return Ok(0);
            }
        };

        let mut invalidated = 0;
        for full_key in keys {
            // Patterns match caller-visible keys, not namespaced ones
            let Some(visible) = self.keyspace.strip(&full_key) else {
                continue;
            };
            if !matcher.is_match(visible) {
                continue;
            }
            match self.store.delete(&full_key).await {
                Ok(true) => invalidated += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(key = %full_key, "Pattern invalidation skipped entry: {}", e);
                }
            }
        }

        tracing::debug!(pattern, invalidated, "Invalidated entries by pattern");
        Ok(invalidated)
    }

    /// Drop every entry and tag link
    pub async fn clear(&self) -> Result<()> {
        if let Err(e) = self.store.clear().await {
            tracing::warn!("Cache clear degraded: {}", e);
        }
        Ok(())
    }
}
