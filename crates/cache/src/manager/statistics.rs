//! Instrumentation accessors

use super::CacheManager;
use crate::stats::StatsSnapshot;

impl CacheManager {
    /// Detached snapshot of the counters and hit rate. Later cache
    /// activity never mutates a snapshot already handed out.
    pub fn stats(&self) -> StatsSnapshot {
        self.store.stats().snapshot()
    }

    /// Number of stored entries, expired-but-unswept ones included
    pub async fn cache_size(&self) -> usize {
        match self.store.len().await {
            Ok(len) => len,
            Err(e) => {
                tracing::warn!("Cache size probe degraded: {}", e);
                0
            }
        }
    }

    /// Approximate bytes held by live entries
    pub fn memory_usage(&self) -> u64 {
        self.store.stats().memory_bytes()
    }
}
