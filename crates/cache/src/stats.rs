//! Cache statistics with atomic counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Internal counters, updated by every store operation
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    expirations: AtomicU64,
    total_bytes: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self, added_bytes: u64, replaced_bytes: u64) {
        self.sets.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(added_bytes, Ordering::Relaxed);
        self.total_bytes.fetch_sub(replaced_bytes, Ordering::Relaxed);
    }

    pub fn record_delete(&self, removed_bytes: u64) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_sub(removed_bytes, Ordering::Relaxed);
    }

    pub fn record_expiration(&self, removed_bytes: u64) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_sub(removed_bytes, Ordering::Relaxed);
    }

    pub fn memory_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::Relaxed)
    }

    /// Hits over total reads, 0.0 when nothing has been read yet
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Detached snapshot of the current counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            memory_bytes: self.total_bytes.load(Ordering::Relaxed),
            hit_rate: self.hit_rate(),
        }
    }
}

/// Immutable view of cache counters at one point in time.
/// Mutating the cache after taking a snapshot never changes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub expirations: u64,
    pub memory_bytes: u64,
    pub hit_rate: f64,
}
