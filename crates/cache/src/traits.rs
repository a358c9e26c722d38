//! Backend trait for the key-value table
//!
//! The store orchestration (tag index, sequence numbers, statistics,
//! expiry) only talks to the table through [`CacheBackend`], so a
//! networked store can be substituted without touching the facade. The
//! default implementation is the infallible [`crate::memory::MemoryBackend`];
//! a remote backend surfaces faults as `StoreUnavailable`, which the
//! facade degrades to misses or dropped writes.

use crate::entry::CacheEntry;
use async_trait::async_trait;
use hoard_core::Result;

/// Minimal interface a backing key-value table must provide.
///
/// Keys arriving here are already namespaced by the facade.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch the entry stored under `key`, expired or not. Expiry policy
    /// belongs to the store layer, not the backend.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Store `entry` under `key`, replacing any previous entry
    async fn set(&self, key: &str, entry: CacheEntry) -> Result<()>;

    /// Remove and return the entry under `key`, if any
    async fn delete(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Remove the entry under `key` only if it still carries `sequence`.
    /// Guards deferred expiry callbacks against deleting a newer write.
    ///
    /// The default implementation is read-then-delete; backends with an
    /// atomic conditional remove should override it.
    async fn delete_if_sequence(&self, key: &str, sequence: u64) -> Result<Option<CacheEntry>> {
        match self.get(key).await? {
            Some(entry) if entry.sequence == sequence => self.delete(key).await,
            _ => Ok(None),
        }
    }

    /// Snapshot of all live keys. Used by pattern invalidation and the
    /// expired-entry sweeper; no ordering or point-in-time guarantee.
    async fn scan_keys(&self) -> Result<Vec<String>>;

    /// Number of stored entries, expired ones included
    async fn len(&self) -> Result<usize>;

    /// Drop every entry
    async fn clear(&self) -> Result<()>;
}
