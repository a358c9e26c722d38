//! Entry lifecycle: reads with lazy expiry, tag-reconciling writes,
//! idempotent deletes
//!
//! The store is the only writer of the tag index, which keeps the index
//! invariant local: every mutation that changes an entry's tag set runs
//! the matching index reconciliation before returning.

use crate::entry::CacheEntry;
use crate::stats::CacheStats;
use crate::tags::TagIndex;
use crate::traits::CacheBackend;
use hoard_core::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    tags: TagIndex,
    stats: Arc<CacheStats>,
    /// Monotonic write counter; each `set` stamps its entry with the next
    /// value so deferred deletions can tell writes apart.
    sequence: AtomicU64,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            tags: TagIndex::new(),
            stats: Arc::new(CacheStats::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Read `key`, enforcing expiry. An expired entry is implicitly
    /// deleted and the read counts as a miss; a live entry counts as a
    /// hit. Expiry holds here even if no timer ever fires.
    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        match self.backend.get(key).await? {
            Some(entry) if entry.is_expired() => {
                self.reap(key, entry.sequence).await?;
                self.stats.record_miss();
                Ok(None)
            }
            Some(entry) => {
                self.stats.record_hit();
                Ok(Some(entry))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    /// Write `key`, reconciling tag links against any previous entry.
    /// Returns the write's sequence number for expiry scheduling.
    pub async fn set(
        &self,
        key: &str,
        data: Vec<u8>,
        ttl: Duration,
        tags: Vec<String>,
        version: Option<String>,
    ) -> Result<u64> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let entry = CacheEntry::new(data, ttl, tags, version, sequence);
        let added_bytes = entry.size_bytes();

        let previous = self.backend.get(key).await?;
        let replaced_bytes = match &previous {
            Some(old) => {
                self.tags.reconcile(key, &old.tags, &entry.tags);
                old.size_bytes()
            }
            None => {
                self.tags.insert(key, &entry.tags);
                0
            }
        };

        self.backend.set(key, entry).await?;
        self.stats.record_set(added_bytes, replaced_bytes);
        Ok(sequence)
    }

    /// Delete `key` and all of its tag links. Idempotent: deleting an
    /// absent key is a no-op, never an error.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let removed = self.backend.delete(key).await?;
        match removed {
            Some(entry) => {
                self.tags.remove(key, &entry.tags);
                self.stats.record_delete(entry.size_bytes());
                Ok(true)
            }
            None => {
                self.stats.record_delete(0);
                Ok(false)
            }
        }
    }

    /// Expire `key` only if it still carries `sequence`. Called by stale
    /// timers; a newer write under the same key makes this a no-op.
    pub async fn delete_if_sequence(&self, key: &str, sequence: u64) -> Result<bool> {
        Ok(self.reap(key, sequence).await?.is_some())
    }

    /// Sweep every stored entry and expire the stale ones. Does not touch
    /// the hit/miss counters; only caller reads do.
    pub async fn purge_expired(&self) -> Result<usize> {
        let mut purged = 0;
        for key in self.backend.scan_keys().await? {
            if let Some(entry) = self.backend.get(&key).await? {
                if entry.is_expired() && self.reap(&key, entry.sequence).await?.is_some() {
                    purged += 1;
                }
            }
        }
        Ok(purged)
    }

    /// Sequence-guarded removal with tag and byte accounting
    async fn reap(&self, key: &str, sequence: u64) -> Result<Option<CacheEntry>> {
        let removed = self.backend.delete_if_sequence(key, sequence).await?;
        if let Some(entry) = &removed {
            self.tags.remove(key, &entry.tags);
            self.stats.record_expiration(entry.size_bytes());
        }
        Ok(removed)
    }

    /// Keys currently linked under `tag`; the bucket is consumed
    pub fn take_tagged_keys(&self, tag: &str) -> Vec<String> {
        self.tags.take_keys(tag)
    }

    pub async fn scan_keys(&self) -> Result<Vec<String>> {
        self.backend.scan_keys().await
    }

    pub async fn len(&self) -> Result<usize> {
        self.backend.len().await
    }

    pub async fn clear(&self) -> Result<()> {
        self.backend.clear().await?;
        self.tags.clear();
        Ok(())
    }

    pub fn stats(&self) -> &Arc<CacheStats> {
        &self.stats
    }

    #[cfg(test)]
    pub(crate) fn tag_index(&self) -> &TagIndex {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn store() -> CacheStore {
        CacheStore::new(Arc::new(MemoryBackend::new()))
    }

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_set_then_get_returns_value() {
        let store = store();
        store
            .set("k", b"value".to_vec(), Duration::from_secs(60), vec![], None)
            .await
            .unwrap();

        let entry = store.get("k").await.unwrap().unwrap();
        assert_eq!(entry.data, b"value");
        assert_eq!(store.stats().snapshot().hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_implicitly_deleted() {
        let store = store();
        store
            .set("k", b"v".to_vec(), Duration::from_secs(5), tags(&["t"]), None)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;

        // No timers exist at the store level; the lazy check alone must hold
        assert!(store.get("k").await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
        // Tag links must not outlive the entry
        assert!(store.tag_index().keys_for("t").is_empty());

        let snapshot = store.stats().snapshot();
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.expirations, 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();
        store
            .set("k", b"v".to_vec(), Duration::from_secs(60), vec![], None)
            .await
            .unwrap();

        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite_reconciles_tags() {
        let store = store();
        store
            .set("k", b"v1".to_vec(), Duration::from_secs(60), tags(&["t1"]), None)
            .await
            .unwrap();
        store
            .set("k", b"v2".to_vec(), Duration::from_secs(60), tags(&["t2"]), None)
            .await
            .unwrap();

        assert!(store.tag_index().keys_for("t1").is_empty());
        assert_eq!(store.tag_index().keys_for("t2"), vec!["k"]);
    }

    #[tokio::test]
    async fn test_stale_sequence_does_not_delete_newer_write() {
        let store = store();
        let first = store
            .set("k", b"v1".to_vec(), Duration::from_secs(60), vec![], None)
            .await
            .unwrap();
        store
            .set("k", b"v2".to_vec(), Duration::from_secs(60), vec![], None)
            .await
            .unwrap();

        assert!(!store.delete_if_sequence("k", first).await.unwrap());
        let entry = store.get("k").await.unwrap().unwrap();
        assert_eq!(entry.data, b"v2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_leaves_live_entries() {
        let store = store();
        store
            .set("old", b"v".to_vec(), Duration::from_secs(5), vec![], None)
            .await
            .unwrap();
        store
            .set("fresh", b"v".to_vec(), Duration::from_secs(120), vec![], None)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert!(store.get("fresh").await.unwrap().is_some());
        assert!(store.get("old").await.unwrap().is_none());
    }
}
