//! Deferred expiry: per-write timers and a background sweeper
//!
//! Both paths are memory-reclamation optimizations. Correctness never
//! depends on them: `CacheStore::get` re-checks expiry authoritatively,
//! so the cache behaves identically with every timer disabled.

use crate::store::CacheStore;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct ExpirationScheduler {
    /// Weak so in-flight timers never keep a dropped cache alive
    store: Weak<CacheStore>,
    sweeper: RwLock<Option<JoinHandle<()>>>,
}

impl ExpirationScheduler {
    pub fn new(store: &Arc<CacheStore>) -> Self {
        Self {
            store: Arc::downgrade(store),
            sweeper: RwLock::new(None),
        }
    }

    /// Schedule the eager expiry callback for one write. The callback
    /// captures `(key, sequence)`, never the entry itself: if the key is
    /// overwritten before the timer fires, the sequence check makes the
    /// stale callback a no-op.
    pub fn schedule(&self, key: String, ttl: Duration, sequence: u64) {
        let store = self.store.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let Some(store) = store.upgrade() else {
                return;
            };
            match store.delete_if_sequence(&key, sequence).await {
                Ok(true) => {
                    tracing::trace!(key = %key, sequence, "Eagerly expired cache entry");
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(key = %key, "Eager expiry failed: {}", e);
                }
            }
        });
    }

    /// Start the periodic expired-entry sweep.
    /// A zero interval disables the sweeper (useful for tests).
    pub fn start_sweeper(&self, interval: Duration) {
        if interval == Duration::ZERO {
            return;
        }

        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                match store.purge_expired().await {
                    Ok(purged) if purged > 0 => {
                        tracing::debug!(purged, "Swept expired cache entries");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("Cache sweep error: {}", e);
                    }
                }
            }
        });

        *self.sweeper.write() = Some(handle);
    }
}

impl Drop for ExpirationScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.write().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn store() -> Arc<CacheStore> {
        Arc::new(CacheStore::new(Arc::new(MemoryBackend::new())))
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_deletes_entry_after_ttl() {
        let store = store();
        let scheduler = ExpirationScheduler::new(&store);

        let seq = store
            .set("k", b"v".to_vec(), Duration::from_secs(5), vec![], None)
            .await
            .unwrap();
        scheduler.schedule("k".to_string(), Duration::from_secs(5), seq);

        // Let the spawned timer task arm its sleep before paused time moves
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_spares_rewritten_entry() {
        let store = store();
        let scheduler = ExpirationScheduler::new(&store);

        let first = store
            .set("k", b"v1".to_vec(), Duration::from_secs(5), vec![], None)
            .await
            .unwrap();
        scheduler.schedule("k".to_string(), Duration::from_secs(5), first);

        // Overwrite before the first timer fires
        tokio::time::advance(Duration::from_secs(3)).await;
        store
            .set("k", b"v2".to_vec(), Duration::from_secs(60), vec![], None)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;

        let entry = store.get("k").await.unwrap().unwrap();
        assert_eq!(entry.data, b"v2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_reaps_expired_entries() {
        let store = store();
        let scheduler = ExpirationScheduler::new(&store);
        scheduler.start_sweeper(Duration::from_secs(10));

        store
            .set("k", b"v".to_vec(), Duration::from_secs(5), vec![], None)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_interval_disables_sweeper() {
        let store = store();
        let scheduler = ExpirationScheduler::new(&store);
        scheduler.start_sweeper(Duration::ZERO);
        assert!(scheduler.sweeper.read().is_none());
    }
}
