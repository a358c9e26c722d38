//! Single-key and batched cache operations
//!
//! Error policy: infrastructure faults never surface through `get`/`set`/
//! `delete`. A failing backend degrades a read to a miss and drops a
//! write with a log line; a degraded cache costs performance, never
//! correctness. Caller errors (invalid keys, unserializable values,
//! failing producers) surface immediately.

use super::CacheManager;
use crate::lock::LockOptions;
use hoard_core::{BoxError, CacheError, RecoveryHint, Result, SerializationOp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Per-write options for `set` and friends
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// TTL for this entry; the configured default applies when omitted
    pub ttl: Option<Duration>,
    /// Tags to index the entry under
    pub tags: Vec<String>,
    /// Opaque version marker stored with the entry
    pub version: Option<String>,
}

impl SetOptions {
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// One write in an `mset` batch
pub struct MsetEntry<T> {
    pub key: String,
    pub value: T,
    pub options: SetOptions,
}

impl<T> MsetEntry<T> {
    pub fn new(key: impl Into<String>, value: T, options: SetOptions) -> Self {
        Self {
            key: key.into(),
            value,
            options,
        }
    }
}

impl CacheManager {
    /// Read `key`. Returns `None` on miss, expiry, or a degraded backend;
    /// errors only for invalid keys.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let full_key = self.keyspace.namespaced(key)?;

        let entry = match self.store.get(&full_key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, "Cache read degraded to miss: {}", e);
                self.store.stats().record_miss();
                return Ok(None);
            }
        };

        match entry {
            Some(entry) => match serde_json::from_slice(&entry.data) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    // Undecodable entries are dropped rather than surfaced
                    tracing::warn!(key, "Dropping undecodable cache entry: {}", e);
                    let _ = self.store.delete(&full_key).await;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Write `key`. The TTL defaults from configuration; tags are
    /// reconciled against any previous entry. A backend fault drops the
    /// write with a log line.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, options: SetOptions) -> Result<()> {
        let full_key = self.keyspace.namespaced(key)?;
        let data = serde_json::to_vec(value)
            .map_err(|e| CacheError::serialization(key, SerializationOp::Serialize, e))?;
        let ttl = options.ttl.unwrap_or(self.config.default_ttl);

        match self
            .store
            .set(&full_key, data, ttl, options.tags, options.version)
            .await
        {
            Ok(sequence) => {
                if self.config.eager_expiry {
                    self.scheduler.schedule(full_key, ttl, sequence);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(key, "Cache write dropped: {}", e);
                Ok(())
            }
        }
    }

    /// Delete `key`. Idempotent; returns whether an entry was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let full_key = self.keyspace.namespaced(key)?;
        match self.store.delete(&full_key).await {
            Ok(removed) => Ok(removed),
            Err(e) => {
                tracing::warn!(key, "Cache delete dropped: {}", e);
                Ok(false)
            }
        }
    }

    /// Cache-aside population: return the cached value, or run `producer`
    /// and store its result. Producer failures propagate to the caller
    /// unchanged; the cache cannot synthesize a substitute value.
    ///
    /// Concurrent cold callers each invoke `producer` independently; this
    /// method holds no lock across the producer call. Use
    /// [`get_or_set_locked`](Self::get_or_set_locked) when one flight per
    /// key matters more than latency.
    pub async fn get_or_set<T, F, Fut, E>(
        &self,
        key: &str,
        options: SetOptions,
        producer: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<BoxError>,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        let value = producer()
            .await
            .map_err(|e| CacheError::producer(key, e.into()))?;
        self.set(key, &value, options).await?;
        Ok(value)
    }

    /// Single-flight variant of [`get_or_set`](Self::get_or_set): misses
    /// serialize on a named lock, so concurrent cold callers run one
    /// producer between them. Losing every retry without the value
    /// appearing yields a `Timeout` error.
    pub async fn get_or_set_locked<T, F, Fut, E>(
        &self,
        key: &str,
        options: SetOptions,
        lock_options: &LockOptions,
        producer: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<BoxError>,
    {
        if let Some(value) = self.get(key).await? {
            return Ok(value);
        }

        let lock_key = format!("populate:{key}");
        match self.locks.acquire(&lock_key, lock_options).await {
            Some(token) => {
                // Re-check under the lock; the previous holder may have
                // populated the key while we waited.
                let outcome = match self.get(key).await {
                    Ok(Some(value)) => Ok(value),
                    Ok(None) => match producer().await {
                        Ok(value) => self
                            .set(key, &value, options)
                            .await
                            .map(|_| value),
                        Err(e) => Err(CacheError::producer(key, e.into())),
                    },
                    Err(e) => Err(e),
                };
                self.locks.release(&lock_key, &token);
                outcome
            }
            None => {
                // The populator may have finished after our last look
                if let Some(value) = self.get(key).await? {
                    return Ok(value);
                }
                Err(CacheError::Timeout {
                    operation: "get_or_set_locked",
                    duration: lock_options.retry_delay * lock_options.max_retries,
                    recovery_hint: RecoveryHint::Retry {
                        after: lock_options.retry_delay,
                    },
                })
            }
        }
    }

    /// Batched read: one lookup per key, order-preserving. A failure
    /// resolving one key never prevents resolution of the others.
    pub async fn mget<T: DeserializeOwned>(&self, keys: &[&str]) -> Vec<Option<T>> {
        futures::future::join_all(keys.iter().copied().map(|key| async move {
            match self.get(key).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, "mget entry failed: {}", e);
                    None
                }
            }
        }))
        .await
    }

    /// Batched write: parallel independent writes with no cross-entry
    /// atomicity. Returns how many entries were written; failures are
    /// logged per entry.
    pub async fn mset<T: Serialize>(&self, entries: Vec<MsetEntry<T>>) -> usize {
        let results = futures::future::join_all(entries.into_iter().map(|entry| async move {
            match self.set(&entry.key, &entry.value, entry.options).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(key = %entry.key, "mset entry dropped: {}", e);
                    false
                }
            }
        }))
        .await;
        results.into_iter().filter(|written| *written).count()
    }
}
