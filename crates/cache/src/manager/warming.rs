//! Cache warming: concurrent best-effort preloading

use super::{CacheManager, SetOptions};
use futures::future::BoxFuture;
use hoard_core::BoxError;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// One entry to preload: a key, write options, and the producer that
/// computes its value
pub struct WarmEntry<T> {
    key: String,
    options: SetOptions,
    producer: BoxFuture<'static, std::result::Result<T, BoxError>>,
}

impl<T: 'static> WarmEntry<T> {
    pub fn new<F, Fut, E>(key: impl Into<String>, options: SetOptions, producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self {
            key: key.into(),
            options,
            producer: Box::pin(async move { producer().await.map_err(Into::into) }),
        }
    }
}

/// Outcome of a warming run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmReport {
    pub warmed: usize,
    pub failed: usize,
}

impl CacheManager {
    /// Run every entry's producer concurrently and store the results.
    /// A failing producer is caught and logged per entry; it never aborts
    /// warming of its siblings.
    pub async fn warm_cache<T: Serialize>(&self, entries: Vec<WarmEntry<T>>) -> WarmReport {
        let results = futures::future::join_all(entries.into_iter().map(|entry| async move {
            let WarmEntry {
                key,
                options,
                producer,
            } = entry;
            match producer.await {
                Ok(value) => match self.set(&key, &value, options).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(key = %key, "Warm write failed: {}", e);
                        false
                    }
                },
                Err(e) => {
                    tracing::warn!(key = %key, "Warm producer failed: {}", e);
                    false
                }
            }
        }))
        .await;

        let warmed = results.iter().filter(|ok| **ok).count();
        let failed = results.len() - warmed;
        if warmed > 0 {
            tracing::info!(warmed, "Warmed cache entries");
        }
        WarmReport { warmed, failed }
    }
}
