//! Higher-order caching combinator
//!
//! `cached` wraps an async function in cache-aside population: calls go
//! through [`CacheManager::get_or_set`] under a key derived from the
//! argument. This is the explicit replacement for annotation-style
//! "cache this call" wrapping; there is no reflection or metadata
//! involved, only a closure.

use crate::manager::{CacheManager, SetOptions};
use futures::future::BoxFuture;
use hoard_core::{BoxError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// Wrap `f` so its results are cached under `key_fn(arg)` with the given
/// write options. The wrapper shares one `CacheManager`; concurrent cold
/// calls for the same key behave exactly like `get_or_set` (no implicit
/// single-flight).
pub fn cached<A, T, K, F, Fut, E>(
    manager: Arc<CacheManager>,
    key_fn: K,
    options: SetOptions,
    f: F,
) -> impl Fn(A) -> BoxFuture<'static, Result<T>>
where
    A: Send + 'static,
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
    K: Fn(&A) -> String,
    F: Fn(A) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    move |arg: A| {
        let manager = Arc::clone(&manager);
        let key = key_fn(&arg);
        let options = options.clone();
        let inner = f.clone();
        Box::pin(async move { manager.get_or_set(&key, options, move || inner(arg)).await })
    }
}
