//! Cache facade composing the store, expiry scheduling, locks, and
//! instrumentation into the public operation set

mod health;
mod invalidation;
mod operations;
mod statistics;
mod warming;

pub use health::HealthReport;
pub use operations::{MsetEntry, SetOptions};
pub use warming::{WarmEntry, WarmReport};

use crate::expiry::ExpirationScheduler;
use crate::keys::Keyspace;
use crate::lock::LockManager;
use crate::memory::MemoryBackend;
use crate::store::CacheStore;
use crate::traits::CacheBackend;
use hoard_core::{CacheConfig, Result};
use std::sync::Arc;

/// The caching layer's public entry point.
///
/// Explicitly constructed and dependency-injected into consumers; there
/// is no ambient global instance. Construction and teardown belong to
/// the composition root. All mutation of the store and tag index flows
/// through this facade.
pub struct CacheManager {
    config: CacheConfig,
    keyspace: Keyspace,
    store: Arc<CacheStore>,
    scheduler: ExpirationScheduler,
    locks: LockManager,
}

impl CacheManager {
    /// Create a manager over the default in-memory backend
    pub async fn new(config: CacheConfig) -> Result<Self> {
        Self::with_backend(config, Arc::new(MemoryBackend::new())).await
    }

    /// Create a manager over a caller-supplied backend
    pub async fn with_backend(
        config: CacheConfig,
        backend: Arc<dyn CacheBackend>,
    ) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(CacheStore::new(backend));
        let scheduler = ExpirationScheduler::new(&store);
        scheduler.start_sweeper(config.cleanup_interval);

        Ok(Self {
            keyspace: Keyspace::new(config.key_prefix.clone()),
            store,
            scheduler,
            locks: LockManager::new(),
            config,
        })
    }

    pub fn builder() -> CacheManagerBuilder {
        CacheManagerBuilder::new()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The lock primitive, exposed for callers that serialize population
    /// themselves
    pub fn locks(&self) -> &LockManager {
        &self.locks
    }
}

/// Builder for cache managers
pub struct CacheManagerBuilder {
    config: CacheConfig,
    backend: Option<Arc<dyn CacheBackend>>,
}

impl CacheManagerBuilder {
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
            backend: None,
        }
    }

    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub async fn build(self) -> Result<CacheManager> {
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(MemoryBackend::new()));
        CacheManager::with_backend(self.config, backend).await
    }
}

impl Default for CacheManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
