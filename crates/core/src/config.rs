//! Cache configuration with precedence and validation

use crate::constants;
use crate::errors::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for a cache instance.
///
/// One facade instance can be shared across unrelated callers as long as
/// each uses a distinct `key_prefix` namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied when `set` omits one
    pub default_ttl: Duration,
    /// Namespace string prepended to every key before storage
    pub key_prefix: String,
    /// Interval for the background expired-entry sweeper.
    /// `Duration::ZERO` disables the sweeper (useful for tests).
    pub cleanup_interval: Duration,
    /// Whether each write schedules an eager expiry callback.
    /// Expiry stays correct with this off; `get` re-checks authoritatively.
    pub eager_expiry: bool,
    /// Opaque connection parameters for a substituted networked backend
    pub backend_params: HashMap<String, String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: constants::DEFAULT_TTL,
            key_prefix: constants::DEFAULT_KEY_PREFIX.to_string(),
            cleanup_interval: constants::DEFAULT_CLEANUP_INTERVAL,
            eager_expiry: true,
            backend_params: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// Validate the configuration, failing fast on unusable values
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl == Duration::ZERO {
            return Err(CacheError::configuration(
                "default_ttl must be greater than zero",
            ));
        }
        if self.key_prefix.is_empty() {
            return Err(CacheError::configuration("key_prefix must not be empty"));
        }
        if self.key_prefix.contains(':') {
            return Err(CacheError::configuration(
                "key_prefix must not contain the ':' separator",
            ));
        }
        Ok(())
    }

    /// Apply `HOARD_CACHE_*` environment overrides on top of this config.
    /// Unparseable values are ignored with a log line rather than failing,
    /// matching the precedence defaults < environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(ttl_str) = std::env::var(constants::ENV_DEFAULT_TTL) {
            match ttl_str.parse::<u64>() {
                Ok(secs) if secs > 0 => self.default_ttl = Duration::from_secs(secs),
                _ => tracing::warn!(
                    value = %ttl_str,
                    "Ignoring unparseable {}",
                    constants::ENV_DEFAULT_TTL
                ),
            }
        }

        if let Ok(prefix) = std::env::var(constants::ENV_KEY_PREFIX) {
            if !prefix.is_empty() {
                self.key_prefix = prefix;
            }
        }

        if let Ok(interval_str) = std::env::var(constants::ENV_CLEANUP_INTERVAL) {
            match interval_str.parse::<u64>() {
                Ok(secs) => self.cleanup_interval = Duration::from_secs(secs),
                Err(_) => tracing::warn!(
                    value = %interval_str,
                    "Ignoring unparseable {}",
                    constants::ENV_CLEANUP_INTERVAL
                ),
            }
        }

        if let Ok(eager_str) = std::env::var(constants::ENV_EAGER_EXPIRY) {
            self.eager_expiry = eager_str.to_lowercase() != "false";
        }

        self
    }
}

/// Builder for cache configurations
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
        }
    }

    /// Set the default TTL
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = ttl;
        self
    }

    /// Set the namespace prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.key_prefix = prefix.into();
        self
    }

    /// Set the background sweeper interval
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.config.cleanup_interval = interval;
        self
    }

    /// Enable or disable per-write eager expiry timers
    pub fn with_eager_expiry(mut self, enabled: bool) -> Self {
        self.config.eager_expiry = enabled;
        self
    }

    /// Add an opaque backend connection parameter
    pub fn with_backend_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.config.backend_params.insert(name.into(), value.into());
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<CacheConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
