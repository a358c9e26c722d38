//! Shared constants for the caching layer

use std::time::Duration;

/// TTL applied when `set` is called without an explicit one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// How often the background sweeper reaps expired entries.
/// `Duration::ZERO` disables the sweeper entirely.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Namespace prefix applied when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "hoard";

/// Reserved key used by the health check round-trip. The health probe
/// deletes it after every run, but it must never collide with caller keys.
pub const HEALTH_CHECK_KEY: &str = "__hoard_health__";

/// Environment variable overriding the default TTL, in seconds.
pub const ENV_DEFAULT_TTL: &str = "HOARD_CACHE_DEFAULT_TTL";

/// Environment variable overriding the key prefix.
pub const ENV_KEY_PREFIX: &str = "HOARD_CACHE_KEY_PREFIX";

/// Environment variable overriding the cleanup interval, in seconds.
pub const ENV_CLEANUP_INTERVAL: &str = "HOARD_CACHE_CLEANUP_INTERVAL";

/// Environment variable disabling per-write eager expiry timers.
pub const ENV_EAGER_EXPIRY: &str = "HOARD_CACHE_EAGER_EXPIRY";
