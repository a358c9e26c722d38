//! Shared foundation for the `hoard` caching layer.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `CacheError` enum and `Result` type
//!   alias, centralizing all possible failure modes for predictable error
//!   handling across the workspace.
//! - **`config`**: The configuration surface for a cache instance, with a
//!   builder and environment variable overrides.
//! - **`constants`**: Shared static constants such as default TTLs,
//!   reserved keys, and environment variable names.

pub mod config;
pub mod constants;
pub mod errors;

pub use self::{
    config::{CacheConfig, CacheConfigBuilder},
    errors::{BoxError, CacheError, RecoveryHint, Result, SerializationOp},
};
