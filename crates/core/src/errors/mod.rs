//! Error handling for the caching layer
//!
//! Errors carry a [`RecoveryHint`] describing what a caller or operator can
//! do about them. Infrastructure faults are meant to be logged and degraded
//! at the facade; caller errors surface immediately.

mod conversions;
mod display;
mod recovery;
mod types;

pub use types::*;
