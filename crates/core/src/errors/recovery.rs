//! Recovery utilities for cache errors

use super::types::{CacheError, RecoveryHint};

impl CacheError {
    /// Get the recovery hint for this error
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::Configuration { recovery_hint, .. }
            | Self::Serialization { recovery_hint, .. }
            | Self::InvalidKey { recovery_hint, .. }
            | Self::InvalidPattern { recovery_hint, .. }
            | Self::StoreUnavailable { recovery_hint, .. }
            | Self::Producer { recovery_hint, .. }
            | Self::Timeout { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Check if this error is transient and the operation can be retried
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.recovery_hint(), RecoveryHint::Retry { .. })
    }

    /// Check if this error should surface to callers rather than degrade.
    /// Infrastructure faults degrade to misses or dropped writes at the
    /// facade; caller and programmer errors always surface.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::InvalidKey { .. }
                | Self::InvalidPattern { .. }
                | Self::Producer { .. }
        )
    }
}
