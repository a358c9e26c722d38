//! Synthetic health probe

use super::{CacheManager, SetOptions};
use hoard_core::{constants, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Result of one health probe. This exercises only the fast path and is
/// not a consistency audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub latency: Duration,
    pub error: Option<String>,
}

impl CacheManager {
    /// Write a nonce to a reserved key, read it back, delete it, and
    /// report healthy iff the read returned exactly the written value.
    pub async fn health_check(&self) -> HealthReport {
        let started = std::time::Instant::now();
        let nonce = Uuid::new_v4().to_string();

        match self.health_roundtrip(&nonce).await {
            Ok(true) => HealthReport {
                healthy: true,
                latency: started.elapsed(),
                error: None,
            },
            Ok(false) => HealthReport {
                healthy: false,
                latency: started.elapsed(),
                error: Some("read did not return the written value".to_string()),
            },
            Err(e) => HealthReport {
                healthy: false,
                latency: started.elapsed(),
                error: Some(e.to_string()),
            },
        }
    }

    async fn health_roundtrip(&self, nonce: &str) -> Result<bool> {
        let key = constants::HEALTH_CHECK_KEY;
        self.set(
            key,
            &nonce,
            SetOptions::default().ttl(Duration::from_secs(5)),
        )
        .await?;
        let read: Option<String> = self.get(key).await?;
        self.delete(key).await?;
        Ok(read.as_deref() == Some(nonce))
    }
}
