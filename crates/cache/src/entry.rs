//! Cache entry representation

use std::time::Duration;
use tokio::time::Instant;

/// A single cached value with its lifecycle metadata.
///
/// The value itself is opaque serialized bytes; the facade is what knows
/// how to decode it. `sequence` identifies the write that produced this
/// entry: deferred expiry callbacks capture it and only delete when the
/// stored entry still carries the same sequence, so a stale timer can
/// never remove a newer write under the same key.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized value bytes
    pub data: Vec<u8>,
    /// When this entry was written
    pub created_at: Instant,
    /// How long the entry stays fresh
    pub ttl: Duration,
    /// Optional caller-supplied version marker
    pub version: Option<String>,
    /// Tags this entry is indexed under
    pub tags: Vec<String>,
    /// Write sequence number, unique per store write
    pub sequence: u64,
}

impl CacheEntry {
    pub fn new(
        data: Vec<u8>,
        ttl: Duration,
        tags: Vec<String>,
        version: Option<String>,
        sequence: u64,
    ) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
            version,
            tags,
            sequence,
        }
    }

    /// Authoritative expiry predicate. Reads consult this regardless of
    /// whether any eager expiry timer ever fires.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }

    /// Remaining time until expiry, zero once expired
    pub fn time_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.created_at.elapsed())
    }

    /// Approximate heap footprint of this entry in bytes
    pub fn size_bytes(&self) -> u64 {
        let tag_bytes: usize = self.tags.iter().map(String::len).sum();
        let version_bytes = self.version.as_ref().map_or(0, String::len);
        (self.data.len() + tag_bytes + version_bytes) as u64
    }
}
