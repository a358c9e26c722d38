//! Default in-process backend

use crate::entry::CacheEntry;
use crate::traits::CacheBackend;
use async_trait::async_trait;
use dashmap::DashMap;
use hoard_core::Result;

/// In-memory key-value table backed by a concurrent map.
///
/// Never returns an error; the fallible trait surface exists for
/// substituted networked backends.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> Result<()> {
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.remove(key).map(|(_, entry)| entry))
    }

    async fn delete_if_sequence(&self, key: &str, sequence: u64) -> Result<Option<CacheEntry>> {
        // Atomic compare-and-remove; the default read-then-delete would
        // leave a window for a concurrent overwrite between the two steps.
        Ok(self
            .entries
            .remove_if(key, |_, entry| entry.sequence == sequence)
            .map(|(_, entry)| entry))
    }

    async fn scan_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.iter().map(|kv| kv.key().clone()).collect())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}
