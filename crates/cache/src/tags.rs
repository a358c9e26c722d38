//! Derived tag index for bulk invalidation
//!
//! The index maps a tag to the set of keys currently carrying it. It is
//! never authoritative: it exists only to make `invalidate_by_tag` cheap,
//! and is rebuilt incrementally as a side effect of store mutations.
//! Invariant: a key appears under tag T iff its live entry's tag set
//! contains T; empty buckets are pruned immediately.

use dashmap::DashMap;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct TagIndex {
    index: DashMap<String, HashSet<String>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `key` under each of `tags`
    pub fn insert(&self, key: &str, tags: &[String]) {
        for tag in tags {
            self.index
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
    }

    /// Unlink `key` from each of `tags`, pruning buckets that empty out
    pub fn remove(&self, key: &str, tags: &[String]) {
        for tag in tags {
            if let Some(mut bucket) = self.index.get_mut(tag) {
                bucket.remove(key);
                let empty = bucket.is_empty();
                drop(bucket);
                if empty {
                    self.index.remove_if(tag, |_, bucket| bucket.is_empty());
                }
            }
        }
    }

    /// Replace `key`'s tag links: associations to tags absent from
    /// `new_tags` are dropped, new ones added. Overwrites must never
    /// retain stale links.
    pub fn reconcile(&self, key: &str, old_tags: &[String], new_tags: &[String]) {
        let stale: Vec<String> = old_tags
            .iter()
            .filter(|tag| !new_tags.contains(tag))
            .cloned()
            .collect();
        self.remove(key, &stale);
        self.insert(key, new_tags);
    }

    /// Remove the bucket for `tag` and return the keys it held.
    /// Best-effort with respect to concurrent writes: a `set` racing this
    /// sweep may or may not be caught by it.
    pub fn take_keys(&self, tag: &str) -> Vec<String> {
        self.index
            .remove(tag)
            .map(|(_, bucket)| bucket.into_iter().collect())
            .unwrap_or_default()
    }

    /// Keys currently linked under `tag`, snapshot only
    pub fn keys_for(&self, tag: &str) -> Vec<String> {
        self.index
            .get(tag)
            .map(|bucket| bucket.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of live tag buckets
    pub fn tag_count(&self) -> usize {
        self.index.len()
    }

    pub fn clear(&self) {
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let index = TagIndex::new();
        index.insert("k1", &tags(&["user"]));
        index.insert("k2", &tags(&["user", "admin"]));

        let mut user_keys = index.keys_for("user");
        user_keys.sort();
        assert_eq!(user_keys, vec!["k1", "k2"]);
        assert_eq!(index.keys_for("admin"), vec!["k2"]);
    }

    #[test]
    fn test_remove_prunes_empty_buckets() {
        let index = TagIndex::new();
        index.insert("k1", &tags(&["user"]));
        assert_eq!(index.tag_count(), 1);

        index.remove("k1", &tags(&["user"]));
        assert_eq!(index.tag_count(), 0);
        assert!(index.keys_for("user").is_empty());
    }

    #[test]
    fn test_reconcile_drops_stale_links() {
        let index = TagIndex::new();
        index.insert("k", &tags(&["t1"]));
        index.reconcile("k", &tags(&["t1"]), &tags(&["t2"]));

        assert!(index.keys_for("t1").is_empty());
        assert_eq!(index.keys_for("t2"), vec!["k"]);
        // t1 bucket must be pruned, not left dangling
        assert_eq!(index.tag_count(), 1);
    }

    #[test]
    fn test_reconcile_keeps_shared_tags() {
        let index = TagIndex::new();
        index.insert("k", &tags(&["shared", "old"]));
        index.reconcile("k", &tags(&["shared", "old"]), &tags(&["shared", "new"]));

        assert_eq!(index.keys_for("shared"), vec!["k"]);
        assert!(index.keys_for("old").is_empty());
        assert_eq!(index.keys_for("new"), vec!["k"]);
    }

    #[test]
    fn test_take_keys_empties_bucket() {
        let index = TagIndex::new();
        index.insert("k1", &tags(&["user"]));
        index.insert("k2", &tags(&["user"]));

        let mut taken = index.take_keys("user");
        taken.sort();
        assert_eq!(taken, vec!["k1", "k2"]);
        assert!(index.take_keys("user").is_empty());
    }
}
