//! In-memory metadata cache.
//!
//! Caches validated metadata by the source URI exactly as the caller passed
//! it. Entries live until removed explicitly; there is no TTL and no
//! eviction. The cache is constructed by the caller and shared through an
//! `Arc`, so tests get a fresh instance each.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use super::model::CourseMetadata;

/// Snapshot of the cache contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cached entries.
    pub size: usize,
    /// Cached keys, sorted.
    pub keys: Vec<String>,
    /// Length of the JSON serialization of all cached values.
    pub approximate_bytes: usize,
}

impl CacheStats {
    /// Human-readable estimate, e.g. `~1.25 KB`.
    pub fn memory_usage(&self) -> String {
        format!("~{:.2} KB", self.approximate_bytes as f64 / 1024.0)
    }
}

/// Thread-safe cache of validated metadata.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: DashMap<String, CourseMetadata>,
}

impl MetadataCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the metadata cached under `key`.
    pub fn get(&self, key: &str) -> Option<CourseMetadata> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Cache `value` under `key` unless an entry already exists.
    ///
    /// Returns `true` if the value was stored. Existing entries are never
    /// overwritten; invalidate with [`remove`](Self::remove) first.
    pub fn insert(&self, key: impl Into<String>, value: CourseMetadata) -> bool {
        match self.entries.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Check whether `key` is cached.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove `key`, returning whether an entry was present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, _| {
            removed += 1;
            false
        });
        removed
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect size, keys and an approximate byte size.
    pub fn stats(&self) -> CacheStats {
        let mut keys = Vec::with_capacity(self.entries.len());
        let mut values = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter() {
            keys.push(entry.key().clone());
            values.push(entry.value().clone());
        }
        keys.sort();

        let approximate_bytes = serde_json::to_vec(&values)
            .map(|bytes| bytes.len())
            .unwrap_or(0);

        CacheStats {
            size: keys.len(),
            keys,
            approximate_bytes,
        }
    }
}
