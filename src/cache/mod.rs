/**
 * Cache Module
 *
 * An in-process cache with tag-based and path-based invalidation.
 *
 * Entries are stored under a string key with an associated set of tags.
 * Rendered routes are cached under a `path:` key derived from their
 * canonical path, which is what makes literal path invalidation
 * meaningful alongside tags.
 *
 * Mutation hooks never touch the cache directly: they return a list of
 * `Invalidation` instructions and a single `Dispatcher` applies them.
 * This keeps the fan-out computation independently testable without a
 * live cache. Dispatch is best-effort by design: one failed
 * invalidation never prevents the others, and never aborts the
 * triggering mutation.
 */

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// What an invalidation instruction targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationKind {
    /// All entries carrying a tag
    Tag,
    /// The single entry rendered at a literal path
    Path,
}

/// One cache invalidation instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invalidation {
    pub kind: InvalidationKind,
    pub value: String,
}

impl Invalidation {
    pub fn tag(value: impl Into<String>) -> Self {
        Self {
            kind: InvalidationKind::Tag,
            value: value.into(),
        }
    }

    pub fn path(value: impl Into<String>) -> Self {
        Self {
            kind: InvalidationKind::Path,
            value: value.into(),
        }
    }
}

struct CacheEntry {
    value: serde_json::Value,
    tags: HashSet<String>,
}

/// Tag-indexed cache for published reads and rendered routes
#[derive(Default)]
pub struct TagCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache key for a rendered route
    pub fn path_key(path: &str) -> String {
        format!("path:{}", path)
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.read().get(key).map(|entry| entry.value.clone())
    }

    /// Fetch and deserialize a cached value
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        serde_json::from_value(value).ok()
    }

    pub fn put(&self, key: impl Into<String>, value: serde_json::Value, tags: &[String]) {
        let entry = CacheEntry {
            value,
            tags: tags.iter().cloned().collect(),
        };
        self.write().insert(key.into(), entry);
    }

    /// Drop every entry carrying the tag; returns how many were removed
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.contains(tag));
        before - entries.len()
    }

    /// Drop the entry rendered at a literal path, if cached
    pub fn invalidate_path(&self, path: &str) -> usize {
        match self.write().remove(&Self::path_key(path)) {
            Some(_) => 1,
            None => 0,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Applies invalidation instructions to the cache
#[derive(Clone)]
pub struct Dispatcher {
    cache: Arc<TagCache>,
}

impl Dispatcher {
    pub fn new(cache: Arc<TagCache>) -> Self {
        Self { cache }
    }

    /// Apply every instruction, in order; returns the number of cache
    /// entries removed in total
    pub fn apply(&self, invalidations: &[Invalidation]) -> usize {
        let mut removed = 0;

        for invalidation in invalidations {
            let count = match invalidation.kind {
                InvalidationKind::Tag => self.cache.invalidate_tag(&invalidation.value),
                InvalidationKind::Path => self.cache.invalidate_path(&invalidation.value),
            };
            tracing::debug!(
                "Invalidated {:?} {} ({} entries)",
                invalidation.kind,
                invalidation.value,
                count
            );
            removed += count;
        }

        removed
    }
}
