// imgcache/src/core/cache.rs
//! Path-keyed store of decoded media.
//!
//! Entries live until they are removed or the cache is cleared. There is no
//! capacity bound and no expiry. All access goes through one lock; values are
//! swapped whole, never mutated in place.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub struct MediaCache<V> {
    entries: RwLock<HashMap<String, Arc<V>>>,
}

impl<V> MediaCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.entries.read().get(key).cloned()
    }

    /// Inserts or overwrites, returning the previous value.
    pub fn put(&self, key: impl Into<String>, value: impl Into<Arc<V>>) -> Option<Arc<V>> {
        let key = key.into();
        log::debug!("Caching entry: {}", crate::utils::truncate(&key));
        self.entries.write().insert(key, value.into())
    }

    pub fn replace(&self, key: impl Into<String>, value: impl Into<Arc<V>>) -> Option<Arc<V>> {
        self.put(key, value)
    }

    pub fn remove(&self, key: &str) -> Option<Arc<V>> {
        self.entries.write().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        log::debug!("Clearing {} cached entries", entries.len());
        entries.clear();
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Copy of the whole table. Values stay shared with the cache.
    pub fn snapshot(&self) -> HashMap<String, Arc<V>> {
        self.entries.read().clone()
    }
}

impl<V: PartialEq> MediaCache<V> {
    /// Key of an entry whose value equals `value`.
    ///
    /// Linear scan. When several keys hold equal values, which one is returned
    /// is unspecified.
    pub fn reverse_lookup(&self, value: &V) -> Option<String> {
        self.entries
            .read()
            .iter()
            .find(|(_, stored)| stored.as_ref() == value)
            .map(|(key, _)| key.clone())
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.entries
            .read()
            .values()
            .any(|stored| stored.as_ref() == value)
    }

    /// Removes one entry whose value equals `value`. Same tie-break caveat as
    /// [`MediaCache::reverse_lookup`].
    pub fn remove_by_value(&self, value: &V) -> Option<Arc<V>> {
        let mut entries = self.entries.write();
        let key = entries
            .iter()
            .find(|(_, stored)| stored.as_ref() == value)
            .map(|(key, _)| key.clone())?;
        entries.remove(&key)
    }
}

impl<V> Default for MediaCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for MediaCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCache")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
