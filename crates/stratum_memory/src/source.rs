// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A fixed bucket of values acting as a source.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use foldhash::fast::RandomState;
use parking_lot::RwLock;
use stratum_layer::{AsyncSource, Error, Lookup, Source};

/// An in-memory source backed by a map.
///
/// Works with any default type: a key in the map yields `Found(value)`, any other key
/// hands the caller's default back as `NotFound`. Every fetch is counted, which makes
/// the source convenient for checking that a layer only delegates on a miss.
///
/// Clones share the same entries and counter.
///
/// # Examples
///
/// ```
/// use stratum_layer::{KeyNotFound, Lookup, Source};
/// use stratum_memory::MemorySource;
///
/// let bucket: MemorySource<&str, &str> = [("a", "alpha")].into_iter().collect();
///
/// assert_eq!(Source::fetch(&bucket, &"a", KeyNotFound)?, Lookup::Found("alpha"));
/// assert_eq!(Source::fetch(&bucket, &"c", KeyNotFound)?, Lookup::NotFound(KeyNotFound));
/// assert_eq!(bucket.fetch_count(), 2);
/// # Ok::<(), stratum_layer::Error>(())
/// ```
pub struct MemorySource<K, V> {
    entries: Arc<RwLock<HashMap<K, V, RandomState>>>,
    fetches: Arc<AtomicU64>,
}

impl<K, V> Clone for MemorySource<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            fetches: Arc::clone(&self.fetches),
        }
    }
}

impl<K: Debug, V: Debug> Debug for MemorySource<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySource")
            .field("entries", &*self.entries.read())
            .field("fetches", &self.fetches.load(Ordering::Relaxed))
            .finish()
    }
}

impl<K, V> Default for MemorySource<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemorySource<K, V> {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::with_hasher(RandomState::default()))),
            fetches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns how many times the source was fetched from.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the source has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K: Hash + Eq, V: Clone> MemorySource<K, V> {
    /// Adds or replaces an entry, returning the previous value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.entries.write().insert(key, value)
    }

    /// Removes an entry, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().remove(key)
    }

    fn lookup<D>(&self, key: &K, default: D) -> Lookup<V, D> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Lookup::from_option(self.entries.read().get(key).cloned(), default)
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for MemorySource<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let source = Self::new();
        source.entries.write().extend(iter);
        source
    }
}

impl<K, V, D> Source<K, V, D> for MemorySource<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        Ok(self.lookup(key, default))
    }
}

impl<K, V, D> AsyncSource<K, V, D> for MemorySource<K, V>
where
    K: Hash + Eq + Send + Sync,
    V: Clone + Send + Sync,
    D: Send,
{
    async fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        Ok(self.lookup(key, default))
    }
}
