// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory local store backed by moka.

use std::fmt::Debug;
use std::hash::Hash;

use foldhash::fast::RandomState;
use moka::sync::{Cache, CacheBuilder};
use stratum_layer::{AsyncLocalCache, CacheMiss, Error, LocalCache, Lookup};

use crate::builder::MemoryStoreBuilder;

/// A concurrent in-memory local cache.
///
/// Clones share the same entries, so one handle can back a layer while another is
/// used to inspect or seed it.
///
/// # Examples
///
/// ```
/// use stratum_memory::MemoryStore;
///
/// let store = MemoryStore::<String, i32>::new();
/// store.insert("key".to_string(), 42);
/// assert_eq!(store.get(&"key".to_string()), Some(42));
/// ```
pub struct MemoryStore<K, V> {
    inner: Cache<K, V, RandomState>,
}

impl<K, V> Clone for MemoryStore<K, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<K, V> Debug for MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("name", &self.inner.name())
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a store holding at most `max_capacity` entries.
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::builder().max_capacity(max_capacity).build()
    }

    /// Creates a builder for configuring a store.
    #[must_use]
    pub fn builder() -> MemoryStoreBuilder<K, V> {
        MemoryStoreBuilder::new()
    }

    pub(crate) fn from_builder(builder: &MemoryStoreBuilder<K, V>) -> Self {
        let mut moka_builder: CacheBuilder<K, V, Cache<K, V>> = CacheBuilder::default();

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(ttl) = builder.time_to_live {
            moka_builder = moka_builder.time_to_live(ttl);
        }

        if let Some(tti) = builder.time_to_idle {
            moka_builder = moka_builder.time_to_idle(tti);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build_with_hasher(RandomState::default()),
        }
    }

    /// Returns the configured name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    /// Returns a clone of the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    /// Stores a value, replacing any previous one.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    /// Removes and returns the value stored for `key`.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.remove(key)
    }

    /// Returns `true` if a value is stored for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the number of stored entries.
    ///
    /// Pending maintenance is applied first, so the count reflects every completed
    /// write and removal.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }
}

impl<K, V> LocalCache<K, V> for MemoryStore<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn lookup(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        Ok(Lookup::from_option(self.inner.get(key), miss))
    }

    fn store(&self, key: &K, value: &V) -> Result<(), Error> {
        self.inner.insert(key.clone(), value.clone());
        Ok(())
    }
}

impl<K, V> AsyncLocalCache<K, V> for MemoryStore<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn lookup(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        Ok(Lookup::from_option(self.inner.get(key), miss))
    }

    async fn store(&self, key: &K, value: &V) -> Result<(), Error> {
        self.inner.insert(key.clone(), value.clone());
        Ok(())
    }
}
