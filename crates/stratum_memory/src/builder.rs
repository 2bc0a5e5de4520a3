// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory stores.

use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

use crate::store::MemoryStore;

/// Builder for configuring a [`MemoryStore`].
///
/// The defaults give an unbounded store with no expiration, which behaves like a
/// plain concurrent map.
///
/// # Examples
///
/// ```
/// use stratum_memory::MemoryStore;
/// use std::time::Duration;
///
/// let store = MemoryStore::<String, String>::builder()
///     .max_capacity(1000)
///     .time_to_live(Duration::from_secs(300))
///     .initial_capacity(100)
///     .name("parsed-files")
///     .build();
/// ```
#[derive(Debug)]
pub struct MemoryStoreBuilder<K, V> {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) time_to_live: Option<Duration>,
    pub(crate) time_to_idle: Option<Duration>,
    pub(crate) name: Option<String>,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> Default for MemoryStoreBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemoryStoreBuilder<K, V> {
    /// Creates a builder for an unbounded store without expiration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_capacity: None,
            initial_capacity: None,
            time_to_live: None,
            time_to_idle: None,
            name: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the maximum number of entries.
    ///
    /// Once the capacity is reached, entries are evicted with the `TinyLFU` policy. A
    /// bounded store may also decline to admit a written value, in which case the next
    /// invocation for that key is simply another miss.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the pre-allocation hint.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Expires entries this long after they were written.
    #[must_use]
    pub fn time_to_live(mut self, duration: Duration) -> Self {
        self.time_to_live = Some(duration);
        self
    }

    /// Expires entries this long after they were last read or written.
    #[must_use]
    pub fn time_to_idle(mut self, duration: Duration) -> Self {
        self.time_to_idle = Some(duration);
        self
    }

    /// Names the store for debugging output.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured store.
    #[must_use]
    pub fn build(self) -> MemoryStore<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        MemoryStore::from_builder(&self)
    }
}
