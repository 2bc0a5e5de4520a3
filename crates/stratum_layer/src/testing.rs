// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock layer and recording inspector for testing.
//!
//! [`MockLayer`] implements both [`Layer`] and [`AsyncLayer`] over in-memory maps,
//! records every callback the invoker makes and supports failure injection.
//! [`EventLog`] is an [`Inspector`] that keeps every event it sees.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{AsyncLayer, CacheMiss, Error, InspectEvent, Inspector, KeyNotFound, Layer, Lookup, Outcome};

/// A recorded callback of a [`MockLayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerOp<K, V> {
    /// The identifier was resolved.
    Identifier,
    /// The key was resolved.
    Key,
    /// The local cache was probed with the given key.
    Get(K),
    /// An event was reported.
    Inspect(Outcome<K>),
    /// The default was resolved.
    Default,
    /// The source was consulted for the given key.
    Source(K),
    /// A value was written back to the local cache.
    Set {
        /// The key that was written.
        key: K,
        /// The value that was written.
        value: V,
    },
}

/// Creates a local-cache probe, for exercising [`LocalCache`](crate::LocalCache)
/// implementations directly.
///
/// Outside of tests the invoker is the only place probes come from.
#[must_use]
pub fn cache_miss() -> CacheMiss {
    CacheMiss::new()
}

type FailPredicate<K, V> = Box<dyn Fn(&LayerOp<K, V>) -> bool + Send + Sync>;

/// A configurable mock layer for testing.
///
/// The layer answers local lookups from one map and source requests from another,
/// and returns [`KeyNotFound`] as its default. Clones share all state, so a test can
/// keep a handle for assertions while the invoker drives another.
///
/// # Examples
///
/// ```
/// use stratum_layer::testing::{LayerOp, MockLayer};
/// use stratum_layer::{Lookup, Outcome, invoke};
///
/// let layer = MockLayer::new("numbers", 1).with_source(1, "one");
///
/// assert_eq!(invoke(&layer).unwrap(), Lookup::Found("one"));
/// assert_eq!(
///     layer.operations(),
///     vec![
///         LayerOp::Identifier,
///         LayerOp::Key,
///         LayerOp::Get(1),
///         LayerOp::Inspect(Outcome::Miss(1)),
///         LayerOp::Default,
///         LayerOp::Source(1),
///         LayerOp::Set { key: 1, value: "one" },
///     ]
/// );
/// ```
///
/// # Failure Injection
///
/// ```
/// use stratum_layer::testing::{LayerOp, MockLayer};
/// use stratum_layer::invoke;
///
/// let layer = MockLayer::new("numbers", 1).with_source(1, "one");
/// layer.fail_when(|op| matches!(op, LayerOp::Source(_)));
///
/// assert!(invoke(&layer).is_err());
/// assert!(!layer.local_contains(&1));
/// ```
pub struct MockLayer<K, V> {
    identifier: &'static str,
    key: K,
    local: Arc<Mutex<HashMap<K, V>>>,
    source: Arc<Mutex<HashMap<K, V>>>,
    operations: Arc<Mutex<Vec<LayerOp<K, V>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<K, V>>>>,
}

impl<K, V> Debug for MockLayer<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLayer")
            .field("identifier", &self.identifier)
            .field("key", &self.key)
            .field("local", &self.local)
            .field("source", &self.source)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl<K: Clone, V> Clone for MockLayer<K, V> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier,
            key: self.key.clone(),
            local: Arc::clone(&self.local),
            source: Arc::clone(&self.source),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<K, V> MockLayer<K, V> {
    /// Creates a layer with empty local and source maps that resolves to `key`.
    #[must_use]
    pub fn new(identifier: &'static str, key: K) -> Self {
        Self {
            identifier,
            key,
            local: Arc::new(Mutex::new(HashMap::new())),
            source: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns a handle that shares all state with this one but resolves to `key`.
    #[must_use]
    pub fn for_key(&self, key: K) -> Self {
        Self {
            identifier: self.identifier,
            key,
            local: Arc::clone(&self.local),
            source: Arc::clone(&self.source),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }

    /// Sets a predicate that determines which callbacks fail.
    ///
    /// A failing callback is still recorded, then returns an error without touching
    /// either map.
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&LayerOp<K, V>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all callbacks to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Clears all recorded callbacks.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Returns the number of entries in the local map.
    #[must_use]
    pub fn local_len(&self) -> usize {
        self.local.lock().len()
    }

    fn check(&self, op: LayerOp<K, V>) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);
        if fail {
            return Err(Error::from_message("mock: callback failed"));
        }
        Ok(())
    }
}

impl<K, V> MockLayer<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Pre-populates the local map.
    #[must_use]
    pub fn with_local(self, key: K, value: V) -> Self {
        self.local.lock().insert(key, value);
        self
    }

    /// Pre-populates the source map.
    #[must_use]
    pub fn with_source(self, key: K, value: V) -> Self {
        self.source.lock().insert(key, value);
        self
    }

    /// Returns `true` if the local map holds the key.
    #[must_use]
    pub fn local_contains(&self, key: &K) -> bool {
        self.local.lock().contains_key(key)
    }

    /// Returns the value the local map holds for the key.
    #[must_use]
    pub fn local_value(&self, key: &K) -> Option<V> {
        self.local.lock().get(key).cloned()
    }

    /// Returns a clone of all recorded callbacks, in call order.
    #[must_use]
    pub fn operations(&self) -> Vec<LayerOp<K, V>> {
        self.operations.lock().clone()
    }

    fn resolve_identifier(&self) -> Result<&'static str, Error> {
        self.check(LayerOp::Identifier)?;
        Ok(self.identifier)
    }

    fn resolve_key(&self) -> Result<K, Error> {
        self.check(LayerOp::Key)?;
        Ok(self.key.clone())
    }

    fn probe(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        self.check(LayerOp::Get(key.clone()))?;
        Ok(Lookup::from_option(self.local.lock().get(key).cloned(), miss))
    }

    fn write_back(&self, key: &K, value: &V) -> Result<(), Error> {
        self.check(LayerOp::Set {
            key: key.clone(),
            value: value.clone(),
        })?;
        self.local.lock().insert(key.clone(), value.clone());
        Ok(())
    }

    fn delegate(&self, key: &K, default: KeyNotFound) -> Result<Lookup<V, KeyNotFound>, Error> {
        self.check(LayerOp::Source(key.clone()))?;
        Ok(Lookup::from_option(self.source.lock().get(key).cloned(), default))
    }

    fn resolve_default(&self) -> Result<KeyNotFound, Error> {
        self.check(LayerOp::Default)?;
        Ok(KeyNotFound)
    }

    fn report(&self, event: &InspectEvent<&'static str, K>) -> Result<(), Error> {
        self.check(LayerOp::Inspect(event.outcome().clone()))
    }
}

impl<K, V> Layer for MockLayer<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    type Identifier = &'static str;
    type Key = K;
    type Value = V;
    type Default = KeyNotFound;
    type Error = Error;

    fn identifier(&self) -> Result<&'static str, Error> {
        self.resolve_identifier()
    }

    fn cache_key(&self) -> Result<K, Error> {
        self.resolve_key()
    }

    fn get_cached(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        self.probe(key, miss)
    }

    fn set_cached(&self, key: &K, value: &V) -> Result<(), Error> {
        self.write_back(key, value)
    }

    fn on_miss(&self, key: &K, default: KeyNotFound) -> Result<Lookup<V, KeyNotFound>, Error> {
        self.delegate(key, default)
    }

    fn default_value(&self) -> Result<KeyNotFound, Error> {
        self.resolve_default()
    }

    fn inspect(&self, event: &InspectEvent<&'static str, K>) -> Result<(), Error> {
        self.report(event)
    }
}

impl<K, V> AsyncLayer for MockLayer<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    type Identifier = &'static str;
    type Key = K;
    type Value = V;
    type Default = KeyNotFound;
    type Error = Error;

    async fn identifier(&self) -> Result<&'static str, Error> {
        self.resolve_identifier()
    }

    async fn cache_key(&self) -> Result<K, Error> {
        self.resolve_key()
    }

    async fn get_cached(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        self.probe(key, miss)
    }

    async fn set_cached(&self, key: &K, value: &V) -> Result<(), Error> {
        self.write_back(key, value)
    }

    async fn on_miss(&self, key: &K, default: KeyNotFound) -> Result<Lookup<V, KeyNotFound>, Error> {
        self.delegate(key, default)
    }

    async fn default_value(&self) -> Result<KeyNotFound, Error> {
        self.resolve_default()
    }

    async fn inspect(&self, event: &InspectEvent<&'static str, K>) -> Result<(), Error> {
        self.report(event)
    }
}

/// An [`Inspector`] that records every event it observes.
///
/// Clones share the same log.
///
/// # Examples
///
/// ```
/// use stratum_layer::testing::EventLog;
/// use stratum_layer::{InspectEvent, Inspector};
///
/// let log = EventLog::new();
/// log.inspect(&InspectEvent::miss("files", "a"));
/// log.inspect(&InspectEvent::hit("files", "a"));
///
/// let events = log.events();
/// assert!(events[0].is_miss());
/// assert!(events[1].is_hit());
/// ```
pub struct EventLog<I, K> {
    events: Arc<Mutex<Vec<InspectEvent<I, K>>>>,
}

impl<I: Debug, K: Debug> Debug for EventLog<I, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog").field("events", &self.events).finish()
    }
}

impl<I, K> Clone for EventLog<I, K> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<I, K> Default for EventLog<I, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, K> EventLog<I, K> {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Removes and returns all recorded events.
    #[must_use]
    pub fn take(&self) -> Vec<InspectEvent<I, K>> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns `true` if no events were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl<I: Clone, K: Clone> EventLog<I, K> {
    /// Returns a clone of all recorded events, in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<InspectEvent<I, K>> {
        self.events.lock().clone()
    }
}

impl<I: Clone, K: Clone> Inspector<I, K> for EventLog<I, K> {
    fn inspect(&self, event: &InspectEvent<I, K>) {
        self.events.lock().push(event.clone());
    }
}
