// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for [`CacheLayer`].

use std::fmt::Debug;
#[cfg(feature = "memory")]
use std::hash::Hash;
use std::sync::Arc;

#[cfg(feature = "memory")]
use stratum_memory::MemoryStore;

use crate::CacheLayer;
use crate::layer::IdentifierFn;
#[cfg(any(feature = "logs", feature = "metrics", test))]
use crate::telemetry::{LayerTelemetry, TelemetryConfig};

/// Builder for a [`CacheLayer`].
///
/// Created by [`CacheLayer::builder`]. A local cache and a source must be set before
/// the layer can be used; the inspector defaults to `()`, which ignores events.
///
/// # Examples
///
/// ```
/// use stratum::{CacheLayer, KeyNotFound, MemorySource};
///
/// let layer = CacheLayer::builder("users")
///     .memory::<u64, String>()
///     .source(MemorySource::<u64, String>::new())
///     .build();
///
/// assert!(layer.get(42, KeyNotFound)?.is_not_found());
/// # Ok::<(), stratum::Error>(())
/// ```
pub struct CacheLayerBuilder<I, L = (), S = (), N = ()> {
    identifier: IdentifierFn<I>,
    local: L,
    source: S,
    inspector: N,
}

impl<I, L: Debug, S: Debug, N: Debug> Debug for CacheLayerBuilder<I, L, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayerBuilder")
            .field("local", &self.local)
            .field("source", &self.source)
            .field("inspector", &self.inspector)
            .finish_non_exhaustive()
    }
}

impl<I> CacheLayerBuilder<I> {
    pub(crate) fn new(identifier: IdentifierFn<I>) -> Self {
        Self {
            identifier,
            local: (),
            source: (),
            inspector: (),
        }
    }
}

impl<I, S, N> CacheLayerBuilder<I, (), S, N> {
    /// Sets the local cache consulted before the source.
    pub fn local<L>(self, local: L) -> CacheLayerBuilder<I, L, S, N> {
        CacheLayerBuilder {
            identifier: self.identifier,
            local,
            source: self.source,
            inspector: self.inspector,
        }
    }

    /// Uses a new unbounded [`MemoryStore`] as the local cache.
    #[cfg(feature = "memory")]
    #[must_use]
    pub fn memory<K, V>(self) -> CacheLayerBuilder<I, MemoryStore<K, V>, S, N>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        self.local(MemoryStore::new())
    }
}

impl<I, L, N> CacheLayerBuilder<I, L, (), N> {
    /// Sets the source consulted on a local miss.
    ///
    /// Another [`CacheLayer`] is a valid source, which is how layers stack.
    pub fn source<S>(self, source: S) -> CacheLayerBuilder<I, L, S, N> {
        CacheLayerBuilder {
            identifier: self.identifier,
            local: self.local,
            source,
            inspector: self.inspector,
        }
    }
}

impl<I, L, S, N> CacheLayerBuilder<I, L, S, N> {
    /// Computes the identifier on every call instead of cloning a fixed value.
    #[must_use]
    pub fn identifier_with<F>(self, identifier: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
    {
        Self {
            identifier: Arc::new(identifier),
            ..self
        }
    }

    /// Sets the inspector that observes every hit and miss event.
    ///
    /// Replaces any previously set inspector; combine several with a tuple.
    pub fn inspector<M>(self, inspector: M) -> CacheLayerBuilder<I, L, S, M> {
        CacheLayerBuilder {
            identifier: self.identifier,
            local: self.local,
            source: self.source,
            inspector,
        }
    }

    /// Adds logs and metrics for this layer's events next to the current inspector.
    #[cfg(any(feature = "logs", feature = "metrics", test))]
    #[must_use]
    pub fn telemetry(self, config: TelemetryConfig) -> CacheLayerBuilder<I, L, S, (N, LayerTelemetry)> {
        CacheLayerBuilder {
            identifier: self.identifier,
            local: self.local,
            source: self.source,
            inspector: (self.inspector, config.build()),
        }
    }

    /// Builds the layer.
    #[must_use]
    pub fn build(self) -> CacheLayer<I, L, S, N> {
        CacheLayer::from_parts(self.identifier, self.local, self.source, self.inspector)
    }
}
