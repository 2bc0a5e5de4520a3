// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The composed cache layer.

use std::fmt::Debug;
use std::sync::Arc;

use stratum_layer::{AsyncLocalCache, AsyncSource, Error, Inspector, LocalCache, Lookup, Source, invoke, invoke_async};

use crate::builder::CacheLayerBuilder;
use crate::invocation::{Given, Invocation, Lazy, LazyAsync};

pub(crate) type IdentifierFn<I> = Arc<dyn Fn() -> I + Send + Sync>;

/// A single cache layer: a local cache in front of a source.
///
/// The identifier, local cache, source and inspector are fixed when the layer is
/// built. The key and the not-found default are supplied with each call. Every call
/// runs the layer protocol once:
///
/// - a local hit returns the stored value without consulting the source;
/// - a local miss delegates to the source, and a value it produces is written back;
/// - if the source has nothing, the caller's default is returned as
///   [`Lookup::NotFound`] and nothing is written;
/// - the inspector sees exactly one hit or miss event.
///
/// A `CacheLayer` is itself a [`Source`], so layers stack: make one layer the source
/// of the next, using [`SourceExt::map_source`](crate::SourceExt::map_source) when
/// keys or values differ between them.
///
/// # Examples
///
/// ```
/// use stratum::{CacheLayer, KeyNotFound, Lookup, MemorySource, MemoryStore};
///
/// let layer = CacheLayer::builder("raw_files")
///     .local(MemoryStore::<String, String>::new())
///     .source(MemorySource::from_iter([("a".to_string(), "alpha".to_string())]))
///     .build();
///
/// assert_eq!(layer.get("a".to_string(), KeyNotFound)?, Lookup::Found("alpha".to_string()));
/// assert_eq!(layer.get("c".to_string(), KeyNotFound)?, Lookup::NotFound(KeyNotFound));
/// # Ok::<(), stratum::Error>(())
/// ```
pub struct CacheLayer<I, L, S, N = ()> {
    identifier: IdentifierFn<I>,
    pub(crate) local: L,
    pub(crate) source: S,
    pub(crate) inspector: N,
}

impl<I, L: Debug, S: Debug, N: Debug> Debug for CacheLayer<I, L, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("local", &self.local)
            .field("source", &self.source)
            .field("inspector", &self.inspector)
            .finish_non_exhaustive()
    }
}

impl<I, L: Clone, S: Clone, N: Clone> Clone for CacheLayer<I, L, S, N> {
    fn clone(&self) -> Self {
        Self {
            identifier: Arc::clone(&self.identifier),
            local: self.local.clone(),
            source: self.source.clone(),
            inspector: self.inspector.clone(),
        }
    }
}

impl<I> CacheLayer<I, (), (), ()> {
    /// Starts building a layer that reports itself as `identifier`.
    ///
    /// The identifier is cloned for every event. Use
    /// [`CacheLayerBuilder::identifier_with`] to compute it on each call instead.
    pub fn builder(identifier: I) -> CacheLayerBuilder<I, (), (), ()>
    where
        I: Clone + Send + Sync + 'static,
    {
        CacheLayerBuilder::new(Arc::new(move || identifier.clone()))
    }
}

impl<I, L, S, N> CacheLayer<I, L, S, N> {
    pub(crate) fn from_parts(identifier: IdentifierFn<I>, local: L, source: S, inspector: N) -> Self {
        Self {
            identifier,
            local,
            source,
            inspector,
        }
    }

    /// Resolves the identifier this layer reports in its events.
    #[must_use]
    pub fn identifier(&self) -> I {
        (self.identifier)()
    }

    /// Returns the local cache.
    #[must_use]
    pub fn local(&self) -> &L {
        &self.local
    }

    /// Returns the source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the inspector.
    #[must_use]
    pub fn inspector(&self) -> &N {
        &self.inspector
    }

    /// Looks up `key`, delegating to the source on a local miss.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the local cache or the source. A value the
    /// source produced is lost if writing it back fails.
    pub fn get<K, V, D>(&self, key: K, default: D) -> Result<Lookup<V, D>, Error>
    where
        L: LocalCache<K, V>,
        S: Source<K, V, D>,
        N: Inspector<I, K>,
    {
        invoke(&Invocation::new(self, Given::new(key), Given::new(default)))
    }

    /// Like [`get`](Self::get), with the key and default computed by callbacks.
    ///
    /// `key_fn` runs before the local lookup; `default_fn` runs only on a local miss.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a callback, the local cache or the source.
    pub fn get_with<K, V, D, FK, FD>(&self, key_fn: FK, default_fn: FD) -> Result<Lookup<V, D>, Error>
    where
        FK: Fn() -> Result<K, Error>,
        FD: Fn() -> Result<D, Error>,
        L: LocalCache<K, V>,
        S: Source<K, V, D>,
        N: Inspector<I, K>,
    {
        invoke(&Invocation::new(self, Lazy(key_fn), Lazy(default_fn)))
    }

    /// Looks up `key` with an asynchronous local cache and source.
    ///
    /// Performs the same steps as [`get`](Self::get), awaiting each one.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the local cache or the source.
    pub async fn get_async<K, V, D>(&self, key: K, default: D) -> Result<Lookup<V, D>, Error>
    where
        I: Send + Sync,
        K: Send + Sync,
        V: Send + Sync,
        D: Send,
        L: AsyncLocalCache<K, V>,
        S: AsyncSource<K, V, D>,
        N: Inspector<I, K> + Send + Sync,
    {
        invoke_async(&Invocation::new(self, Given::new(key), Given::new(default))).await
    }

    /// Like [`get_async`](Self::get_async), with the key and default computed by
    /// async callbacks.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a callback, the local cache or the source.
    pub async fn get_async_with<K, V, D, FK, FD, KFut, DFut>(&self, key_fn: FK, default_fn: FD) -> Result<Lookup<V, D>, Error>
    where
        I: Send + Sync,
        K: Send + Sync,
        V: Send + Sync,
        D: Send,
        FK: Fn() -> KFut + Send + Sync,
        KFut: Future<Output = Result<K, Error>> + Send,
        FD: Fn() -> DFut + Send + Sync,
        DFut: Future<Output = Result<D, Error>> + Send,
        L: AsyncLocalCache<K, V>,
        S: AsyncSource<K, V, D>,
        N: Inspector<I, K> + Send + Sync,
    {
        invoke_async(&Invocation::new(self, LazyAsync(key_fn), LazyAsync(default_fn))).await
    }
}

impl<I, K, V, D, L, S, N> Source<K, V, D> for CacheLayer<I, L, S, N>
where
    K: Clone,
    L: LocalCache<K, V>,
    S: Source<K, V, D>,
    N: Inspector<I, K>,
{
    fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        self.get(key.clone(), default)
    }
}

impl<I, K, V, D, L, S, N> AsyncSource<K, V, D> for CacheLayer<I, L, S, N>
where
    I: Send + Sync,
    K: Clone + Send + Sync,
    V: Send + Sync,
    D: Send,
    L: AsyncLocalCache<K, V>,
    S: AsyncSource<K, V, D>,
    N: Inspector<I, K> + Send + Sync,
{
    async fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        self.get_async(key.clone(), default).await
    }
}
