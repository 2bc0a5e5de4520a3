// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-call adapter between a [`CacheLayer`] and the core invoker.
//!
//! A [`CacheLayer`] bakes in the identifier, the local cache, the source and the
//! inspector. The key and the default arrive with each call. [`Invocation`] pairs the
//! two and implements [`Layer`] and [`AsyncLayer`], so both variants run the exact
//! same protocol.

use std::fmt::Debug;
use std::marker::PhantomData;

use parking_lot::Mutex;
use stratum_layer::{
    AsyncLayer, AsyncLocalCache, AsyncSource, CacheMiss, Error, InspectEvent, Inspector, Layer, LocalCache, Lookup, Source,
};

use crate::CacheLayer;

/// Produces a per-call value: the key or the default.
pub(crate) trait Resolve {
    type Output;

    fn resolve(&self) -> Result<Self::Output, Error>;
}

/// Produces a per-call value, possibly suspending.
pub(crate) trait AsyncResolve: Send + Sync {
    type Output;

    fn resolve(&self) -> impl Future<Output = Result<Self::Output, Error>> + Send;
}

/// A value supplied up front and handed out once.
pub(crate) struct Given<T>(Mutex<Option<T>>);

impl<T> Given<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(Mutex::new(Some(value)))
    }

    fn take(&self) -> Result<T, Error> {
        self.0
            .lock()
            .take()
            .ok_or_else(|| Error::from_message("per-call value was already consumed"))
    }
}

impl<T> Resolve for Given<T> {
    type Output = T;

    fn resolve(&self) -> Result<T, Error> {
        self.take()
    }
}

impl<T: Send> AsyncResolve for Given<T> {
    type Output = T;

    async fn resolve(&self) -> Result<T, Error> {
        self.take()
    }
}

/// A value computed by a callback when the invoker asks for it.
pub(crate) struct Lazy<F>(pub(crate) F);

impl<T, F> Resolve for Lazy<F>
where
    F: Fn() -> Result<T, Error>,
{
    type Output = T;

    fn resolve(&self) -> Result<T, Error> {
        (self.0)()
    }
}

/// A value computed by an async callback when the invoker asks for it.
pub(crate) struct LazyAsync<F>(pub(crate) F);

impl<T, F, Fut> AsyncResolve for LazyAsync<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, Error>> + Send,
{
    type Output = T;

    fn resolve(&self) -> impl Future<Output = Result<T, Error>> + Send {
        (self.0)()
    }
}

/// One call of a [`CacheLayer`].
pub(crate) struct Invocation<'a, I, L, S, N, KR, DR, V> {
    layer: &'a CacheLayer<I, L, S, N>,
    key: KR,
    default: DR,
    _value: PhantomData<fn() -> V>,
}

impl<'a, I, L, S, N, KR, DR, V> Invocation<'a, I, L, S, N, KR, DR, V> {
    pub(crate) fn new(layer: &'a CacheLayer<I, L, S, N>, key: KR, default: DR) -> Self {
        Self {
            layer,
            key,
            default,
            _value: PhantomData,
        }
    }
}

impl<I, L, S, N, KR, DR, V> Debug for Invocation<'_, I, L, S, N, KR, DR, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation").finish_non_exhaustive()
    }
}

impl<I, K, V, D, L, S, N, KR, DR> Layer for Invocation<'_, I, L, S, N, KR, DR, V>
where
    KR: Resolve<Output = K>,
    DR: Resolve<Output = D>,
    L: LocalCache<K, V>,
    S: Source<K, V, D>,
    N: Inspector<I, K>,
{
    type Identifier = I;
    type Key = K;
    type Value = V;
    type Default = D;
    type Error = Error;

    fn identifier(&self) -> Result<I, Error> {
        Ok(self.layer.identifier())
    }

    fn cache_key(&self) -> Result<K, Error> {
        self.key.resolve()
    }

    fn get_cached(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        LocalCache::lookup(&self.layer.local, key, miss)
    }

    fn set_cached(&self, key: &K, value: &V) -> Result<(), Error> {
        LocalCache::store(&self.layer.local, key, value)
    }

    fn on_miss(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        Source::fetch(&self.layer.source, key, default)
    }

    fn default_value(&self) -> Result<D, Error> {
        self.default.resolve()
    }

    fn inspect(&self, event: &InspectEvent<I, K>) -> Result<(), Error> {
        self.layer.inspector.inspect(event);
        Ok(())
    }
}

impl<I, K, V, D, L, S, N, KR, DR> AsyncLayer for Invocation<'_, I, L, S, N, KR, DR, V>
where
    I: Send + Sync,
    K: Send + Sync,
    V: Send + Sync,
    D: Send,
    KR: AsyncResolve<Output = K>,
    DR: AsyncResolve<Output = D>,
    L: AsyncLocalCache<K, V>,
    S: AsyncSource<K, V, D>,
    N: Inspector<I, K> + Send + Sync,
{
    type Identifier = I;
    type Key = K;
    type Value = V;
    type Default = D;
    type Error = Error;

    async fn identifier(&self) -> Result<I, Error> {
        Ok(self.layer.identifier())
    }

    fn cache_key(&self) -> impl Future<Output = Result<K, Error>> + Send {
        self.key.resolve()
    }

    fn get_cached(&self, key: &K, miss: CacheMiss) -> impl Future<Output = Result<Lookup<V, CacheMiss>, Error>> + Send {
        AsyncLocalCache::lookup(&self.layer.local, key, miss)
    }

    fn set_cached(&self, key: &K, value: &V) -> impl Future<Output = Result<(), Error>> + Send {
        AsyncLocalCache::store(&self.layer.local, key, value)
    }

    fn on_miss(&self, key: &K, default: D) -> impl Future<Output = Result<Lookup<V, D>, Error>> + Send {
        AsyncSource::fetch(&self.layer.source, key, default)
    }

    fn default_value(&self) -> impl Future<Output = Result<D, Error>> + Send {
        self.default.resolve()
    }

    async fn inspect(&self, event: &InspectEvent<I, K>) -> Result<(), Error> {
        self.layer.inspector.inspect(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_is_handed_out_once() {
        let given = Given::new(5);
        assert_eq!(Resolve::resolve(&given).expect("first resolve succeeds"), 5);
        assert!(Resolve::resolve(&given).is_err());
    }

    #[test]
    fn lazy_calls_the_closure_each_time() {
        let lazy = Lazy(|| Ok::<_, Error>("key"));
        assert_eq!(lazy.resolve().expect("resolve succeeds"), "key");
        assert_eq!(lazy.resolve().expect("resolve succeeds"), "key");
    }

    #[test]
    fn lazy_async_awaits_the_closure() {
        let lazy = LazyAsync(|| async { Ok::<_, Error>(7) });
        let value = futures::executor::block_on(lazy.resolve()).expect("resolve succeeds");
        assert_eq!(value, 7);
    }

    #[test]
    fn given_resolves_asynchronously() {
        let given = Given::new("default");
        let value = futures::executor::block_on(AsyncResolve::resolve(&given)).expect("resolve succeeds");
        assert_eq!(value, "default");
    }
}
