// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Running synchronous collaborators inside asynchronous layers.

#[cfg(feature = "tokio")]
use std::sync::Arc;

use stratum_layer::{AsyncLocalCache, AsyncSource, CacheMiss, Error, LocalCache, Lookup, Source};

/// Runs a synchronous local cache or source inline, on the calling task.
///
/// Suitable for collaborators that never block for long, such as an in-process map.
/// Use [`Offload`] for anything that touches the disk or the network.
///
/// # Examples
///
/// ```
/// use stratum::{AsyncSource, Blocking, KeyNotFound, Lookup, source_fn};
///
/// let source = Blocking::new(source_fn(|key: &u32| Ok(Some(key * 2))));
///
/// # futures::executor::block_on(async {
/// assert_eq!(AsyncSource::fetch(&source, &21, KeyNotFound).await?, Lookup::Found(42));
/// # Ok::<(), stratum::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Blocking<T>(T);

impl<T> Blocking<T> {
    /// Wraps a synchronous collaborator.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the wrapped collaborator.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.0
    }

    /// Unwraps the collaborator.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<K, V, T> AsyncLocalCache<K, V> for Blocking<T>
where
    K: Sync,
    V: Send + Sync,
    T: LocalCache<K, V> + Send + Sync,
{
    async fn lookup(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        LocalCache::lookup(&self.0, key, miss)
    }

    async fn store(&self, key: &K, value: &V) -> Result<(), Error> {
        LocalCache::store(&self.0, key, value)
    }
}

impl<K, V, D, T> AsyncSource<K, V, D> for Blocking<T>
where
    K: Sync,
    V: Send,
    D: Send,
    T: Source<K, V, D> + Send + Sync,
{
    async fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        Source::fetch(&self.0, key, default)
    }
}

/// Runs a synchronous local cache or source on the Tokio blocking thread pool.
///
/// Keys and values are cloned into the blocking task. A task that panics or is
/// cancelled surfaces as an [`Error`].
///
/// # Examples
///
/// ```
/// use stratum::{AsyncSource, KeyNotFound, Lookup, Offload, source_fn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), stratum::Error> {
/// let source = Offload::new(source_fn(|path: &String| Ok(Some(path.len()))));
///
/// assert_eq!(AsyncSource::fetch(&source, &"a.txt".to_string(), KeyNotFound).await?, Lookup::Found(5));
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "tokio")]
#[derive(Debug)]
pub struct Offload<T>(Arc<T>);

#[cfg(feature = "tokio")]
impl<T> Clone for Offload<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

#[cfg(feature = "tokio")]
impl<T> Offload<T> {
    /// Wraps a synchronous collaborator.
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self(Arc::new(inner))
    }

    /// Returns the wrapped collaborator.
    #[must_use]
    pub fn inner(&self) -> &T {
        &self.0
    }

    async fn run<R, F>(&self, work: F) -> Result<R, Error>
    where
        T: Send + Sync + 'static,
        R: Send + 'static,
        F: FnOnce(&T) -> Result<R, Error> + Send + 'static,
    {
        let inner = Arc::clone(&self.0);
        tokio::task::spawn_blocking(move || work(&inner))
            .await
            .map_err(Error::from_message)?
    }
}

#[cfg(feature = "tokio")]
impl<K, V, T> AsyncLocalCache<K, V> for Offload<T>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    T: LocalCache<K, V> + Send + Sync + 'static,
{
    async fn lookup(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        let key = key.clone();
        self.run(move |inner| LocalCache::lookup(inner, &key, miss)).await
    }

    async fn store(&self, key: &K, value: &V) -> Result<(), Error> {
        let (key, value) = (key.clone(), value.clone());
        self.run(move |inner| LocalCache::store(inner, &key, &value)).await
    }
}

#[cfg(feature = "tokio")]
impl<K, V, D, T> AsyncSource<K, V, D> for Offload<T>
where
    K: Clone + Send + Sync + 'static,
    V: Send + 'static,
    D: Send + 'static,
    T: Source<K, V, D> + Send + Sync + 'static,
{
    async fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        let key = key.clone();
        self.run(move |inner| Source::fetch(inner, &key, default)).await
    }
}
