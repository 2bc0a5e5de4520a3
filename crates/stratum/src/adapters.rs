// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Closure-backed local caches and sources.
//!
//! These let any existing storage or loader take part in a layer without a dedicated
//! type: a map behind a lock, a file reader, an HTTP client.

use std::fmt::Debug;
use std::marker::PhantomData;

use stratum_layer::{AsyncSource, CacheMiss, Error, LocalCache, Lookup, Source};

/// A [`LocalCache`] backed by a getter and a setter. Created with [`local_fn`].
pub struct LocalFn<G, S, K, V> {
    get: G,
    set: S,
    _types: PhantomData<fn(&K) -> V>,
}

impl<G, S, K, V> Debug for LocalFn<G, S, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFn").finish_non_exhaustive()
    }
}

impl<G: Clone, S: Clone, K, V> Clone for LocalFn<G, S, K, V> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
            _types: PhantomData,
        }
    }
}

/// Builds a local cache from a getter and a setter.
///
/// The getter returns `None` when the key is absent.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::{Arc, Mutex};
///
/// use stratum::local_fn;
///
/// let map = Arc::new(Mutex::new(HashMap::<String, String>::new()));
/// let (reader, writer) = (Arc::clone(&map), Arc::clone(&map));
/// let local = local_fn(
///     move |key: &String| Ok(reader.lock().unwrap().get(key).cloned()),
///     move |key: &String, value: &String| {
///         writer.lock().unwrap().insert(key.clone(), value.clone());
///         Ok(())
///     },
/// );
/// # let _ = local;
/// ```
pub fn local_fn<G, S, K, V>(get: G, set: S) -> LocalFn<G, S, K, V>
where
    G: Fn(&K) -> Result<Option<V>, Error>,
    S: Fn(&K, &V) -> Result<(), Error>,
{
    LocalFn {
        get,
        set,
        _types: PhantomData,
    }
}

impl<G, S, K, V> LocalCache<K, V> for LocalFn<G, S, K, V>
where
    G: Fn(&K) -> Result<Option<V>, Error>,
    S: Fn(&K, &V) -> Result<(), Error>,
{
    fn lookup(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        Ok(Lookup::from_option((self.get)(key)?, miss))
    }

    fn store(&self, key: &K, value: &V) -> Result<(), Error> {
        (self.set)(key, value)
    }
}

/// A [`Source`] backed by a loader closure. Created with [`source_fn`].
pub struct SourceFn<F, K, V> {
    fetch: F,
    _types: PhantomData<fn(&K) -> V>,
}

impl<F, K, V> Debug for SourceFn<F, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFn").finish_non_exhaustive()
    }
}

impl<F: Clone, K, V> Clone for SourceFn<F, K, V> {
    fn clone(&self) -> Self {
        Self {
            fetch: self.fetch.clone(),
            _types: PhantomData,
        }
    }
}

/// Builds a source from a loader.
///
/// The loader returns `None` when it has no value; the source then hands the caller's
/// default back, whatever its type.
///
/// # Examples
///
/// ```
/// use stratum::{KeyNotFound, Lookup, Source, source_fn};
///
/// let squares = source_fn(|key: &u32| Ok((*key < 10).then(|| key * key)));
///
/// assert_eq!(Source::fetch(&squares, &3, KeyNotFound)?, Lookup::Found(9));
/// assert_eq!(Source::fetch(&squares, &30, KeyNotFound)?, Lookup::NotFound(KeyNotFound));
/// # Ok::<(), stratum::Error>(())
/// ```
pub fn source_fn<F, K, V>(fetch: F) -> SourceFn<F, K, V>
where
    F: Fn(&K) -> Result<Option<V>, Error>,
{
    SourceFn {
        fetch,
        _types: PhantomData,
    }
}

impl<F, K, V, D> Source<K, V, D> for SourceFn<F, K, V>
where
    F: Fn(&K) -> Result<Option<V>, Error>,
{
    fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        Ok(Lookup::from_option((self.fetch)(key)?, default))
    }
}

/// An [`AsyncSource`] backed by an async loader. Created with [`async_source_fn`].
pub struct AsyncSourceFn<F, K, V> {
    fetch: F,
    _types: PhantomData<fn(K) -> V>,
}

impl<F, K, V> Debug for AsyncSourceFn<F, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncSourceFn").finish_non_exhaustive()
    }
}

impl<F: Clone, K, V> Clone for AsyncSourceFn<F, K, V> {
    fn clone(&self) -> Self {
        Self {
            fetch: self.fetch.clone(),
            _types: PhantomData,
        }
    }
}

/// Builds an async source from a loader that takes the key by value.
///
/// # Examples
///
/// ```
/// use stratum::{KeyNotFound, Lookup, AsyncSource, async_source_fn};
///
/// let greetings = async_source_fn(|name: String| async move { Ok(Some(format!("hello, {name}"))) });
///
/// # futures::executor::block_on(async {
/// let found = AsyncSource::fetch(&greetings, &"world".to_string(), KeyNotFound).await?;
/// assert_eq!(found, Lookup::Found("hello, world".to_string()));
/// # Ok::<(), stratum::Error>(())
/// # }).unwrap();
/// ```
pub fn async_source_fn<F, Fut, K, V>(fetch: F) -> AsyncSourceFn<F, K, V>
where
    F: Fn(K) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<V>, Error>> + Send,
{
    AsyncSourceFn {
        fetch,
        _types: PhantomData,
    }
}

impl<F, Fut, K, V, D> AsyncSource<K, V, D> for AsyncSourceFn<F, K, V>
where
    K: Clone + Sync,
    D: Send,
    F: Fn(K) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<V>, Error>> + Send,
{
    async fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        Ok(Lookup::from_option((self.fetch)(key.clone()).await?, default))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use stratum_layer::KeyNotFound;
    use stratum_layer::testing::cache_miss;

    use super::*;

    #[test]
    fn local_fn_maps_none_to_probe() {
        let writes = AtomicUsize::new(0);
        let local = local_fn(
            |key: &u32| Ok((*key == 1).then_some("one")),
            |_: &u32, _: &&str| {
                writes.fetch_add(1, Ordering::Relaxed);
                Ok(())
            },
        );

        assert_eq!(LocalCache::lookup(&local, &1, cache_miss()).expect("lookup succeeds").found(), Some("one"));
        assert!(LocalCache::lookup(&local, &2, cache_miss()).expect("lookup succeeds").is_not_found());

        LocalCache::store(&local, &2, &"two").expect("store succeeds");
        assert_eq!(writes.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn local_fn_propagates_getter_error() {
        let local = local_fn(
            |_: &u32| -> Result<Option<u32>, Error> { Err(Error::from_message("disk unavailable")) },
            |_: &u32, _: &u32| Ok(()),
        );

        assert!(LocalCache::lookup(&local, &1, cache_miss()).is_err());
    }

    #[test]
    fn source_fn_accepts_any_default() {
        let source = source_fn(|key: &&str| Ok(key.strip_prefix("x-").map(str::to_owned)));

        assert_eq!(Source::fetch(&source, &"x-a", KeyNotFound).expect("fetch succeeds"), Lookup::Found("a".to_owned()));
        assert_eq!(Source::fetch(&source, &"b", -1).expect("fetch succeeds"), Lookup::NotFound(-1));
    }

    #[test]
    fn async_source_fn_passes_owned_key() {
        let source = async_source_fn(|key: u64| async move { Ok((key % 2 == 0).then_some(key / 2)) });

        let even = futures::executor::block_on(AsyncSource::fetch(&source, &8, KeyNotFound)).expect("fetch succeeds");
        let odd = futures::executor::block_on(AsyncSource::fetch(&source, &7, KeyNotFound)).expect("fetch succeeds");

        assert_eq!(even, Lookup::Found(4));
        assert_eq!(odd, Lookup::NotFound(KeyNotFound));
    }
}
