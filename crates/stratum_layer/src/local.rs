// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Local cache collaborators.

use std::sync::Arc;

use crate::{CacheMiss, Error, Lookup};

/// The local store of a cache layer.
///
/// A local cache answers a lookup with either the stored value or the [`CacheMiss`]
/// probe it was handed, and accepts values the source produced.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// use stratum_layer::{CacheMiss, Error, LocalCache, Lookup};
///
/// struct Local(Mutex<HashMap<String, String>>);
///
/// impl LocalCache<String, String> for Local {
///     fn lookup(&self, key: &String, miss: CacheMiss) -> Result<Lookup<String, CacheMiss>, Error> {
///         Ok(Lookup::from_option(self.0.lock().unwrap().get(key).cloned(), miss))
///     }
///
///     fn store(&self, key: &String, value: &String) -> Result<(), Error> {
///         self.0.lock().unwrap().insert(key.clone(), value.clone());
///         Ok(())
///     }
/// }
/// ```
pub trait LocalCache<K, V> {
    /// Looks up a key. Returns `Lookup::NotFound(miss)` if the key is absent.
    fn lookup(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error>;

    /// Stores a value produced by the source.
    fn store(&self, key: &K, value: &V) -> Result<(), Error>;
}

/// The local store of a cache layer whose operations may suspend.
pub trait AsyncLocalCache<K, V>: Send + Sync {
    /// Looks up a key. Resolves to `Lookup::NotFound(miss)` if the key is absent.
    fn lookup(&self, key: &K, miss: CacheMiss) -> impl Future<Output = Result<Lookup<V, CacheMiss>, Error>> + Send;

    /// Stores a value produced by the source.
    fn store(&self, key: &K, value: &V) -> impl Future<Output = Result<(), Error>> + Send;
}

impl<K, V, T> LocalCache<K, V> for Arc<T>
where
    T: LocalCache<K, V> + ?Sized,
{
    fn lookup(&self, key: &K, miss: CacheMiss) -> Result<Lookup<V, CacheMiss>, Error> {
        <T as LocalCache<K, V>>::lookup(self, key, miss)
    }

    fn store(&self, key: &K, value: &V) -> Result<(), Error> {
        <T as LocalCache<K, V>>::store(self, key, value)
    }
}

impl<K, V, T> AsyncLocalCache<K, V> for Arc<T>
where
    T: AsyncLocalCache<K, V> + ?Sized,
{
    fn lookup(&self, key: &K, miss: CacheMiss) -> impl Future<Output = Result<Lookup<V, CacheMiss>, Error>> + Send {
        <T as AsyncLocalCache<K, V>>::lookup(self, key, miss)
    }

    fn store(&self, key: &K, value: &V) -> impl Future<Output = Result<(), Error>> + Send {
        <T as AsyncLocalCache<K, V>>::store(self, key, value)
    }
}
