// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Source collaborators.

use std::sync::Arc;

use crate::{Error, Lookup};

/// What a cache layer delegates to on a local miss.
///
/// A source is handed the key and the caller's default. It returns either a value or
/// `Lookup::NotFound(default)` with that same default. Another cache layer is a
/// source, which is how layers are stacked.
pub trait Source<K, V, D> {
    /// Fetches the value for a key.
    fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error>;
}

/// What a cache layer delegates to on a local miss, when fetching may suspend.
pub trait AsyncSource<K, V, D>: Send + Sync {
    /// Fetches the value for a key.
    fn fetch(&self, key: &K, default: D) -> impl Future<Output = Result<Lookup<V, D>, Error>> + Send;
}

impl<K, V, D, T> Source<K, V, D> for Arc<T>
where
    T: Source<K, V, D> + ?Sized,
{
    fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        <T as Source<K, V, D>>::fetch(self, key, default)
    }
}

impl<K, V, D, T> AsyncSource<K, V, D> for Arc<T>
where
    T: AsyncSource<K, V, D> + ?Sized,
{
    fn fetch(&self, key: &K, default: D) -> impl Future<Output = Result<Lookup<V, D>, Error>> + Send {
        <T as AsyncSource<K, V, D>>::fetch(self, key, default)
    }
}
