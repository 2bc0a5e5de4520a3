// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key and value mapping between stacked layers.

use std::fmt::Debug;
use std::marker::PhantomData;

use stratum_layer::{AsyncSource, Error, Lookup, Source};

/// A source seen through a key reduction and a value transformation.
///
/// Created with [`SourceExt::map_source`]. On a fetch, the outer key is reduced to the
/// inner key, the inner source is consulted with the caller's default, and a found
/// inner value is transformed into the outer value. `NotFound` passes through
/// untouched, so the caller gets its own default back.
pub struct MapSource<S, FK, FV, IV> {
    inner: S,
    key_fn: FK,
    value_fn: FV,
    _inner_value: PhantomData<fn() -> IV>,
}

impl<S: Debug, FK, FV, IV> Debug for MapSource<S, FK, FV, IV> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSource").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl<S: Clone, FK: Clone, FV: Clone, IV> Clone for MapSource<S, FK, FV, IV> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            key_fn: self.key_fn.clone(),
            value_fn: self.value_fn.clone(),
            _inner_value: PhantomData,
        }
    }
}

impl<S, FK, FV, IV> MapSource<S, FK, FV, IV> {
    /// Returns the inner source.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<K, V, D, IK, IV, S, FK, FV> Source<K, V, D> for MapSource<S, FK, FV, IV>
where
    S: Source<IK, IV, D>,
    FK: Fn(&K) -> IK,
    FV: Fn(IV) -> Result<V, Error>,
{
    fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        let inner_key = (self.key_fn)(key);
        Source::fetch(&self.inner, &inner_key, default)?.try_map(&self.value_fn)
    }
}

impl<K, V, D, IK, IV, S, FK, FV> AsyncSource<K, V, D> for MapSource<S, FK, FV, IV>
where
    K: Sync,
    D: Send,
    IK: Send + Sync,
    S: AsyncSource<IK, IV, D>,
    FK: Fn(&K) -> IK + Send + Sync,
    FV: Fn(IV) -> Result<V, Error> + Send + Sync,
{
    async fn fetch(&self, key: &K, default: D) -> Result<Lookup<V, D>, Error> {
        let inner_key = (self.key_fn)(key);
        AsyncSource::fetch(&self.inner, &inner_key, default).await?.try_map(&self.value_fn)
    }
}

/// Adapters for any source.
pub trait SourceExt: Sized {
    /// Wraps this source so that an outer layer with different keys and values can
    /// use it.
    ///
    /// `key_fn` reduces the outer key to this source's key. `value_fn` turns a value
    /// this source found into the outer value; an error from it fails the fetch.
    ///
    /// # Examples
    ///
    /// ```
    /// use stratum::{Error, KeyNotFound, Lookup, MemorySource, Source, SourceExt};
    ///
    /// let raw = MemorySource::from_iter([("a".to_string(), "41".to_string())]);
    /// let parsed = raw.map_source(
    ///     |key: &(String, u32)| key.0.clone(),
    ///     |text: String| text.parse::<i64>().map(|n| n + 1).map_err(Error::from_message),
    /// );
    ///
    /// let found = Source::fetch(&parsed, &("a".to_string(), 0), KeyNotFound)?;
    /// assert_eq!(found, Lookup::Found(42));
    /// # Ok::<(), Error>(())
    /// ```
    fn map_source<FK, FV, IV>(self, key_fn: FK, value_fn: FV) -> MapSource<Self, FK, FV, IV> {
        MapSource {
            inner: self,
            key_fn,
            value_fn,
            _inner_value: PhantomData,
        }
    }
}

impl<S> SourceExt for S {}

#[cfg(test)]
mod tests {
    use stratum_layer::KeyNotFound;

    use super::*;

    struct Fixed;

    impl Source<u32, String, KeyNotFound> for Fixed {
        fn fetch(&self, key: &u32, default: KeyNotFound) -> Result<Lookup<String, KeyNotFound>, Error> {
            Ok(if *key == 1 {
                Lookup::Found("one".to_string())
            } else {
                Lookup::NotFound(default)
            })
        }
    }

    #[test]
    fn not_found_passes_through_without_transform() {
        let mapped = Fixed.map_source(|key: &(u32, u32)| key.0, |_: String| -> Result<usize, Error> {
            Err(Error::from_message("value transform ran for a missing key"))
        });

        let result = Source::fetch(&mapped, &(2, 0), KeyNotFound).expect("fetch succeeds");
        assert_eq!(result, Lookup::NotFound(KeyNotFound));
    }

    #[test]
    fn found_value_is_transformed() {
        let mapped = Fixed.map_source(|key: &(u32, u32)| key.0, |value: String| Ok(value.len()));

        let result = Source::fetch(&mapped, &(1, 9), KeyNotFound).expect("fetch succeeds");
        assert_eq!(result, Lookup::Found(3));
    }

    #[test]
    fn transform_error_fails_the_fetch() {
        let mapped = Fixed.map_source(|key: &u32| *key, |_: String| -> Result<u8, Error> {
            Err(Error::from_message("unparseable"))
        });

        assert!(Source::fetch(&mapped, &1, KeyNotFound).is_err());
    }
}
