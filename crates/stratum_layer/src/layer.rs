// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The callback contract of a single cache layer.
//!
//! [`Layer`] and [`AsyncLayer`] are the same contract; the async one returns futures
//! so that any callback may suspend. Drive them with [`invoke`](crate::invoke) and
//! [`invoke_async`](crate::invoke_async).

use crate::{CacheMiss, InspectEvent, Lookup};

/// The callbacks of a single cache layer.
///
/// The invoker calls each method at most once per invocation, in this order:
/// `identifier`, `cache_key`, `get_cached`, then either `inspect` (hit) or
/// `inspect`, `default_value`, `on_miss` and, if the source produced a value,
/// `set_cached` (miss).
///
/// Every method is fallible. An error is returned to the caller of the invoker as is;
/// nothing is retried or wrapped.
pub trait Layer {
    /// Names the layer in inspection events.
    type Identifier;
    /// Addresses the local cache and, after reduction, the source.
    type Key;
    /// The value returned on success.
    type Value;
    /// The per-call marker returned when the source has no value.
    type Default;
    /// The error raised by the callbacks.
    type Error;

    /// Resolves the identifier for this invocation.
    fn identifier(&self) -> Result<Self::Identifier, Self::Error>;

    /// Resolves the key for this invocation.
    fn cache_key(&self) -> Result<Self::Key, Self::Error>;

    /// Looks up the key in the local cache.
    ///
    /// Return `Lookup::NotFound(miss)` with the given probe if the key is absent.
    fn get_cached(&self, key: &Self::Key, miss: CacheMiss) -> Result<Lookup<Self::Value, CacheMiss>, Self::Error>;

    /// Writes a value the source produced back into the local cache.
    fn set_cached(&self, key: &Self::Key, value: &Self::Value) -> Result<(), Self::Error>;

    /// Delegates a local miss to the source.
    ///
    /// Return `Lookup::NotFound(default)` if the source has no value either.
    fn on_miss(&self, key: &Self::Key, default: Self::Default) -> Result<Lookup<Self::Value, Self::Default>, Self::Error>;

    /// Produces this invocation's not-found marker.
    fn default_value(&self) -> Result<Self::Default, Self::Error>;

    /// Observes the hit or miss event of this invocation. Does nothing by default.
    fn inspect(&self, event: &InspectEvent<Self::Identifier, Self::Key>) -> Result<(), Self::Error> {
        let _ = event;
        Ok(())
    }
}

/// The callbacks of a single cache layer whose steps may suspend.
///
/// Same contract and call order as [`Layer`]. Every callback is a suspension point
/// and the invoker awaits them strictly one after another.
pub trait AsyncLayer: Send + Sync {
    /// Names the layer in inspection events.
    type Identifier;
    /// Addresses the local cache and, after reduction, the source.
    type Key;
    /// The value returned on success.
    type Value;
    /// The per-call marker returned when the source has no value.
    type Default;
    /// The error raised by the callbacks.
    type Error: Send;

    /// Resolves the identifier for this invocation.
    fn identifier(&self) -> impl Future<Output = Result<Self::Identifier, Self::Error>> + Send;

    /// Resolves the key for this invocation.
    fn cache_key(&self) -> impl Future<Output = Result<Self::Key, Self::Error>> + Send;

    /// Looks up the key in the local cache.
    ///
    /// Return `Lookup::NotFound(miss)` with the given probe if the key is absent.
    fn get_cached(
        &self,
        key: &Self::Key,
        miss: CacheMiss,
    ) -> impl Future<Output = Result<Lookup<Self::Value, CacheMiss>, Self::Error>> + Send;

    /// Writes a value the source produced back into the local cache.
    fn set_cached(&self, key: &Self::Key, value: &Self::Value) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Delegates a local miss to the source.
    ///
    /// Return `Lookup::NotFound(default)` if the source has no value either.
    fn on_miss(
        &self,
        key: &Self::Key,
        default: Self::Default,
    ) -> impl Future<Output = Result<Lookup<Self::Value, Self::Default>, Self::Error>> + Send;

    /// Produces this invocation's not-found marker.
    fn default_value(&self) -> impl Future<Output = Result<Self::Default, Self::Error>> + Send;

    /// Observes the hit or miss event of this invocation. Does nothing by default.
    fn inspect(&self, event: &InspectEvent<Self::Identifier, Self::Key>) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let _ = event;
        std::future::ready(Ok(()))
    }
}
