// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Composable single-layer caches that stack into multi-layer cache pipelines.
//!
//! A [`CacheLayer`] puts a local cache in front of a source. On every call it looks
//! the key up locally, delegates to the source on a miss, writes a produced value
//! back, and reports exactly one hit or miss event to its inspector. When the source
//! has nothing, the caller's own default comes back as [`Lookup::NotFound`].
//!
//! Layers stack: a layer is itself a [`Source`], so an outer layer can delegate to an
//! inner one, with [`SourceExt::map_source`] bridging different keys and values.
//!
//! This crate provides:
//! - [`CacheLayer`] and its builder, with sync ([`CacheLayer::get`]) and async
//!   ([`CacheLayer::get_async`]) entry points that run the same protocol
//! - closure adapters ([`local_fn`], [`source_fn`], [`async_source_fn`]) for plugging
//!   in existing stores and loaders
//! - [`Blocking`] and [`Offload`] for using synchronous collaborators in async layers
//! - an in-memory store and source (feature `memory`)
//! - logs and OpenTelemetry metrics for layer events (features `logs`, `metrics`)
//!
//! # Examples
//!
//! ## A Single Layer
//!
//! ```
//! use stratum::{CacheLayer, KeyNotFound, Lookup, MemorySource};
//!
//! let layer = CacheLayer::builder("raw_files")
//!     .memory::<String, String>()
//!     .source(MemorySource::from_iter([("a".to_string(), "alpha".to_string())]))
//!     .build();
//!
//! assert_eq!(layer.get("a".to_string(), KeyNotFound)?, Lookup::Found("alpha".to_string()));
//! assert!(layer.local().contains_key(&"a".to_string()));
//! # Ok::<(), stratum::Error>(())
//! ```
//!
//! ## Stacked Layers
//!
//! ```
//! use stratum::{CacheLayer, Error, KeyNotFound, Lookup, MemorySource, SourceExt};
//!
//! let raw = CacheLayer::builder("raw")
//!     .memory::<String, String>()
//!     .source(MemorySource::from_iter([("n".to_string(), "42".to_string())]))
//!     .build();
//!
//! let parsed = CacheLayer::builder("parsed")
//!     .memory::<String, u32>()
//!     .source(raw.map_source(String::clone, |text: String| {
//!         text.parse::<u32>().map_err(Error::from_message)
//!     }))
//!     .build();
//!
//! assert_eq!(parsed.get("n".to_string(), KeyNotFound)?, Lookup::Found(42));
//! # Ok::<(), stratum::Error>(())
//! ```

mod adapters;
mod blocking;
pub mod builder;
mod invocation;
pub mod layer;
mod map;
#[cfg(any(feature = "logs", feature = "metrics", test))]
mod telemetry;

#[doc(inline)]
pub use adapters::{AsyncSourceFn, LocalFn, SourceFn, async_source_fn, local_fn, source_fn};
#[doc(inline)]
pub use blocking::Blocking;
#[cfg(feature = "tokio")]
#[doc(inline)]
pub use blocking::Offload;
#[doc(inline)]
pub use builder::CacheLayerBuilder;
#[doc(inline)]
pub use layer::CacheLayer;
#[doc(inline)]
pub use map::{MapSource, SourceExt};
#[doc(inline)]
pub use stratum_layer::{
    AsyncLayer, AsyncLocalCache, AsyncSource, CacheMiss, Error, InspectEvent, InspectFn, Inspector, KeyNotFound, Layer,
    LocalCache, Lookup, Outcome, Result, Source, inspect_fn, invoke, invoke_async,
};
#[cfg(feature = "memory")]
#[doc(inline)]
pub use stratum_memory::{MemorySource, MemoryStore, MemoryStoreBuilder};
#[cfg(any(feature = "logs", feature = "metrics", test))]
#[doc(inline)]
pub use telemetry::{LayerTelemetry, TelemetryConfig};

#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use stratum_layer::testing::{EventLog, LayerOp, MockLayer, cache_miss};
