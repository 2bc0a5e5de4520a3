// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory collaborators for stratum cache layers.
//!
//! This crate provides [`MemoryStore`], a concurrent in-memory local cache backed by
//! moka, and [`MemorySource`], a fixed bucket of values that acts as the source of a
//! layer. Both implement the synchronous and asynchronous traits from
//! `stratum_layer`, so they can back either kind of layer.
//!
//! # Quick Start
//!
//! ```
//! use stratum_layer::{KeyNotFound, Lookup, Source};
//! use stratum_memory::{MemorySource, MemoryStore};
//!
//! let store = MemoryStore::<String, String>::builder()
//!     .max_capacity(1000)
//!     .build();
//! let source = MemorySource::from_iter([("a".to_string(), "alpha".to_string())]);
//!
//! let fetched = Source::fetch(&source, &"a".to_string(), KeyNotFound)?;
//! assert_eq!(fetched, Lookup::Found("alpha".to_string()));
//! store.insert("a".to_string(), "alpha".to_string());
//! assert!(store.contains_key(&"a".to_string()));
//! # Ok::<(), stratum_layer::Error>(())
//! ```

pub mod builder;
pub mod source;
pub mod store;

#[doc(inline)]
pub use builder::MemoryStoreBuilder;
#[doc(inline)]
pub use source::MemorySource;
#[doc(inline)]
pub use store::MemoryStore;
