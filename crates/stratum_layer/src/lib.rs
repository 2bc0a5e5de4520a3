// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! The single cache-layer invocation protocol.
//!
//! A cache layer pairs a local store with a source it delegates to on a miss. Layers
//! are stacked by making one layer's source invoke the next, inner layer: keys flow
//! inward, values flow outward, and every layer reports exactly one hit or miss
//! [`InspectEvent`] per invocation.
//!
//! This crate defines the contract between a layer and its collaborators, and the
//! invoker that drives it:
//!
//! - [`Layer`] and [`AsyncLayer`] describe the callbacks a layer needs: identifier,
//!   key, local lookup, local write-back, miss delegation, default sentinel and an
//!   optional inspect hook.
//! - [`invoke`] and [`invoke_async`] run the protocol. Both are generated from the
//!   same algorithm definition, so their step order is identical.
//! - [`Lookup`] replaces identity-compared "not found" sentinels with an explicit
//!   `Found` / `NotFound` tag. The local cache is probed with a private [`CacheMiss`]
//!   marker, never with the caller's default.
//! - [`LocalCache`], [`Source`] and their async twins are the building blocks that
//!   the `stratum` crate composes into reusable layers.
//!
//! # Implementing a Layer
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//!
//! use stratum_layer::{CacheMiss, Error, KeyNotFound, Layer, Lookup, invoke};
//!
//! struct Greetings {
//!     key: String,
//!     local: Mutex<HashMap<String, String>>,
//! }
//!
//! impl Layer for Greetings {
//!     type Identifier = &'static str;
//!     type Key = String;
//!     type Value = String;
//!     type Default = KeyNotFound;
//!     type Error = Error;
//!
//!     fn identifier(&self) -> Result<&'static str, Error> {
//!         Ok("greetings")
//!     }
//!
//!     fn cache_key(&self) -> Result<String, Error> {
//!         Ok(self.key.clone())
//!     }
//!
//!     fn get_cached(&self, key: &String, miss: CacheMiss) -> Result<Lookup<String, CacheMiss>, Error> {
//!         Ok(Lookup::from_option(self.local.lock().unwrap().get(key).cloned(), miss))
//!     }
//!
//!     fn set_cached(&self, key: &String, value: &String) -> Result<(), Error> {
//!         self.local.lock().unwrap().insert(key.clone(), value.clone());
//!         Ok(())
//!     }
//!
//!     fn on_miss(&self, key: &String, _default: KeyNotFound) -> Result<Lookup<String, KeyNotFound>, Error> {
//!         Ok(Lookup::Found(format!("hello, {key}")))
//!     }
//!
//!     fn default_value(&self) -> Result<KeyNotFound, Error> {
//!         Ok(KeyNotFound)
//!     }
//! }
//!
//! let layer = Greetings { key: "world".to_string(), local: Mutex::default() };
//! let value = invoke(&layer)?;
//! assert_eq!(value.found().as_deref(), Some("hello, world"));
//! # Ok::<(), Error>(())
//! ```

pub mod error;
mod event;
mod inspect;
mod invoke;
mod layer;
mod local;
mod lookup;
mod source;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use event::{InspectEvent, Outcome};
#[doc(inline)]
pub use inspect::{InspectFn, Inspector, inspect_fn};
#[doc(inline)]
pub use invoke::{invoke, invoke_async};
#[doc(inline)]
pub use layer::{AsyncLayer, Layer};
#[doc(inline)]
pub use local::{AsyncLocalCache, LocalCache};
#[doc(inline)]
pub use lookup::{CacheMiss, KeyNotFound, Lookup};
#[doc(inline)]
pub use source::{AsyncSource, Source};
