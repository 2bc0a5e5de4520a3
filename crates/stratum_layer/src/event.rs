// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Inspection events emitted once per layer invocation.

/// Whether a layer answered from its local cache.
///
/// With the `serde` feature, an outcome serializes as `{"choice": "hit", "key": ...}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "choice", content = "key", rename_all = "snake_case"))]
pub enum Outcome<K> {
    /// The local cache had the key.
    Hit(K),
    /// The local cache did not have the key; the source was consulted.
    Miss(K),
}

impl<K> Outcome<K> {
    /// Returns the key the outcome refers to.
    #[must_use]
    pub fn key(&self) -> &K {
        match self {
            Self::Hit(key) | Self::Miss(key) => key,
        }
    }

    /// Consumes the outcome and returns its key.
    #[must_use]
    pub fn into_key(self) -> K {
        match self {
            Self::Hit(key) | Self::Miss(key) => key,
        }
    }

    /// Returns `"hit"` or `"miss"`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit(_) => "hit",
            Self::Miss(_) => "miss",
        }
    }
}

/// A hit or miss record for one invocation of one layer.
///
/// Events are created by the invoker, handed to the layer's inspect hook by reference
/// and never mutated afterwards. Across nested layers events arrive in call order: the
/// outer layer reports first, then the inner layer it delegates to.
///
/// # Examples
///
/// ```
/// use stratum_layer::{InspectEvent, Outcome};
///
/// let event = InspectEvent::new("raw_files", Outcome::Miss("a"));
/// assert_eq!(*event.identifier(), "raw_files");
/// assert!(event.is_miss());
/// assert_eq!(*event.key(), "a");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InspectEvent<I, K> {
    identifier: I,
    #[cfg_attr(feature = "serde", serde(rename = "value"))]
    outcome: Outcome<K>,
}

impl<I, K> InspectEvent<I, K> {
    /// Creates an event for the given layer identifier and outcome.
    pub fn new(identifier: I, outcome: Outcome<K>) -> Self {
        Self { identifier, outcome }
    }

    /// Creates a hit event.
    pub fn hit(identifier: I, key: K) -> Self {
        Self::new(identifier, Outcome::Hit(key))
    }

    /// Creates a miss event.
    pub fn miss(identifier: I, key: K) -> Self {
        Self::new(identifier, Outcome::Miss(key))
    }

    /// Returns the identifier of the layer that emitted the event.
    #[must_use]
    pub fn identifier(&self) -> &I {
        &self.identifier
    }

    /// Returns the outcome.
    #[must_use]
    pub fn outcome(&self) -> &Outcome<K> {
        &self.outcome
    }

    /// Returns the key that was looked up.
    #[must_use]
    pub fn key(&self) -> &K {
        self.outcome.key()
    }

    /// Returns `true` for a local hit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, Outcome::Hit(_))
    }

    /// Returns `true` for a local miss.
    #[must_use]
    pub fn is_miss(&self) -> bool {
        matches!(self.outcome, Outcome::Miss(_))
    }

    /// Consumes the event and returns the identifier and outcome.
    #[must_use]
    pub fn into_parts(self) -> (I, Outcome<K>) {
        (self.identifier, self.outcome)
    }

    /// Consumes the event and returns its key.
    #[must_use]
    pub fn into_key(self) -> K {
        self.outcome.into_key()
    }
}
