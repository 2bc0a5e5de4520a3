// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;

/// The outcome of asking a local cache or a source for a value.
///
/// `Found` carries the value. `NotFound` hands back the marker that was passed in
/// with the request: the private [`CacheMiss`] probe for local lookups, or the
/// caller's default for source delegation. Absence is therefore decided by the tag,
/// never by comparing a value against a sentinel.
///
/// # Examples
///
/// ```
/// use stratum_layer::{KeyNotFound, Lookup};
///
/// let found: Lookup<i32, KeyNotFound> = Lookup::Found(42);
/// assert_eq!(found.found(), Some(42));
///
/// let missing: Lookup<i32, KeyNotFound> = Lookup::NotFound(KeyNotFound);
/// assert!(missing.is_not_found());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lookup<T, D> {
    /// A value was produced.
    Found(T),
    /// Nothing was produced; carries the marker supplied with the request.
    NotFound(D),
}

impl<T, D> Lookup<T, D> {
    /// Builds a lookup from an optional value, using `default` when it is `None`.
    ///
    /// This is the usual way for a map-backed local cache to answer a probe.
    ///
    /// ```
    /// use stratum_layer::Lookup;
    ///
    /// assert_eq!(Lookup::from_option(Some(1), "absent"), Lookup::Found(1));
    /// assert_eq!(Lookup::from_option(None::<i32>, "absent"), Lookup::NotFound("absent"));
    /// ```
    pub fn from_option(value: Option<T>, default: D) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::NotFound(default),
        }
    }

    /// Returns `true` if a value was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns `true` if nothing was found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns the found value, discarding the not-found marker.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound(_) => None,
        }
    }

    /// Returns a reference to the found value, if any.
    #[must_use]
    pub fn as_found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound(_) => None,
        }
    }

    /// Converts into a `Result`, with the not-found marker as the error.
    ///
    /// # Errors
    ///
    /// Returns `Err(marker)` if nothing was found.
    pub fn into_result(self) -> Result<T, D> {
        match self {
            Self::Found(value) => Ok(value),
            Self::NotFound(default) => Err(default),
        }
    }

    /// Maps a found value, leaving the not-found marker untouched.
    pub fn map<U, F>(self, f: F) -> Lookup<U, D>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound(default) => Lookup::NotFound(default),
        }
    }

    /// Maps a found value with a fallible function.
    ///
    /// Nested layers use this to turn an inner layer's value into the outer layer's
    /// value type while passing the default through unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Lookup<U, D>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        match self {
            Self::Found(value) => f(value).map(Lookup::Found),
            Self::NotFound(default) => Ok(Lookup::NotFound(default)),
        }
    }
}

/// The private probe used to ask a local cache for a value.
///
/// The invoker creates a `CacheMiss` for every local lookup. It cannot be constructed
/// outside this crate, so the only way for a local cache to report absence is to hand
/// the probe back as [`Lookup::NotFound`]. This keeps "the local cache does not have
/// it" apart from "the source does not have it", which is signalled with the caller's
/// own default.
pub struct CacheMiss(());

impl CacheMiss {
    pub(crate) const fn new() -> Self {
        Self(())
    }
}

impl Debug for CacheMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CacheMiss")
    }
}

/// A conventional not-found sentinel for layers that need no richer default.
///
/// # Examples
///
/// ```
/// use stratum_layer::{KeyNotFound, Lookup};
///
/// let outcome: Lookup<String, KeyNotFound> = Lookup::NotFound(KeyNotFound);
/// assert_eq!(outcome.into_result(), Err(KeyNotFound));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyNotFound;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_and_not_found_predicates() {
        let found: Lookup<i32, KeyNotFound> = Lookup::Found(1);
        let missing: Lookup<i32, KeyNotFound> = Lookup::NotFound(KeyNotFound);

        assert!(found.is_found());
        assert!(!found.is_not_found());
        assert!(missing.is_not_found());
        assert!(!missing.is_found());
    }

    #[test]
    fn as_found_borrows_value() {
        let found: Lookup<String, ()> = Lookup::Found("a".to_string());
        assert_eq!(found.as_found().map(String::as_str), Some("a"));

        let missing: Lookup<String, ()> = Lookup::NotFound(());
        assert!(missing.as_found().is_none());
    }

    #[test]
    fn map_keeps_default() {
        let missing: Lookup<i32, &str> = Lookup::NotFound("default");
        assert_eq!(missing.map(|v| v * 2), Lookup::NotFound("default"));

        let found: Lookup<i32, &str> = Lookup::Found(21);
        assert_eq!(found.map(|v| v * 2), Lookup::Found(42));
    }

    #[test]
    fn try_map_propagates_error() {
        let found: Lookup<&str, KeyNotFound> = Lookup::Found("not a number");
        let result = found.try_map(str::parse::<i32>);
        assert!(result.is_err());

        let missing: Lookup<&str, KeyNotFound> = Lookup::NotFound(KeyNotFound);
        let result = missing.try_map(str::parse::<i32>);
        assert_eq!(result, Ok(Lookup::NotFound(KeyNotFound)));
    }

    #[test]
    fn found_equal_to_default_is_still_found() {
        let lookup: Lookup<String, String> = Lookup::Found("sentinel".to_string());
        assert!(lookup.is_found());
        assert_eq!(lookup.into_result(), Ok("sentinel".to_string()));
    }

    #[test]
    fn cache_miss_debug() {
        assert_eq!(format!("{:?}", CacheMiss::new()), "CacheMiss");
    }
}
