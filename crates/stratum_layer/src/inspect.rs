// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Observers of inspection events.

use std::fmt::Debug;
use std::sync::Arc;

use crate::InspectEvent;

/// Receives the hit or miss event of every invocation of a layer.
///
/// Inspectors observe; they cannot fail the invocation. Events are borrowed, so an
/// inspector that keeps them must clone.
///
/// Several inspectors can be combined with a tuple: `(first, second)` forwards each
/// event to both, in order.
pub trait Inspector<I, K> {
    /// Observes one event.
    fn inspect(&self, event: &InspectEvent<I, K>);
}

impl<I, K> Inspector<I, K> for () {
    fn inspect(&self, _event: &InspectEvent<I, K>) {}
}

impl<I, K, A, B> Inspector<I, K> for (A, B)
where
    A: Inspector<I, K>,
    B: Inspector<I, K>,
{
    fn inspect(&self, event: &InspectEvent<I, K>) {
        self.0.inspect(event);
        self.1.inspect(event);
    }
}

impl<I, K, T> Inspector<I, K> for Arc<T>
where
    T: Inspector<I, K> + ?Sized,
{
    fn inspect(&self, event: &InspectEvent<I, K>) {
        (**self).inspect(event);
    }
}

impl<I, K, T> Inspector<I, K> for &T
where
    T: Inspector<I, K> + ?Sized,
{
    fn inspect(&self, event: &InspectEvent<I, K>) {
        (**self).inspect(event);
    }
}

/// An [`Inspector`] backed by a closure. Created with [`inspect_fn`].
#[derive(Clone)]
pub struct InspectFn<F>(F);

impl<F> Debug for InspectFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectFn").finish_non_exhaustive()
    }
}

impl<I, K, F> Inspector<I, K> for InspectFn<F>
where
    F: Fn(&InspectEvent<I, K>),
{
    fn inspect(&self, event: &InspectEvent<I, K>) {
        (self.0)(event);
    }
}

/// Wraps a closure as an [`Inspector`].
///
/// # Examples
///
/// ```
/// use stratum_layer::{InspectEvent, Inspector, inspect_fn};
///
/// let printer = inspect_fn(|event: &InspectEvent<&str, u32>| {
///     println!("{} {}", event.identifier(), event.outcome().as_str());
/// });
/// printer.inspect(&InspectEvent::hit("numbers", 7));
/// ```
pub fn inspect_fn<F>(f: F) -> InspectFn<F> {
    InspectFn(f)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn tuple_forwards_to_both_in_order() {
        let seen = parking_lot::Mutex::new(Vec::new());
        let first = inspect_fn(|_: &InspectEvent<&str, u8>| seen.lock().push("first"));
        let second = inspect_fn(|_: &InspectEvent<&str, u8>| seen.lock().push("second"));

        (first, second).inspect(&InspectEvent::miss("layer", 1));

        assert_eq!(*seen.lock(), vec!["first", "second"]);
    }

    #[test]
    fn arc_and_ref_forward() {
        fn emit(inspector: impl Inspector<&'static str, u8>) {
            inspector.inspect(&InspectEvent::hit("layer", 1));
        }

        let count = AtomicUsize::new(0);
        let counter = inspect_fn(|_: &InspectEvent<&str, u8>| {
            count.fetch_add(1, Ordering::Relaxed);
        });

        emit(&counter);
        emit(Arc::new(counter));

        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn unit_ignores_events() {
        ().inspect(&InspectEvent::hit("layer", 1));
    }
}
