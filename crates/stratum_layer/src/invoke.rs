// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The layer invoker.
//!
//! The protocol is written once, in `layer_protocol!`, and expanded twice: as-is for
//! [`invoke`] and with every callback awaited for [`invoke_async`].

use crate::{AsyncLayer, CacheMiss, InspectEvent, Layer, Lookup};

// `$suspend` is either nothing or `await`. Each callback result is followed by
// `$(.$suspend)*` and then `?`, so both variants share one step order.
macro_rules! layer_protocol {
    ($layer:ident $(, $suspend:tt)*) => {{
        let identifier = ($layer.identifier() $(.$suspend)*)?;
        let key = ($layer.cache_key() $(.$suspend)*)?;

        match ($layer.get_cached(&key, CacheMiss::new()) $(.$suspend)*)? {
            Lookup::Found(value) => {
                let event = InspectEvent::hit(identifier, key);
                ($layer.inspect(&event) $(.$suspend)*)?;
                Ok(Lookup::Found(value))
            }
            Lookup::NotFound(_miss) => {
                let event = InspectEvent::miss(identifier, key);
                ($layer.inspect(&event) $(.$suspend)*)?;
                let key = event.into_key();

                let default = ($layer.default_value() $(.$suspend)*)?;
                match ($layer.on_miss(&key, default) $(.$suspend)*)? {
                    Lookup::NotFound(default) => Ok(Lookup::NotFound(default)),
                    Lookup::Found(value) => {
                        ($layer.set_cached(&key, &value) $(.$suspend)*)?;
                        Ok(Lookup::Found(value))
                    }
                }
            }
        }
    }};
}

/// Runs one invocation of a cache layer.
///
/// 1. Resolves the identifier, then the key.
/// 2. Probes the local cache with a private [`CacheMiss`].
/// 3. On a hit, reports a hit event and returns the cached value. The source is not
///    consulted and nothing is written.
/// 4. On a miss, reports a miss event, resolves the default and delegates to the
///    source. If the source returns `NotFound(default)`, that is returned and the local
///    cache is left untouched. Otherwise the value is written back and returned.
///
/// # Errors
///
/// Returns the first error raised by any callback, unchanged. Steps after the failing
/// callback do not run; in particular a failing write-back loses the fetched value.
///
/// # Examples
///
/// See the [crate-level documentation](crate) for a complete [`Layer`] implementation.
pub fn invoke<L>(layer: &L) -> Result<Lookup<L::Value, L::Default>, L::Error>
where
    L: Layer + ?Sized,
{
    layer_protocol!(layer)
}

/// Runs one invocation of a cache layer whose callbacks may suspend.
///
/// Performs exactly the steps of [`invoke`], in the same order, awaiting each callback
/// before issuing the next one.
///
/// # Errors
///
/// Returns the first error raised by any callback, unchanged.
pub async fn invoke_async<L>(layer: &L) -> Result<Lookup<L::Value, L::Default>, L::Error>
where
    L: AsyncLayer + ?Sized,
{
    layer_protocol!(layer, await)
}
