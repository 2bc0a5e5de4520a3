// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A single layer over an in-memory blob source.
//!
//! The first lookup of a key misses and fills the local store, the second one hits.
//! A key the source does not know comes back as the caller's default.

use stratum::{CacheLayer, Error, InspectEvent, KeyNotFound, Lookup, MemorySource, inspect_fn};

fn main() -> Result<(), Error> {
    let blobs = MemorySource::from_iter([
        ("a".to_string(), r#"{"key":"a","value":"a"}"#.to_string()),
        ("b".to_string(), r#"{"key":"b","value":"b"}"#.to_string()),
    ]);

    let layer = CacheLayer::builder("raw_files")
        .memory::<String, String>()
        .source(blobs)
        .inspector(inspect_fn(|event: &InspectEvent<&'static str, String>| {
            println!("{} {} {}", event.identifier(), event.outcome().as_str(), event.key());
        }))
        .build();

    for key in ["a", "a", "c"] {
        match layer.get(key.to_string(), KeyNotFound)? {
            Lookup::Found(raw) => println!("  {key} => {raw}"),
            Lookup::NotFound(KeyNotFound) => println!("  {key} => not found"),
        }
    }

    println!("source consulted {} times", layer.source().fetch_count());
    Ok(())
}
