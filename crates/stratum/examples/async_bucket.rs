// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! An async layer in front of a slow, remote-looking bucket.
//!
//! Misses wait on the bucket; hits are answered from memory without suspending on
//! the source.

use std::time::{Duration, Instant};

use stratum::{CacheLayer, Error, KeyNotFound, Lookup, async_source_fn};

async fn download(name: String) -> Result<Option<Vec<u8>>, Error> {
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(name.ends_with(".bin").then(|| name.into_bytes()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let layer = CacheLayer::builder("bucket")
        .memory::<String, Vec<u8>>()
        .source(async_source_fn(download))
        .build();

    for name in ["model.bin", "model.bin", "notes.txt"] {
        let started = Instant::now();
        let lookup = layer.get_async(name.to_string(), KeyNotFound).await?;
        let elapsed = started.elapsed();

        match lookup {
            Lookup::Found(bytes) => println!("{name}: {} bytes in {elapsed:?}", bytes.len()),
            Lookup::NotFound(KeyNotFound) => println!("{name}: not in bucket ({elapsed:?})"),
        }
    }

    Ok(())
}
