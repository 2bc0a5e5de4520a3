// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for asynchronous `CacheLayer` calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use stratum::{
    AsyncSource, Blocking, CacheLayer, Error, KeyNotFound, Lookup, MemorySource, MemoryStore, Offload, SourceExt,
    async_source_fn, local_fn, source_fn,
};

type TestResult = Result<(), Error>;

#[tokio::test]
async fn async_miss_then_hit() -> TestResult {
    let layer = CacheLayer::builder("bucket")
        .memory::<String, String>()
        .source(MemorySource::from_iter([("a".to_string(), "alpha".to_string())]))
        .build();

    assert_eq!(layer.get_async("a".to_string(), KeyNotFound).await?, Lookup::Found("alpha".to_string()));
    assert_eq!(layer.get_async("a".to_string(), KeyNotFound).await?, Lookup::Found("alpha".to_string()));
    assert_eq!(layer.get_async("c".to_string(), KeyNotFound).await?, Lookup::NotFound(KeyNotFound));

    assert_eq!(layer.source().fetch_count(), 2);
    assert!(!layer.local().contains_key(&"c".to_string()));
    Ok(())
}

#[tokio::test]
async fn async_source_fn_suspends_between_steps() -> TestResult {
    let fetches = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fetches);
    let layer = CacheLayer::builder("slow")
        .memory::<u64, u64>()
        .source(async_source_fn(move |key: u64| {
            let counter = Arc::clone(&counter);
            async move {
                tokio::time::sleep(Duration::from_millis(1)).await;
                counter.fetch_add(1, Ordering::Relaxed);
                Ok((key < 100).then_some(key + 1))
            }
        }))
        .build();

    assert_eq!(layer.get_async(1, KeyNotFound).await?, Lookup::Found(2));
    assert_eq!(layer.get_async(1, KeyNotFound).await?, Lookup::Found(2));
    assert_eq!(layer.get_async(500, KeyNotFound).await?, Lookup::NotFound(KeyNotFound));
    assert_eq!(fetches.load(Ordering::Relaxed), 2);
    Ok(())
}

#[tokio::test]
async fn get_async_with_resolves_callbacks() -> TestResult {
    let layer = CacheLayer::builder("bucket")
        .memory::<String, u32>()
        .source(MemorySource::from_iter([("x".to_string(), 10)]))
        .build();

    let found = layer
        .get_async_with(|| async { Ok("x".to_string()) }, || async { Ok(KeyNotFound) })
        .await?;
    assert_eq!(found, Lookup::Found(10));

    let failed = layer
        .get_async_with(|| async { Err::<String, _>(Error::from_message("no key")) }, || async { Ok(KeyNotFound) })
        .await;
    assert!(failed.is_err());
    Ok(())
}

#[tokio::test]
async fn blocking_local_cache_in_async_layer() -> TestResult {
    let stored = Arc::new(parking_lot::Mutex::new(Vec::<(u8, u8)>::new()));
    let (reader, writer) = (Arc::clone(&stored), Arc::clone(&stored));
    let local = local_fn(
        move |key: &u8| Ok(reader.lock().iter().find(|(k, _)| k == key).map(|(_, v)| *v)),
        move |key: &u8, value: &u8| {
            writer.lock().push((*key, *value));
            Ok(())
        },
    );

    let layer = CacheLayer::builder("blocking")
        .local(Blocking::new(local))
        .source(Blocking::new(source_fn(|key: &u8| Ok(Some(key.wrapping_mul(3))))))
        .build();

    assert_eq!(layer.get_async(4, KeyNotFound).await?, Lookup::Found(12));
    assert_eq!(layer.get_async(4, KeyNotFound).await?, Lookup::Found(12));
    assert_eq!(stored.lock().as_slice(), &[(4, 12)]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn offloaded_source_feeds_memory_store() -> TestResult {
    let layer = CacheLayer::builder("offload")
        .local(MemoryStore::<String, usize>::new())
        .source(Offload::new(source_fn(|path: &String| {
            std::thread::sleep(Duration::from_millis(1));
            Ok(Some(path.len()))
        })))
        .build();

    assert_eq!(layer.get_async("abc.txt".to_string(), KeyNotFound).await?, Lookup::Found(7));
    assert_eq!(layer.local().get(&"abc.txt".to_string()), Some(7));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn layer_is_shared_across_tasks() -> TestResult {
    let layer = Arc::new(
        CacheLayer::builder("shared")
            .memory::<u32, u32>()
            .source(MemorySource::from_iter((0..8).map(|i| (i, i * 10))))
            .build(),
    );

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let layer = Arc::clone(&layer);
            tokio::spawn(async move { layer.get_async(i, KeyNotFound).await })
        })
        .collect();

    for (i, task) in (0_u32..).zip(tasks) {
        let lookup = task.await.map_err(Error::from_message)??;
        assert_eq!(lookup, Lookup::Found(i * 10));
    }
    assert_eq!(layer.local().len(), 8);
    Ok(())
}

#[tokio::test]
async fn stacked_async_layers() -> TestResult {
    let inner = CacheLayer::builder("raw")
        .memory::<String, String>()
        .source(MemorySource::from_iter([("n".to_string(), "41".to_string())]))
        .build();
    let outer = CacheLayer::builder("parsed")
        .memory::<(String, u32), u32>()
        .source(inner.map_source(
            |key: &(String, u32)| key.0.clone(),
            |text: String| text.parse::<u32>().map(|n| n + 1).map_err(Error::from_message),
        ))
        .build();

    assert_eq!(outer.get_async(("n".to_string(), 1), KeyNotFound).await?, Lookup::Found(42));
    assert_eq!(outer.get_async(("m".to_string(), 1), KeyNotFound).await?, Lookup::NotFound(KeyNotFound));

    let direct = AsyncSource::fetch(outer.source().inner(), &"n".to_string(), KeyNotFound).await?;
    assert_eq!(direct, Lookup::Found("41".to_string()));
    Ok(())
}
