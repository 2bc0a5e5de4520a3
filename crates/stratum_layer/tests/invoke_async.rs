// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the asynchronous invoker.

use std::sync::atomic::{AtomicUsize, Ordering};

use stratum_layer::testing::{LayerOp, MockLayer};
use stratum_layer::{AsyncLayer, CacheMiss, Error, KeyNotFound, Lookup, Outcome, invoke, invoke_async};

type TestResult = Result<(), Error>;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[tokio::test]
async fn miss_then_found_writes_back() -> TestResult {
    let layer = MockLayer::new("files", "a").with_source("a", 1);

    assert_eq!(invoke_async(&layer).await?, Lookup::Found(1));
    assert_eq!(layer.local_value(&"a"), Some(1));

    assert_eq!(invoke_async(&layer).await?, Lookup::Found(1));
    assert_eq!(
        layer.operations().last(),
        Some(&LayerOp::Inspect(Outcome::Hit("a")))
    );
    Ok(())
}

#[tokio::test]
async fn not_found_leaves_local_untouched() -> TestResult {
    let layer = MockLayer::<&str, i32>::new("files", "c");

    assert_eq!(invoke_async(&layer).await?, Lookup::NotFound(KeyNotFound));
    assert_eq!(layer.local_len(), 0);
    Ok(())
}

#[test]
fn sync_and_async_share_step_order() {
    let scenarios: [fn() -> MockLayer<&'static str, i32>; 3] = [
        || MockLayer::new("files", "a").with_source("a", 1),
        || MockLayer::new("files", "a").with_local("a", 1),
        || MockLayer::new("files", "a"),
    ];

    for make in scenarios {
        let sync_layer = make();
        let async_layer = make();

        let sync_result = invoke(&sync_layer).map_err(|e| e.to_string());
        let async_result = block_on(invoke_async(&async_layer)).map_err(|e| e.to_string());

        assert_eq!(sync_result, async_result);
        assert_eq!(sync_layer.operations(), async_layer.operations());
        assert_eq!(sync_layer.local_len(), async_layer.local_len());
    }
}

#[test]
fn sync_and_async_stop_at_same_failure() {
    let layer = MockLayer::new("files", "a").with_source("a", 1);
    layer.fail_when(|op| matches!(op, LayerOp::Default));
    assert!(invoke(&layer).is_err());
    let sync_ops = layer.operations();

    let layer = MockLayer::new("files", "a").with_source("a", 1);
    layer.fail_when(|op| matches!(op, LayerOp::Default));
    assert!(block_on(invoke_async(&layer)).is_err());

    assert_eq!(sync_ops, layer.operations());
}

/// A layer whose callbacks yield before completing and that counts how many are
/// in flight at once.
struct Yielding {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Yielding {
    async fn step<T>(&self, value: T) -> T {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        value
    }
}

impl AsyncLayer for Yielding {
    type Identifier = &'static str;
    type Key = u32;
    type Value = u32;
    type Default = KeyNotFound;
    type Error = Error;

    async fn identifier(&self) -> Result<&'static str, Error> {
        Ok(self.step("yielding").await)
    }

    async fn cache_key(&self) -> Result<u32, Error> {
        Ok(self.step(7).await)
    }

    async fn get_cached(&self, _key: &u32, miss: CacheMiss) -> Result<Lookup<u32, CacheMiss>, Error> {
        Ok(Lookup::NotFound(self.step(miss).await))
    }

    async fn set_cached(&self, _key: &u32, _value: &u32) -> Result<(), Error> {
        self.step(()).await;
        Ok(())
    }

    async fn on_miss(&self, key: &u32, _default: KeyNotFound) -> Result<Lookup<u32, KeyNotFound>, Error> {
        Ok(Lookup::Found(self.step(key * 2).await))
    }

    async fn default_value(&self) -> Result<KeyNotFound, Error> {
        Ok(self.step(KeyNotFound).await)
    }
}

#[tokio::test]
async fn callbacks_are_awaited_one_at_a_time() -> TestResult {
    let layer = Yielding {
        in_flight: AtomicUsize::new(0),
        max_in_flight: AtomicUsize::new(0),
    };

    assert_eq!(invoke_async(&layer).await?, Lookup::Found(14));
    assert_eq!(layer.max_in_flight.load(Ordering::SeqCst), 1);
    Ok(())
}
