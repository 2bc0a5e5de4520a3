// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cache layer telemetry integration with `tracing` and OpenTelemetry.
//!
//! [`LayerTelemetry`] is an [`Inspector`] that turns every hit and miss event into a
//! structured log record (feature `logs`) and a counter increment (feature `metrics`).

use std::fmt::Display;
use std::sync::Arc;

#[cfg(any(feature = "metrics", test))]
use opentelemetry::{KeyValue, metrics::Counter};
use stratum_layer::{InspectEvent, Inspector, Outcome};

pub(crate) mod attributes;
mod config;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(test)]
pub(crate) mod testing;

pub use config::TelemetryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayerActivity {
    Hit,
    Miss,
}

impl LayerActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "cache.hit",
            Self::Miss => "cache.miss",
        }
    }
}

impl<K> From<&Outcome<K>> for LayerActivity {
    fn from(outcome: &Outcome<K>) -> Self {
        match outcome {
            Outcome::Hit(_) => Self::Hit,
            Outcome::Miss(_) => Self::Miss,
        }
    }
}

/// An [`Inspector`] that records cache layer events as logs and metrics.
///
/// Built from a [`TelemetryConfig`]. The layer identifier, formatted with
/// [`Display`], becomes the `cache.name` of every record. Clones share the same
/// instruments.
#[derive(Clone, Debug)]
pub struct LayerTelemetry {
    inner: Arc<LayerTelemetryInner>,
}

#[derive(Debug)]
pub(crate) struct LayerTelemetryInner {
    #[cfg(any(feature = "logs", test))]
    pub(crate) logging_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    pub(crate) event_counter: Option<Counter<u64>>,
}

impl LayerTelemetry {
    pub(crate) fn from_inner(inner: LayerTelemetryInner) -> Self {
        Self { inner: Arc::new(inner) }
    }

    /// Returns `true` if logs or metrics are enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(any(feature = "logs", test))]
        if self.inner.logging_enabled {
            return true;
        }

        #[cfg(any(feature = "metrics", test))]
        if self.inner.event_counter.is_some() {
            return true;
        }

        false
    }

    pub(crate) fn record(&self, cache_name: &str, activity: LayerActivity) {
        #[cfg(any(feature = "metrics", test))]
        if let Some(counter) = &self.inner.event_counter {
            counter.add(
                1,
                &[
                    KeyValue::new(attributes::CACHE_NAME, cache_name.to_owned()),
                    KeyValue::new(attributes::CACHE_ACTIVITY_NAME, activity.as_str()),
                ],
            );
        }

        #[cfg(any(feature = "logs", test))]
        if self.inner.logging_enabled {
            Self::emit(cache_name, activity);
        }
    }

    // Field names must match the constants in attributes.rs.
    #[cfg(any(feature = "logs", test))]
    fn emit(cache_name: &str, activity: LayerActivity) {
        tracing::debug!(cache.name = cache_name, cache.activity = activity.as_str(), "cache.event");
    }
}

impl<I: Display, K> Inspector<I, K> for LayerTelemetry {
    fn inspect(&self, event: &InspectEvent<I, K>) {
        if !self.is_enabled() {
            return;
        }

        let cache_name = event.identifier().to_string();
        self.record(&cache_name, LayerActivity::from(event.outcome()));
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry::metrics::MeterProvider;

    use super::*;
    use crate::telemetry::testing::{LogCapture, MetricTester};

    #[test]
    fn activity_as_str() {
        assert_eq!(LayerActivity::Hit.as_str(), "cache.hit");
        assert_eq!(LayerActivity::Miss.as_str(), "cache.miss");
        assert_eq!(LayerActivity::from(&Outcome::Miss(1)), LayerActivity::Miss);
    }

    #[test]
    fn metrics_record_emits_name_and_activity() {
        let tester = MetricTester::new();
        let telemetry = TelemetryConfig::new().with_metrics(tester.meter_provider()).build();

        telemetry.inspect(&InspectEvent::miss("raw_files", "a"));

        tester.assert_attributes_contain(&[
            KeyValue::new(attributes::CACHE_NAME, "raw_files"),
            KeyValue::new(attributes::CACHE_ACTIVITY_NAME, LayerActivity::Miss.as_str()),
        ]);
    }

    #[test]
    fn metrics_count_every_event() {
        let tester = MetricTester::new();
        let meter = tester.meter_provider().meter("stratum");
        let telemetry = LayerTelemetry::from_inner(LayerTelemetryInner {
            logging_enabled: false,
            event_counter: Some(metrics::create_event_counter(&meter)),
        });

        telemetry.inspect(&InspectEvent::miss("parsed_files", 1));
        telemetry.inspect(&InspectEvent::hit("parsed_files", 1));
        telemetry.inspect(&InspectEvent::hit("parsed_files", 1));

        assert_eq!(tester.sum(metrics::CACHE_EVENT_COUNT_NAME), 3);
    }

    #[test]
    fn logs_contain_fields_and_values() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let telemetry = TelemetryConfig::new().with_logs().build();
        telemetry.inspect(&InspectEvent::hit("raw_files", "a"));

        capture.assert_contains(attributes::CACHE_NAME);
        capture.assert_contains(attributes::CACHE_ACTIVITY_NAME);
        capture.assert_contains(attributes::CACHE_EVENT_NAME);
        capture.assert_contains("raw_files");
        capture.assert_contains(LayerActivity::Hit.as_str());
        capture.assert_contains("DEBUG");
    }

    #[test]
    fn disabled_telemetry_emits_nothing() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let telemetry = TelemetryConfig::new().build();
        assert!(!telemetry.is_enabled());
        telemetry.inspect(&InspectEvent::miss("raw_files", "a"));

        assert!(capture.output().is_empty());
    }
}
