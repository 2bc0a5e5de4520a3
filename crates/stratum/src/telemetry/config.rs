// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Telemetry configuration for cache layers.

#[cfg(any(feature = "metrics", test))]
use opentelemetry::metrics::{Meter, MeterProvider};

use crate::telemetry::{LayerTelemetry, LayerTelemetryInner};

/// Configuration for cache layer telemetry.
///
/// Everything is disabled by default. Enable logs and/or metrics, then pass the
/// configuration to [`CacheLayerBuilder::telemetry`](crate::CacheLayerBuilder::telemetry)
/// or turn it into an inspector with [`build`](Self::build).
///
/// # Examples
///
/// ```ignore
/// use stratum::TelemetryConfig;
///
/// // Logging only
/// let config = TelemetryConfig::new().with_logs();
///
/// // Logging and metrics
/// let config = TelemetryConfig::new()
///     .with_logs()
///     .with_metrics(&meter_provider);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TelemetryConfig {
    #[cfg(any(feature = "logs", test))]
    logs_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    meter: Option<Meter>,
}

impl TelemetryConfig {
    /// Creates a configuration with everything disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a structured `tracing` event for every hit and miss.
    #[cfg(any(feature = "logs", test))]
    #[must_use]
    pub fn with_logs(self) -> Self {
        Self {
            logs_enabled: true,
            ..self
        }
    }

    /// Counts hits and misses with an OpenTelemetry counter from `provider`.
    #[cfg(any(feature = "metrics", test))]
    #[must_use]
    pub fn with_metrics(mut self, provider: &dyn MeterProvider) -> Self {
        self.meter = Some(super::metrics::create_meter(provider));
        self
    }

    /// Builds the telemetry inspector.
    #[must_use]
    pub fn build(self) -> LayerTelemetry {
        LayerTelemetry::from_inner(LayerTelemetryInner {
            #[cfg(any(feature = "logs", test))]
            logging_enabled: self.logs_enabled,
            #[cfg(any(feature = "metrics", test))]
            event_counter: self.meter.as_ref().map(super::metrics::create_event_counter),
        })
    }
}
