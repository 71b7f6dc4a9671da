//! ## twinmode-telemetry::metrics
//! **Prometheus counters for the www front end**

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub requests: IntCounter,
    pub parse_failures: IntCounter,
    pub operation_failures: IntCounter,
    pub operation_timeouts: IntCounter,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    /// # Panics
    /// Only if the static metric descriptors are malformed.
    pub fn new() -> Self {
        let registry = Registry::new();
        let requests = counter(&registry, "twinmode_requests_total", "Home page requests handled");
        let parse_failures = counter(
            &registry,
            "twinmode_parse_failures_total",
            "Form bodies that could not be parsed",
        );
        let operation_failures = counter(
            &registry,
            "twinmode_operation_failures_total",
            "Transform calls that returned an error",
        );
        let operation_timeouts = counter(
            &registry,
            "twinmode_operation_timeouts_total",
            "Transform calls abandoned after the timeout",
        );

        Self {
            registry,
            requests,
            parse_failures,
            operation_failures,
            operation_timeouts,
        }
    }

    /// Renders all metrics in the Prometheus text format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn counter(registry: &Registry, name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("valid counter descriptor");
    registry
        .register(Box::new(counter.clone()))
        .expect("counter registered once");
    counter
}
