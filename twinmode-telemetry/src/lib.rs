//! # twinmode Telemetry
//!
//! Crate for structured logging and metrics.

pub mod logging;
pub mod metrics;

pub use logging::{EventLogger, Fields, Log, LogLevel, LogRecord};
pub use metrics::MetricsRecorder;
