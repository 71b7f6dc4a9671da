//! ## twinmode-telemetry::logging
//! **Structured application log with a null mode**
//!
//! `Log` is what request handlers write to. The live variant forwards to
//! `tracing`; the null variant discards. Both emit every `LogRecord` to an
//! output listener so tests can assert exactly what was logged.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt as subscriber_fmt, EnvFilter};

use twinmode_core::{OutputListener, OutputTracker};

/// Installs the process-wide `tracing` subscriber. `RUST_LOG` takes
/// precedence over `default_level`.
#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    pub fn init(default_level: &str) {
        subscriber_fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .init()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Monitor,
    Emergency,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Info => "info",
            LogLevel::Monitor => "monitor",
            LogLevel::Emergency => "emergency",
        };
        f.write_str(name)
    }
}

/// One loggable event: a message plus open-ended structured fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub fields: BTreeMap<String, Value>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Captures an error by its `Display` text so records compare by value.
    pub fn with_error(self, key: impl Into<String>, error: &dyn std::error::Error) -> Self {
        self.with(key, error.to_string())
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Fields accumulated before the level is known; turned into a `LogRecord`
/// by `Log::info`, `Log::monitor` or `Log::emergency`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    message: String,
    fields: BTreeMap<String, Value>,
}

impl Fields {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_error(self, key: impl Into<String>, error: &dyn std::error::Error) -> Self {
        self.with(key, error.to_string())
    }

    fn at(self, level: LogLevel) -> LogRecord {
        LogRecord {
            level,
            message: self.message,
            fields: self.fields,
        }
    }
}

/// Application log, live or null.
#[derive(Clone)]
pub struct Log {
    live: bool,
    listener: OutputListener<LogRecord>,
}

impl Log {
    /// Log that writes through `tracing`.
    pub fn create() -> Self {
        Self {
            live: true,
            listener: OutputListener::new(),
        }
    }

    /// Log that writes nothing. Output is still observable through `track_output`.
    pub fn create_null() -> Self {
        Self {
            live: false,
            listener: OutputListener::new(),
        }
    }

    pub fn info(&self, fields: Fields) {
        self.write(fields.at(LogLevel::Info));
    }

    /// Something unexpected that needs watching but no immediate action.
    pub fn monitor(&self, fields: Fields) {
        self.write(fields.at(LogLevel::Monitor));
    }

    /// Something is broken and needs attention now.
    pub fn emergency(&self, fields: Fields) {
        self.write(fields.at(LogLevel::Emergency));
    }

    pub fn track_output(&self) -> OutputTracker<LogRecord> {
        self.listener.track()
    }

    fn write(&self, record: LogRecord) {
        if self.live {
            let fields = serde_json::to_string(&record.fields).unwrap_or_default();
            match record.level {
                LogLevel::Info => {
                    tracing::info!(severity = %record.level, %fields, "{}", record.message)
                }
                LogLevel::Monitor => {
                    tracing::warn!(severity = %record.level, %fields, "{}", record.message)
                }
                LogLevel::Emergency => {
                    tracing::error!(severity = %record.level, %fields, "{}", record.message)
                }
            }
        }
        self.listener.emit(record);
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log").field("live", &self.live).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn tracks_records_in_order() {
        let log = Log::create_null();
        let output = log.track_output();

        log.monitor(Fields::message("first").with("details", "x"));
        log.emergency(Fields::message("second").with("timeoutInMs", 5000));

        assert_eq!(
            output.data(),
            vec![
                LogRecord::new(LogLevel::Monitor, "first").with("details", "x"),
                LogRecord::new(LogLevel::Emergency, "second").with("timeoutInMs", 5000),
            ]
        );
    }

    #[test]
    fn renders_errors_as_text() {
        let log = Log::create_null();
        let output = log.track_output();
        log.emergency(Fields::message("failed").with_error("error", &Boom));
        assert_eq!(
            output.data()[0].field("error"),
            Some(&Value::from("boom"))
        );
    }

    #[traced_test]
    #[test]
    fn live_log_writes_through_tracing() {
        let log = Log::create();
        let output = log.track_output();
        log.info(Fields::message("server started").with("port", 8080));
        assert!(logs_contain("server started"));
        assert!(logs_contain("\"port\":8080"));
        assert_eq!(output.len(), 1);
    }

    #[traced_test]
    #[test]
    fn null_log_stays_quiet() {
        let log = Log::create_null();
        log.emergency(Fields::message("should not appear"));
        assert!(!logs_contain("should not appear"));
    }
}
