use thiserror::Error;

/// Misuse of the clock primitives. These are programmer errors and are
/// never recovered by the request handling layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("Timer delay must be non-negative, got {0}ms")]
    NegativeDelay(i64),

    #[error("Operation is only available on a null clock")]
    NotNullable,

    #[error("Timers still pending after firing {0}; a timer keeps rescheduling itself")]
    RunawayTimers(usize),

    #[error("Tasks kept waking for {0} scheduler passes without settling")]
    Unsettled(usize),
}
