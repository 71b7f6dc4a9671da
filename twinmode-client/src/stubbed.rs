//! Null transport: a fixed script of outcomes consumed one per call.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Response returned when a null client runs past its configured outcomes.
pub const DEFAULT_RESPONSE: &str = "Null TransformClient response";

/// What the Nth call to a null client does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubbedOutcome {
    Success(String),
    Error(String),
    /// Never settles, even when cancelled.
    Hang,
}

impl Default for StubbedOutcome {
    fn default() -> Self {
        StubbedOutcome::Success(DEFAULT_RESPONSE.to_string())
    }
}

impl StubbedOutcome {
    pub fn success(value: impl Into<String>) -> Self {
        StubbedOutcome::Success(value.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        StubbedOutcome::Error(message.into())
    }
}

#[derive(Debug, Default)]
pub(crate) struct StubbedResponses {
    outcomes: Vec<StubbedOutcome>,
    next: AtomicUsize,
}

impl StubbedResponses {
    pub fn new(outcomes: Vec<StubbedOutcome>) -> Self {
        Self {
            outcomes,
            next: AtomicUsize::new(0),
        }
    }

    /// The outcome for the next call, or the default once the script runs out.
    pub fn next_outcome(&self) -> StubbedOutcome {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.outcomes.get(index).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_outcomes_in_order_then_defaults() {
        let responses = StubbedResponses::new(vec![
            StubbedOutcome::success("one"),
            StubbedOutcome::Hang,
        ]);
        assert_eq!(responses.next_outcome(), StubbedOutcome::success("one"));
        assert_eq!(responses.next_outcome(), StubbedOutcome::Hang);
        assert_eq!(responses.next_outcome(), StubbedOutcome::default());
        assert_eq!(responses.next_outcome(), StubbedOutcome::success(DEFAULT_RESPONSE));
    }
}
