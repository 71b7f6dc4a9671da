//! ## twinmode-client::client
//! **Transform client with a live and a null transport**
//!
//! `invoke` never blocks: it hands back the pending response and a cancel
//! handle so the caller can race the call against a timeout and abandon it.

use std::fmt;
use std::sync::Arc;

use futures::future::{self, AbortHandle, Aborted, BoxFuture};
use futures::FutureExt;
use tracing::debug;

use twinmode_core::{OutputListener, OutputTracker};

use crate::error::OperationError;
use crate::http::HttpTransport;
use crate::stubbed::{StubbedOutcome, StubbedResponses};

/// One observable call or cancellation, as recorded by `track_calls`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub port: u16,
    pub text: String,
    pub cancelled: bool,
}

impl OperationRecord {
    pub fn call(port: u16, text: impl Into<String>) -> Self {
        Self {
            port,
            text: text.into(),
            cancelled: false,
        }
    }

    pub fn cancellation(port: u16, text: impl Into<String>) -> Self {
        Self {
            cancelled: true,
            ..Self::call(port, text)
        }
    }
}

/// Pending result of one call plus the means to cancel it.
pub struct OperationHandle {
    pub response: BoxFuture<'static, Result<String, OperationError>>,
    pub cancel: CancelHandle,
}

impl fmt::Debug for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationHandle")
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

/// Fire-and-forget cancellation. Each call records a cancellation; a live
/// call is also aborted, while a null call keeps whatever outcome it had.
#[derive(Clone)]
pub struct CancelHandle {
    record: OperationRecord,
    listener: OutputListener<OperationRecord>,
    abort: Option<AbortHandle>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        debug!(port = self.record.port, "cancelling transform call");
        self.listener.emit(OperationRecord::cancellation(
            self.record.port,
            self.record.text.clone(),
        ));
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("record", &self.record)
            .field("aborts", &self.abort.is_some())
            .finish()
    }
}

#[derive(Clone)]
enum Transport {
    Http(HttpTransport),
    Stubbed(Arc<StubbedResponses>),
}

/// Client for the ROT-13 transform service.
#[derive(Clone)]
pub struct TransformClient {
    transport: Transport,
    listener: OutputListener<OperationRecord>,
}

impl TransformClient {
    /// Client that calls the service over HTTP at `host`.
    pub fn create(host: impl Into<String>) -> Self {
        Self {
            transport: Transport::Http(HttpTransport::new(host.into())),
            listener: OutputListener::new(),
        }
    }

    /// Null client whose every call succeeds with the default response.
    pub fn create_null() -> Self {
        Self::create_null_with(Vec::new())
    }

    /// Null client whose Nth call follows the Nth outcome. Calls beyond the
    /// end of the list succeed with the default response.
    pub fn create_null_with(outcomes: impl IntoIterator<Item = StubbedOutcome>) -> Self {
        Self {
            transport: Transport::Stubbed(Arc::new(StubbedResponses::new(
                outcomes.into_iter().collect(),
            ))),
            listener: OutputListener::new(),
        }
    }

    /// Records every subsequent call and cancellation, in order.
    pub fn track_calls(&self) -> OutputTracker<OperationRecord> {
        self.listener.track()
    }

    /// Starts a transform of `text` on the service at `port`.
    pub fn invoke(&self, port: u16, text: &str) -> OperationHandle {
        let record = OperationRecord::call(port, text);
        self.listener.emit(record.clone());

        let (response, abort) = match &self.transport {
            Transport::Http(http) => {
                let (call, abort) = future::abortable(http.clone().transform(port, text.to_string()));
                let response = call
                    .map(|outcome| match outcome {
                        Ok(result) => result,
                        Err(Aborted) => Err(OperationError::Cancelled),
                    })
                    .boxed();
                (response, Some(abort))
            }
            Transport::Stubbed(responses) => {
                let response = match responses.next_outcome() {
                    StubbedOutcome::Success(value) => future::ready(Ok(value)).boxed(),
                    StubbedOutcome::Error(message) => {
                        future::ready(Err(OperationError::Stubbed(message))).boxed()
                    }
                    StubbedOutcome::Hang => future::pending().boxed(),
                };
                (response, None)
            }
        };

        OperationHandle {
            response,
            cancel: CancelHandle {
                record,
                listener: self.listener.clone(),
                abort,
            },
        }
    }
}

impl fmt::Debug for TransformClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.transport {
            Transport::Http(_) => "live",
            Transport::Stubbed(_) => "null",
        };
        f.debug_struct("TransformClient").field("mode", &mode).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stubbed::DEFAULT_RESPONSE;
    use futures::poll;
    use std::task::Poll;

    #[tokio::test]
    async fn records_calls_exactly_as_passed() {
        let client = TransformClient::create_null();
        let calls = client.track_calls();

        client.invoke(999, "hello world");
        client.invoke(1, "  Mixed CASE  ");

        assert_eq!(
            calls.data(),
            vec![
                OperationRecord::call(999, "hello world"),
                OperationRecord::call(1, "  Mixed CASE  "),
            ]
        );
    }

    #[tokio::test]
    async fn calls_before_tracking_are_not_recorded() {
        let client = TransformClient::create_null();
        client.invoke(1, "early");
        let calls = client.track_calls();
        client.invoke(2, "late");
        assert_eq!(calls.data(), vec![OperationRecord::call(2, "late")]);
    }

    #[tokio::test]
    async fn follows_configured_outcomes_then_defaults() {
        let client = TransformClient::create_null_with([
            StubbedOutcome::success("first"),
            StubbedOutcome::error("boom"),
        ]);

        assert_eq!(client.invoke(1, "a").response.await, Ok("first".to_string()));
        assert_eq!(
            client.invoke(1, "b").response.await,
            Err(OperationError::Stubbed("boom".to_string()))
        );
        assert_eq!(
            client.invoke(1, "c").response.await,
            Ok(DEFAULT_RESPONSE.to_string())
        );
    }

    #[tokio::test]
    async fn stubbed_error_displays_configured_text() {
        let client = TransformClient::create_null_with([StubbedOutcome::error("boom")]);
        let error = client.invoke(1, "a").response.await.unwrap_err();
        assert_eq!(error.to_string(), "boom");
    }

    #[tokio::test]
    async fn hang_stays_pending_after_cancel() {
        let client = TransformClient::create_null_with([StubbedOutcome::Hang]);
        let calls = client.track_calls();

        let OperationHandle {
            mut response,
            cancel,
        } = client.invoke(42, "text");
        assert_eq!(poll!(&mut response), Poll::Pending);

        cancel.cancel();
        tokio::task::yield_now().await;
        assert_eq!(poll!(&mut response), Poll::Pending);

        assert_eq!(
            calls.data(),
            vec![
                OperationRecord::call(42, "text"),
                OperationRecord::cancellation(42, "text"),
            ]
        );
    }

    #[tokio::test]
    async fn each_cancel_is_recorded_after_its_call() {
        let client = TransformClient::create_null();
        let calls = client.track_calls();

        let first = client.invoke(1, "one");
        first.cancel.cancel();
        let second = client.invoke(2, "two");
        second.cancel.cancel();
        second.cancel.cancel();

        assert_eq!(
            calls.data(),
            vec![
                OperationRecord::call(1, "one"),
                OperationRecord::cancellation(1, "one"),
                OperationRecord::call(2, "two"),
                OperationRecord::cancellation(2, "two"),
                OperationRecord::cancellation(2, "two"),
            ]
        );
    }

    #[tokio::test]
    async fn live_call_reports_unreachable_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = TransformClient::create("127.0.0.1");
        let result = client.invoke(port, "text").response.await;
        assert!(matches!(result, Err(OperationError::Transport(_))), "{result:?}");
    }

    #[tokio::test]
    async fn live_cancel_aborts_in_flight_call() {
        // Accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = TransformClient::create("127.0.0.1");
        let calls = client.track_calls();
        let OperationHandle { response, cancel } = client.invoke(port, "text");
        let response = tokio::spawn(response);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        cancel.cancel();
        assert_eq!(response.await.unwrap(), Err(OperationError::Cancelled));
        assert_eq!(calls.len(), 2);
    }
}
