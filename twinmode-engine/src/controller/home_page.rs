//! Home page: reads the `text` field, asks the ROT-13 service to transform
//! it, and renders the result. A slow service is cancelled after the timeout
//! and a failing one is reported in the log; the user gets fallback text
//! either way.

use std::future;

use async_trait::async_trait;
use tracing::{debug, instrument};

use twinmode_client::{OperationError, OperationHandle, TransformClient};
use twinmode_config::ServiceConfig;
use twinmode_core::Clock;
use twinmode_telemetry::{Fields, MetricsRecorder};

use super::Controller;
use crate::form::parse_form_field;
use crate::view::home_page_view;
use crate::www::{RequestContext, WwwRequest, WwwResponse};

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Shown when the service does not answer before the timeout.
pub const TIMEOUT_FALLBACK: &str = "ROT-13 service timed out";

/// Shown when the service answers with an error.
pub const ERROR_FALLBACK: &str = "ROT-13 service failed";

const TEXT_FIELD: &str = "text";

#[derive(Debug, Clone)]
pub struct HomePageController {
    client: TransformClient,
    clock: Clock,
    timeout_ms: u64,
    metrics: MetricsRecorder,
}

impl HomePageController {
    pub fn new(client: TransformClient, clock: Clock, timeout_ms: u64) -> Self {
        Self {
            client,
            clock,
            timeout_ms,
            metrics: MetricsRecorder::new(),
        }
    }

    /// Live controller talking to the service described by `config`.
    pub fn create(config: &ServiceConfig) -> Self {
        Self::new(
            TransformClient::create(config.host.clone()),
            Clock::create(),
            config.timeout_ms,
        )
    }

    /// Controller built on a null client and a null clock, with the default
    /// timeout.
    pub fn create_null(client: TransformClient, clock: Clock) -> Self {
        Self::new(client, clock, DEFAULT_TIMEOUT_MS)
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Transforms `text`, giving up after the configured timeout.
    async fn transform(&self, text: &str, context: &RequestContext) -> Result<String, OperationError> {
        let OperationHandle {
            mut response,
            cancel,
        } = self.client.invoke(context.service_port, text);

        let on_timeout = {
            let log = context.log.clone();
            let metrics = self.metrics.clone();
            let timeout_ms = self.timeout_ms;
            move || {
                log.emergency(
                    Fields::message("ROT-13 service timed out").with("timeoutInMs", timeout_ms),
                );
                metrics.operation_timeouts.inc();
                cancel.cancel();
                future::ready(Ok(TIMEOUT_FALLBACK.to_string()))
            }
        };

        self.clock
            .race_with_timeout(self.timeout_ms, &mut response, on_timeout)
            .await
    }
}

#[async_trait]
impl Controller for HomePageController {
    async fn get(&self, _request: &WwwRequest, _context: &RequestContext) -> WwwResponse {
        home_page_view(None)
    }

    #[instrument(skip_all, fields(service_port = context.service_port))]
    async fn post(&self, request: &WwwRequest, context: &RequestContext) -> WwwResponse {
        self.metrics.requests.inc();
        let body = request.body().into_owned();

        let text = match parse_form_field(&body, TEXT_FIELD) {
            Ok(text) => text,
            Err(error) => {
                context.log.monitor(
                    Fields::message("form parse error")
                        .with("details", error.to_string())
                        .with("body", body),
                );
                self.metrics.parse_failures.inc();
                return home_page_view(None);
            }
        };

        match self.transform(&text, context).await {
            Ok(output) => {
                debug!(len = output.len(), "rendering transformed text");
                home_page_view(Some(&output))
            }
            Err(error) => {
                context
                    .log
                    .emergency(Fields::message("ROT-13 service error").with_error("error", &error));
                self.metrics.operation_failures.inc();
                home_page_view(Some(ERROR_FALLBACK))
            }
        }
    }
}
