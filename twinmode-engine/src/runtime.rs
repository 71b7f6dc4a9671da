// twinmode-engine/src/runtime.rs

/*!
# Runtime

Entry points that wire live collaborators together and run a server until
it fails. Front ends (the CLI) call these with a loaded configuration.
*/

use std::sync::Arc;

use tracing::{info, instrument};

use twinmode_config::TwinmodeConfig;
use twinmode_telemetry::{Fields, Log, MetricsRecorder};

use crate::controller::HomePageController;
use crate::error::ServerError;
use crate::server;
use crate::www::RequestContext;

/// Runs the www site on `www.port`, calling the service at
/// `service.host:service.port`.
#[instrument(level = "info", name = "run_www", skip_all, fields(port = config.www.port))]
pub async fn run_www(config: &TwinmodeConfig) -> Result<(), ServerError> {
    let log = Log::create();
    let metrics = MetricsRecorder::new();
    let controller = HomePageController::create(&config.service).with_metrics(metrics.clone());
    let context = RequestContext::new(config.service.port, log.clone());

    let listener = server::bind(config.www.port).await?;
    log.info(
        Fields::message("www server started")
            .with("port", config.www.port)
            .with("servicePort", config.service.port)
            .with("timeoutInMs", config.service.timeout_ms),
    );

    let app = server::www::router(Arc::new(controller), context, metrics);
    server::serve(listener, app).await
}

/// Runs the ROT-13 service on `service.port`.
#[instrument(level = "info", name = "run_rot13", skip_all, fields(port = config.service.port))]
pub async fn run_rot13(config: &TwinmodeConfig) -> Result<(), ServerError> {
    let listener = server::bind(config.service.port).await?;
    info!("ROT-13 service started");
    server::serve(listener, server::rot13::router()).await
}
