//! The www site: `GET /` and `POST /` go to the home page controller.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use tracing::{debug, warn};

use twinmode_telemetry::MetricsRecorder;

use crate::controller::Controller;
use crate::www::{RequestContext, WwwRequest, WwwResponse};

#[derive(Clone)]
struct AppState {
    controller: Arc<dyn Controller>,
    context: RequestContext,
    metrics: MetricsRecorder,
}

/// Builds the www router. `GET /metrics` exposes `metrics` in the Prometheus
/// text format.
pub fn router(
    controller: Arc<dyn Controller>,
    context: RequestContext,
    metrics: MetricsRecorder,
) -> Router {
    let state = AppState {
        controller,
        context,
        metrics,
    };

    Router::new()
        .route("/", get(home_get).post(home_post))
        .route("/metrics", get(metrics_get))
        .fallback(not_found)
        .with_state(state)
}

async fn home_get(State(state): State<AppState>) -> WwwResponse {
    debug!("GET /");
    let request = WwwRequest::new(Method::GET, "/", Bytes::new());
    state.controller.get(&request, &state.context).await
}

async fn home_post(State(state): State<AppState>, body: Bytes) -> WwwResponse {
    debug!(len = body.len(), "POST /");
    let request = WwwRequest::new(Method::POST, "/", body);
    state.controller.post(&request, &state.context).await
}

async fn metrics_get(State(state): State<AppState>) -> WwwResponse {
    match state.metrics.gather_metrics() {
        Ok(text) => WwwResponse::plain(StatusCode::OK, text),
        Err(e) => {
            warn!(error = %e, "failed to render metrics");
            WwwResponse::plain(StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable")
        }
    }
}

async fn not_found() -> WwwResponse {
    WwwResponse::plain(StatusCode::NOT_FOUND, "Not found")
}
