//! The ROT-13 service: `POST /rot13/transform` with `{"text": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use tracing::{debug, warn};

use twinmode_client::wire::{ErrorResponse, TransformRequest, TransformResponse, TRANSFORM_PATH};

use crate::rot13;

pub fn router() -> Router {
    Router::new()
        .route(TRANSFORM_PATH, post(transform))
        .fallback(not_found)
}

async fn transform(body: Bytes) -> Response {
    match serde_json::from_slice::<TransformRequest>(&body) {
        Ok(request) => {
            debug!(len = request.text.len(), "transforming");
            let transformed = rot13::transform(&request.text);
            (StatusCode::OK, Json(TransformResponse { transformed })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "rejecting malformed transform request");
            error_response(StatusCode::BAD_REQUEST, format!("invalid request: {e}"))
        }
    }
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found".to_string())
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
