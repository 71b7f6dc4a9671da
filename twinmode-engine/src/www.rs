//! Request and response types for the www front end, independent of axum.

use std::borrow::Cow;

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use twinmode_telemetry::Log;

#[derive(Debug, Clone)]
pub struct WwwRequest {
    method: Method,
    path: String,
    body: Bytes,
}

impl WwwRequest {
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.into(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, Bytes::new())
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::POST, path, Bytes::from(body.into()))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw body as text. Invalid UTF-8 is replaced rather than rejected.
    pub fn body(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WwwResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl WwwResponse {
    pub fn html(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8",
            body: body.into(),
        }
    }

    pub fn plain(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }
}

impl IntoResponse for WwwResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// Per-request collaborators handed to a controller. Not changed while the
/// request is being handled.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub service_port: u16,
    pub log: Log,
}

impl RequestContext {
    pub fn new(service_port: u16, log: Log) -> Self {
        Self { service_port, log }
    }
}
