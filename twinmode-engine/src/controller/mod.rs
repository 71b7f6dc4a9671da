//! Request handlers for the www front end.

mod home_page;

use async_trait::async_trait;

use crate::www::{RequestContext, WwwRequest, WwwResponse};

pub use home_page::{HomePageController, DEFAULT_TIMEOUT_MS, ERROR_FALLBACK, TIMEOUT_FALLBACK};

#[async_trait]
pub trait Controller: Send + Sync {
    /// Handles a GET of the controller's path.
    async fn get(&self, request: &WwwRequest, context: &RequestContext) -> WwwResponse;

    /// Handles a POST of the controller's path. Never fails; degraded outcomes
    /// are rendered as ordinary responses.
    async fn post(&self, request: &WwwRequest, context: &RequestContext) -> WwwResponse;
}
