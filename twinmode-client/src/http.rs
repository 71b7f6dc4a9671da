//! Live transport: one JSON POST per transform.

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::error::OperationError;
use crate::wire::{TransformRequest, TransformResponse, TRANSFORM_PATH};

#[derive(Clone)]
pub(crate) struct HttpTransport {
    client: Client,
    host: String,
}

impl HttpTransport {
    pub fn new(host: String) -> Self {
        Self {
            client: Client::new(),
            host,
        }
    }

    #[instrument(skip(self, text), fields(host = %self.host))]
    pub async fn transform(self, port: u16, text: String) -> Result<String, OperationError> {
        let url = format!("http://{}:{}{}", self.host, port, TRANSFORM_PATH);
        debug!(%url, "sending transform request");

        let response = self
            .client
            .post(&url)
            .json(&TransformRequest { text })
            .send()
            .await
            .map_err(|e| OperationError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(OperationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: TransformResponse = response
            .json()
            .await
            .map_err(|e| OperationError::Decode(e.to_string()))?;
        Ok(body.transformed)
    }
}
