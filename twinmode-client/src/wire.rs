//! JSON bodies exchanged with the ROT-13 service.

use serde::{Deserialize, Serialize};

/// Route the service exposes for transforms.
pub const TRANSFORM_PATH: &str = "/rot13/transform";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub transformed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
