//! Transform service configuration.
//!
//! Shared by the ROT-13 service (which listens on `port`) and the www front
//! end (which calls it and gives up after `timeout_ms`).

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ServiceConfig {
    /// Host the service is reached at.
    #[serde(default = "default_host")]
    #[validate(length(min = 1, max = 253))]
    pub host: String,

    /// Port the service listens on.
    #[serde(default = "default_port")]
    #[validate(custom(function = validation::validate_port))]
    pub port: u16,

    /// How long the front end waits for a transform before falling back.
    #[serde(default = "default_timeout_ms")]
    #[validate(range(min = 1, max = 600000))]
    pub timeout_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8081
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
