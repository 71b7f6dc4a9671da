//! Front-end server configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// The "www" server that renders the home page.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct WwwConfig {
    /// Port the home page is served on.
    #[serde(default = "default_port")]
    #[validate(custom(function = validation::validate_port))]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for WwwConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}
