//! # twinmode Configuration
//!
//! Hierarchical configuration for the www front end and the ROT-13 service.
//!
//! Hierarchy (later wins):
//! 1. Default values
//! 2. `config/twinmode.yaml`, if present
//! 3. `config/<TWINMODE_ENV>.yaml`, if present
//! 4. `TWINMODE_*` environment variables, `__` separating nested keys

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod service;
mod telemetry;
mod validation;
mod www;

pub use error::ConfigError;
pub use service::ServiceConfig;
pub use telemetry::TelemetryConfig;
pub use www::WwwConfig;

const BASE_FILE: &str = "config/twinmode.yaml";
const ENV_PREFIX: &str = "TWINMODE_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct TwinmodeConfig {
    /// Front-end server.
    #[serde(default)]
    #[validate(nested)]
    pub www: WwwConfig,

    /// Transform service location and call timeout.
    #[serde(default)]
    #[validate(nested)]
    pub service: ServiceConfig,

    /// Logging.
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl TwinmodeConfig {
    /// Load configuration from the default files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(TwinmodeConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("TWINMODE_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file, with environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Self::extract(
            Figment::from(Serialized::defaults(TwinmodeConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
