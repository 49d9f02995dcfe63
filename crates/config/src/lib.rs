//! Configuration management for the booking assistant
//!
//! Supports loading configuration from:
//! - YAML files under `config/` (`default.yaml`, then `{env}.yaml`)
//! - Environment variables (MEDASSIST__ prefix, `__` separated)
//!
//! Policy values surfaced in replies live in [`constants`] and are not
//! runtime-configurable: they mirror what the appointment and payment
//! services enforce.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, AiConfig, AiProvider, AssistantConfig,
    ClassificationStrategy, DirectoryConfig, ObservabilityConfig, RuntimeEnvironment,
    ServerConfig, SessionConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
