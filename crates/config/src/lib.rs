//! Configuration management for the honeypot agent
//!
//! Supports loading configuration from:
//! - YAML/TOML files (config/default, config/{env})
//! - Environment variables (HONEYPOT__ prefix, `__` separator)
//! - Optional YAML tables for personas and question templates

pub mod engine;
pub mod personas;
pub mod settings;
pub mod templates;

pub use engine::EngineConfig;
pub use personas::PersonasConfig;
pub use settings::{
    load_settings, AuthConfig, ObservabilityConfig, RuntimeEnvironment, ServerConfig, Settings,
};
pub use templates::QuestionTemplates;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

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

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Read a YAML file into any deserializable table
pub(crate) fn read_yaml<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Ok(serde_yaml::from_str(&content)?)
}
