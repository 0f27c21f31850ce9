//! Configuration loading utilities

use crate::ServerConfig;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming a config file
pub const CONFIG_PATH_VAR: &str = "MSGCAT_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for msgcat_common::AppError {
    fn from(err: ConfigError) -> Self {
        msgcat_common::AppError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the server
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig, ConfigError> {
        debug!("Reading configuration from {:?}", path.as_ref());
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: ServerConfig = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from `explicit`, the environment, a default file, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<ServerConfig, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_config(path);
        }

        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Self::load_config(path);
        }

        for candidate in ["msgcat.yaml", "msgcat.yml"] {
            if Path::new(candidate).exists() {
                return Self::load_config(candidate);
            }
        }

        info!("No configuration file found, using defaults");
        let mut config = ServerConfig::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut ServerConfig) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides_from<F>(config: &mut ServerConfig, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(index) = lookup("MSGCAT_CATALOG_INDEX") {
            config.catalog_index = index;
        }

        if let Some(address) = lookup("MSGCAT_BIND_ADDRESS") {
            config.bind_address = address;
        }

        if let Some(limit) = lookup("MSGCAT_BODY_LIMIT") {
            config.body_limit_bytes = limit.parse().map_err(|e| ConfigError::EnvParseError {
                var: "MSGCAT_BODY_LIMIT".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Some(level) = lookup("MSGCAT_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(json) = lookup("MSGCAT_LOG_JSON") {
            config.logging.json_format = json.parse().map_err(|e| ConfigError::EnvParseError {
                var: "MSGCAT_LOG_JSON".to_string(),
                source: Box::new(e),
            })?;
        }

        Ok(())
    }
}
