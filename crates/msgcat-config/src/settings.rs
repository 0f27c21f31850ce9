//! Server configuration structures

use msgcat_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::{Validate, ValidationErrors};

/// Default location of the catalog index, relative to the working directory
pub const DEFAULT_CATALOG_INDEX: &str = "catalogs/catalog-index.json";

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Default upper bound on response bodies inspected by the formatter
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Main server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Path to the catalog index file
    #[validate(length(min = 1, message = "Catalog index path cannot be empty"))]
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Catalog index path contains invalid characters"))]
    pub catalog_index: String,

    /// Socket address to listen on
    #[validate(custom(function = "crate::validation::validate_bind_address", message = "Bind address must be host:port"))]
    pub bind_address: String,

    /// Largest response body the error formatter will buffer
    #[validate(range(min = 1024, max = 16777216, message = "Body limit must be between 1 KiB and 16 MiB"))]
    pub body_limit_bytes: usize,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            catalog_index: DEFAULT_CATALOG_INDEX.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Run every validation rule
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }

    /// Catalog index as a path
    pub fn catalog_index_path(&self) -> PathBuf {
        PathBuf::from(&self.catalog_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.catalog_index_path(), PathBuf::from(DEFAULT_CATALOG_INDEX));
    }

    #[test]
    fn test_empty_index_is_rejected() {
        let config = ServerConfig {
            catalog_index: String::new(),
            ..ServerConfig::default()
        };
        let errors = config.validate_all().unwrap_err();
        assert!(errors.field_errors().contains_key("catalog_index"));
    }

    #[test]
    fn test_bad_bind_address_is_rejected() {
        let config = ServerConfig {
            bind_address: "localhost".to_string(),
            ..ServerConfig::default()
        };
        let errors = config.validate_all().unwrap_err();
        assert!(errors.field_errors().contains_key("bind_address"));
    }

    #[test]
    fn test_body_limit_range() {
        let config = ServerConfig {
            body_limit_bytes: 10,
            ..ServerConfig::default()
        };
        assert!(config.validate_all().is_err());
    }
}
