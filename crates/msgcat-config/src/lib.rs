//! Configuration management for the message catalog server

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::ServerConfig;
