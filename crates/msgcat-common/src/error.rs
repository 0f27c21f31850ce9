//! Application-level error type

use thiserror::Error;

/// Result type alias for application startup and serving
pub type Result<T> = std::result::Result<T, AppError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the server from starting or serving
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Catalogs could not be loaded
    #[error("Catalog error: {message}")]
    Catalog {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Logging could not be initialized
    #[error("Logging error: {message}")]
    Logging {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Listener or server failure
    #[error("Server error: {message}")]
    Server {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl AppError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new catalog error with source
    pub fn catalog_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Catalog {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new logging error from a boxed source
    pub fn logging(msg: impl Into<String>, source: BoxedSource) -> Self {
        Self::Logging {
            message: msg.into(),
            source: Some(source),
        }
    }

    /// Create a new server error with source
    pub fn server_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Server {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }
}
