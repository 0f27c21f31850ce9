//! Shared logging setup and error types for the message catalog workspace

pub mod error;
pub mod logging;

pub use error::{AppError, Result};
pub use logging::{init_default_logging, init_logging, LoggingConfig};
