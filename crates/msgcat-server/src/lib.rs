//! HTTP boundary for message catalogs
//!
//! Provides an `axum` middleware that turns cataloged error responses into
//! resolved catalog messages, plus the router used by the `msgcat-server`
//! binary.

pub mod app;
pub mod middleware;
pub mod preprocess;

pub use app::{create_router, serve, HealthResponse};
pub use middleware::{format_cataloged_errors, FormatterState};
pub use preprocess::{BoxError, PreProcessResult, PreProcessed, PreProcessor};
