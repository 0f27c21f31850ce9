//! Structured logging setup

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

type InitResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "msgcat_core=trace")
    pub level: String,
    /// Emit one JSON object per event
    pub json_format: bool,
    /// Multi-line human readable output
    pub pretty_format: bool,
    /// Whether to include spans in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: false,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Filter built from `level`, or `info` when `level` does not parse
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: &LoggingConfig) -> InitResult {
    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(config.env_filter());

    if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_target(config.include_targets);
        registry.with(layer).try_init()?;
    } else if config.pretty_format {
        let layer = fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_target(config.include_targets);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .compact()
            .with_span_events(span_events)
            .with_target(config.include_targets);
        registry.with(layer).try_init()?;
    }

    Ok(())
}

/// Initialize logging with default configuration
pub fn init_default_logging() -> InitResult {
    init_logging(&LoggingConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(!config.pretty_format);
        assert!(config.include_targets);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LoggingConfig = serde_json::from_str(r#"{"level": "debug"}"#).unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.include_targets);
    }

    #[test]
    fn test_bad_level_falls_back_to_info() {
        let config = LoggingConfig {
            level: "msgcat=verbose".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(
            config.env_filter().max_level_hint(),
            Some(tracing::level_filters::LevelFilter::INFO)
        );
    }
}
