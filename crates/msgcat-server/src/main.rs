//! Main entry point for the message catalog server.

use anyhow::Context;
use clap::Parser;
use msgcat_common::{init_logging, AppError};
use msgcat_config::{ConfigError, ConfigLoader};
use msgcat_core::MessageCatalogManager;
use msgcat_server::{create_router, serve, FormatterState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Serve message catalogs and format cataloged error responses
#[derive(Debug, Parser)]
#[command(name = "msgcat-server", version, about)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog index file, overrides the configuration
    #[arg(short, long, value_name = "FILE")]
    index: Option<String>,

    /// Listen address, overrides the configuration
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(index) = cli.index {
        config.catalog_index = index;
    }
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    config
        .validate_all()
        .map_err(|e| AppError::from(ConfigError::from(e)))?;

    init_logging(&config.logging).map_err(|e| AppError::logging("Failed to initialize logging", e))?;

    info!("Loading catalog index {}", config.catalog_index);
    let manager = MessageCatalogManager::new(config.catalog_index_path())
        .map_err(|e| AppError::catalog_with_source("Failed to load catalogs", e))?;

    let state = FormatterState::new(Arc::new(manager)).with_body_limit(config.body_limit_bytes);
    serve(create_router(state), &config.bind_address).await?;

    Ok(())
}
