//! Router and server startup

use crate::middleware::{format_cataloged_errors, FormatterState};
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use msgcat_common::{AppError, Result};
use msgcat_core::{CatalogedError, NamedInserts, PositionalInserts};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Catalog names from the loaded index
    pub catalogs: Vec<String>,
}

/// Create the router with the cataloged error formatter applied to every route
pub fn create_router(state: FormatterState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/example/*path", get(example_error))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn_with_state(state.clone(), format_cataloged_errors)),
        )
        .with_state(state)
}

async fn health(State(state): State<FormatterState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        catalogs: state.manager().store().catalog_names().map(str::to_string).collect(),
    })
}

/// Always fails with code `0002` from `exampleLocal`
async fn example_error() -> Response {
    let mut named = NamedInserts::new();
    named.set("id", "EXAMPLE ID");

    let error = CatalogedError::new("0002", "exampleLocal", "Example error", named, PositionalInserts::new());
    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

/// Serve `router` on `bind_address` until Ctrl+C
pub async fn serve(router: Router, bind_address: &str) -> Result<()> {
    info!("Starting message catalog server on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| AppError::server_with_source(format!("Failed to bind {bind_address}"), e))?;

    info!("Message catalog server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::server_with_source("Server stopped with an error", e))?;

    info!("Message catalog server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unbindable_address_is_a_server_error() {
        let err = serve(Router::new(), "not an address").await.unwrap_err();
        assert!(matches!(err, AppError::Server { .. }));
        assert_eq!(err.to_string(), "Server error: Failed to bind not an address");
    }
}
