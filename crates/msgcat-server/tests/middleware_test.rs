//! Tests for the cataloged error formatting middleware

use axum::{
    body::{to_bytes, Body},
    http::{header::ACCEPT_LANGUAGE, Request, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use msgcat_core::{CatalogedError, MessageCatalogManager, NamedInserts, PositionalInserts};
use msgcat_server::{create_router, format_cataloged_errors, FormatterState, PreProcessed};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

fn fixture_index() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../msgcat-core/tests/fixtures/catalog-index.json")
}

fn state() -> FormatterState {
    let manager = MessageCatalogManager::new(fixture_index()).unwrap();
    FormatterState::new(Arc::new(manager))
}

fn example_error(code: &str, catalog: &str) -> CatalogedError {
    let mut named = NamedInserts::new();
    named.set("id", "EXAMPLE ID");
    CatalogedError::new(code, catalog, "Example error", named, PositionalInserts::new())
}

async fn ok_text() -> &'static str {
    "TEST MESSAGE"
}

async fn bad_request_text() -> Response {
    (StatusCode::BAD_REQUEST, "TEST MESSAGE").into_response()
}

async fn cataloged() -> Response {
    (StatusCode::BAD_REQUEST, Json(example_error("0002", "exampleLocal"))).into_response()
}

async fn unknown_catalog() -> Response {
    let mut payload = serde_json::to_value(example_error("error", "error")).unwrap();
    payload["stack"] = json!("at handler (src/handlers.rs:12)");
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

async fn legacy() -> Response {
    let payload = json!({
        "messageNumber": "0003",
        "catalog": "exampleLocal",
        "inserts": ["a", 1, true]
    });
    (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
}

async fn cataloged_ok() -> Json<CatalogedError> {
    Json(example_error("0002", "exampleLocal"))
}

fn router(state: FormatterState) -> Router {
    Router::new()
        .route("/ok", get(ok_text))
        .route("/plain-error", get(bad_request_text))
        .route("/cataloged", get(cataloged))
        .route("/cataloged-ok", get(cataloged_ok))
        .route("/unknown", get(unknown_catalog))
        .route("/legacy", get(legacy))
        .layer(middleware::from_fn_with_state(state, format_cataloged_errors))
}

async fn send(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send_request(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn send_request(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn as_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_success_responses_pass_through() {
    let (status, body) = send(router(state()), "/ok").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"TEST MESSAGE");
}

#[tokio::test]
async fn test_cataloged_payload_with_success_status_is_untouched() {
    let (status, body) = send(router(state()), "/cataloged-ok").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["messageCode"], "0002");
}

#[tokio::test]
async fn test_non_cataloged_error_passes_through() {
    let (status, body) = send(router(state()), "/plain-error").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"TEST MESSAGE");
}

#[tokio::test]
async fn test_cataloged_error_is_formatted() {
    let (status, body) = send(router(state()), "/cataloged").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = as_json(&body);
    assert_eq!(body["message"], "This is an example message with a special insert EXAMPLE ID");
    assert_eq!(body["action"], "Check the resource with id EXAMPLE ID");
    assert_eq!(body["detail"], "The resource EXAMPLE ID could not be processed");
    assert!(body.get("messageCode").is_none());
}

#[tokio::test]
async fn test_failure_returns_original_payload_as_500() {
    let (status, body) = send(router(state()), "/unknown").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let expected = serde_json::to_value(example_error("error", "error")).unwrap();
    assert_eq!(as_json(&body), expected);
}

#[tokio::test]
async fn test_legacy_payload_is_formatted() {
    let (status, body) = send(router(state()), "/legacy").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        as_json(&body)["message"],
        "This is an example message with positional inserts a 1 true"
    );
}

#[tokio::test]
async fn test_accept_language_selects_locale() {
    let request = Request::builder()
        .uri("/cataloged")
        .header(ACCEPT_LANGUAGE, "de-DE,de;q=0.9,en;q=0.8")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send_request(router(state()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        as_json(&body)["message"],
        "This is an example message with a special insert EXAMPLE ID, in german locale"
    );
}

#[tokio::test]
async fn test_unknown_language_falls_back_to_default() {
    let request = Request::builder()
        .uri("/cataloged")
        .header(ACCEPT_LANGUAGE, "fr")
        .body(Body::empty())
        .unwrap();

    let (_, body) = send_request(router(state()), request).await;
    assert_eq!(
        as_json(&body)["message"],
        "This is an example message with a special insert EXAMPLE ID"
    );
}

#[tokio::test]
async fn test_immediate_pre_processor_transforms_before_formatting() {
    let state = state().with_pre_processor(|error: CatalogedError| {
        let mut named = error.named_inserts().clone();
        named.set("id", "transformed");
        PreProcessed::ready(error.with_named_inserts(named))
    });

    let (status, body) = send(router(state), "/cataloged").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        as_json(&body)["message"],
        "This is an example message with a special insert transformed"
    );
}

#[tokio::test]
async fn test_deferred_pre_processor_is_awaited() {
    let state = state().with_pre_processor(|error: CatalogedError| {
        PreProcessed::deferred(async move {
            tokio::task::yield_now().await;
            let mut named = NamedInserts::new();
            named.set("id", "looked up");
            Ok(error.with_named_inserts(named))
        })
    });

    let (_, body) = send(router(state), "/cataloged").await;
    assert_eq!(
        as_json(&body)["message"],
        "This is an example message with a special insert looked up"
    );
}

#[tokio::test]
async fn test_failing_pre_processor_yields_500() {
    let state = state().with_pre_processor(|_: CatalogedError| PreProcessed::Immediate(Err("lookup failed".into())));

    let (status, body) = send(router(state), "/cataloged").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(as_json(&body)["messageCode"], "0002");
}

#[tokio::test]
async fn test_oversized_body_passes_through() {
    let state = state().with_body_limit(16);

    let (status, body) = send(router(state), "/cataloged").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(as_json(&body)["messageCode"], "0002");
}

#[tokio::test]
async fn test_demo_router_formats_example_route() {
    let (status, body) = send(create_router(state()), "/example/anything").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        as_json(&body)["message"],
        "This is an example message with a special insert EXAMPLE ID"
    );
}

#[tokio::test]
async fn test_demo_router_health() {
    let (status, body) = send(create_router(state()), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let body = as_json(&body);
    assert_eq!(body["status"], "ok");
    assert!(body["catalogs"]
        .as_array()
        .unwrap()
        .iter()
        .any(|name| name == "exampleLocal"));
}
