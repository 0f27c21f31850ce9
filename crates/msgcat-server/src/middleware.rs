//! Response middleware that replaces cataloged error payloads with catalog messages
//!
//! Responses with a 4xx/5xx status whose JSON body names a `catalog` and a
//! `messageCode` (or the legacy `messageNumber`) are resolved through the
//! shared [`MessageCatalogManager`]. The resolved message keeps the original
//! status. If decoding, pre-processing or resolution fails, the response
//! becomes a 500 carrying the original payload without its `stack` field.
//! Every other response passes through untouched.

use crate::preprocess::{BoxError, PreProcessor};
use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{
        header::{ACCEPT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE},
        response::Parts,
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::Response,
};
use msgcat_config::settings::DEFAULT_BODY_LIMIT_BYTES;
use msgcat_core::{locale::from_accept_language, CatalogedError, MessageCatalogManager, ResolvedMessage};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared state for [`format_cataloged_errors`]
#[derive(Clone)]
pub struct FormatterState {
    manager: Arc<MessageCatalogManager>,
    pre_processor: Option<Arc<dyn PreProcessor>>,
    body_limit: usize,
}

impl FormatterState {
    pub fn new(manager: Arc<MessageCatalogManager>) -> Self {
        Self {
            manager,
            pre_processor: None,
            body_limit: DEFAULT_BODY_LIMIT_BYTES,
        }
    }

    /// Run `pre_processor` on every cataloged error before formatting
    pub fn with_pre_processor(mut self, pre_processor: impl PreProcessor + 'static) -> Self {
        self.pre_processor = Some(Arc::new(pre_processor));
        self
    }

    /// Bodies larger than `limit` bytes are not inspected
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn manager(&self) -> &MessageCatalogManager {
        &self.manager
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    async fn format(&self, payload: &Value, locale: Option<&str>) -> Result<ResolvedMessage, BoxError> {
        let mut error = CatalogedError::from_payload(payload)?;

        if let Some(pre_processor) = &self.pre_processor {
            error = pre_processor.pre_process(error).resolve().await?;
        }

        Ok(self.manager.get_cataloged_error_message_in(&error, locale)?)
    }
}

impl std::fmt::Debug for FormatterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterState")
            .field("manager", &self.manager)
            .field("pre_processor", &self.pre_processor.is_some())
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`
pub async fn format_cataloged_errors(
    State(state): State<FormatterState>,
    request: Request,
    next: Next,
) -> Response {
    let locale = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(from_accept_language);

    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let within_limit = response
        .body()
        .size_hint()
        .upper()
        .is_some_and(|upper| upper <= state.body_limit as u64);
    if !within_limit {
        debug!("Skipping error body without a known size within {} bytes", state.body_limit);
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, state.body_limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Failed to read error response body: {}", err);
            let mut parts = parts;
            parts.status = StatusCode::INTERNAL_SERVER_ERROR;
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let payload = match serde_json::from_slice::<Value>(&bytes) {
        Ok(payload) if payload.is_object() && CatalogedError::looks_cataloged(&payload) => payload,
        _ => return Response::from_parts(parts, Body::from(bytes)),
    };

    match state.format(&payload, locale.as_deref()).await {
        Ok(resolved) => match serde_json::to_vec(&resolved) {
            Ok(json) => json_response(parts, status, Bytes::from(json)),
            Err(err) => {
                warn!("Failed to serialize resolved message: {}", err);
                fallback_response(parts, payload)
            }
        },
        Err(err) => {
            warn!("Failed to format cataloged error: {}", err);
            fallback_response(parts, payload)
        }
    }
}

/// 500 carrying `payload` without its `stack` field
fn fallback_response(parts: Parts, mut payload: Value) -> Response {
    if let Some(object) = payload.as_object_mut() {
        object.remove("stack");
    }
    let json = serde_json::to_vec(&payload).unwrap_or_default();
    json_response(parts, StatusCode::INTERNAL_SERVER_ERROR, Bytes::from(json))
}

fn json_response(mut parts: Parts, status: StatusCode, body: Bytes) -> Response {
    parts.status = status;
    parts.headers.remove(CONTENT_LENGTH);
    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Response::from_parts(parts, Body::from(body))
}
