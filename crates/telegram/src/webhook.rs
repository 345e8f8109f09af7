//! HTTP front door for webhook mode.
//!
//! Telegram POSTs each update to `/webhook/<token>`. Anything that does not
//! match that exact route answers 404, so probing the listener reveals
//! nothing about the token.

use std::sync::Arc;

use {
    axum::{
        Router,
        body::Bytes,
        extract::{Path, State},
        http::{Method, StatusCode},
        response::{IntoResponse, Response},
        routing::{any, get},
    },
    daylog_channels::ChannelEventSink,
    secrecy::{ExposeSecret, Secret},
    teloxide::types::Update,
    tracing::{debug, warn},
};

use crate::handlers;

#[derive(Clone)]
struct WebhookState {
    token: Arc<Secret<String>>,
    sink: Arc<dyn ChannelEventSink>,
}

/// Routes: `POST /webhook/{token}` and `GET /health`.
pub fn webhook_router(token: Secret<String>, sink: Arc<dyn ChannelEventSink>) -> Router {
    let state = WebhookState {
        token: Arc::new(token),
        sink,
    };
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook/{token}", any(webhook_handler))
        .fallback(not_found)
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

async fn webhook_handler(
    State(state): State<WebhookState>,
    Path(token): Path<String>,
    method: Method,
    body: Bytes,
) -> Response {
    if method != Method::POST || !constant_time_eq(&token, state.token.expose_secret()) {
        debug!(%method, "rejected webhook request");
        return not_found().await;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            debug!(error = %e, "webhook body is not a telegram update");
            return (StatusCode::BAD_REQUEST, "invalid update").into_response();
        },
    };

    match handlers::handle_update(update, state.sink.as_ref()).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            warn!(error = %e, "dropping webhook update");
            (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
        },
    }
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
