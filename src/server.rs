use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::net::TcpListener;

use crate::dispatcher::Dispatcher;
use crate::domain::webhook::parse_webhook_event;
use crate::error::SignatureError;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
pub const EVENT_HEADER: &str = "x-github-event";
pub const DELIVERY_HEADER: &str = "x-github-delivery";

type HmacSha256 = Hmac<Sha256>;

/// Shared by every request on the webhook router.
pub struct WebhookState {
    pub dispatcher: Arc<Dispatcher>,
    pub secret: String,
}

/// Check a `sha256=<hex>` header against the HMAC of the raw body.
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;
    let hex_digest = header
        .trim()
        .strip_prefix("sha256=")
        .ok_or(SignatureError::UnsupportedScheme)?;
    let expected = hex::decode(hex_digest).map_err(|_| SignatureError::NotHex)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Mismatch)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub fn build_webhook_router(state: WebhookState, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(receive_delivery))
        .route("/healthz", get(healthz))
        .with_state(Arc::new(state))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn receive_delivery(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let delivery = header_str(&headers, DELIVERY_HEADER).unwrap_or("-");

    if let Err(err) = verify_signature(&state.secret, &body, header_str(&headers, SIGNATURE_HEADER))
    {
        tracing::warn!(delivery, error = %err, "rejected webhook delivery");
        return (StatusCode::UNAUTHORIZED, "invalid signature").into_response();
    }

    let event_name = header_str(&headers, EVENT_HEADER).unwrap_or_default();
    match parse_webhook_event(event_name, &body) {
        Ok(Some(event)) => {
            tracing::info!(
                delivery,
                event = event.name(),
                repo = %event.repo().full_name(),
                issue = event.issue().number,
                actor = event.actor(),
                "webhook accepted"
            );
            let dispatcher = state.dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.handle(event).await;
            });
            (StatusCode::ACCEPTED, "accepted").into_response()
        }
        Ok(None) => {
            tracing::debug!(delivery, event = event_name, "webhook ignored");
            (StatusCode::OK, "ignored").into_response()
        }
        Err(err) => {
            tracing::warn!(delivery, event = event_name, error = %err, "malformed webhook payload");
            (StatusCode::BAD_REQUEST, "invalid payload").into_response()
        }
    }
}

pub async fn run_webhook_server(bind: &str, webhook_path: &str, state: WebhookState) -> Result<()> {
    let bind_addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{bind}': expected host:port"))?;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind webhook server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to resolve webhook listen address")?;
    tracing::info!(addr = %local_addr, path = webhook_path, "webhook server listening");

    let app = build_webhook_router(state, webhook_path);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Webhook server exited unexpectedly")?;
    tracing::info!("webhook server stopped");
    Ok(())
}
