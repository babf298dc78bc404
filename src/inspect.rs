//! Diagnostic receiver: logs what GitHub sends and acknowledges everything.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::routing::post;
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::server::{DELIVERY_HEADER, EVENT_HEADER};

#[derive(Debug, Default, Deserialize)]
struct Probe {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    issue: Option<ProbeIssue>,
    #[serde(default)]
    repository: Option<ProbeRepository>,
}

#[derive(Debug, Deserialize)]
struct ProbeIssue {
    number: u64,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeRepository {
    full_name: String,
}

/// One-line summary of a delivery, tolerant of any payload shape.
pub fn describe_delivery(event: Option<&str>, body: &[u8]) -> String {
    let probe: Probe = serde_json::from_slice(body).unwrap_or_default();
    let mut line = format!(
        "event={} action={}",
        event.unwrap_or("-"),
        probe.action.as_deref().unwrap_or("-")
    );
    if let Some(repo) = probe.repository {
        line.push_str(&format!(" repo={}", repo.full_name));
    }
    if let Some(issue) = probe.issue {
        line.push_str(&format!(" issue=#{}", issue.number));
        if let Some(title) = issue.title {
            line.push_str(&format!(" title={title:?}"));
        }
    }
    line
}

async fn log_delivery(headers: HeaderMap, body: Bytes) -> &'static str {
    let event = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok());
    let delivery = headers
        .get(DELIVERY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info!(delivery, bytes = body.len(), "{}", describe_delivery(event, &body));
    "OK"
}

pub fn build_inspect_router() -> Router {
    Router::new().route("/", post(log_delivery))
}

pub async fn run_inspect_server(bind: &str) -> Result<()> {
    let bind_addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{bind}': expected host:port"))?;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind inspect server on {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "inspect server listening");

    axum::serve(listener, build_inspect_router())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Inspect server exited unexpectedly")?;
    Ok(())
}
