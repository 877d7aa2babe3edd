//! # Webhook Transport
//!
//! An axum server receiving updates pushed by Telegram. Updates are
//! acknowledged immediately and processed on a spawned task, so a slow Jira
//! never makes Telegram retry the delivery.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::api::BotApi;
use super::types::Update;
use super::updates::handle_update;
use crate::dispatch::Dispatcher;

/// Header Telegram uses to echo the webhook secret token
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Shared state of the webhook server
#[derive(Clone)]
pub struct WebhookState {
  pub api: BotApi,
  pub dispatcher: Arc<Dispatcher>,
  pub secret: Option<String>,
}

/// Build the webhook router with the update route mounted at `path`
pub fn router(state: WebhookState, path: &str) -> Router {
  Router::new()
    .route("/", get(handle_status))
    .route("/health", get(handle_health))
    .route(path, post(handle_webhook))
    .with_state(state)
}

async fn handle_status() -> impl IntoResponse {
  Json(json!({ "status": "ok", "service": env!("CARGO_PKG_NAME") }))
}

async fn handle_health() -> impl IntoResponse {
  Json(json!({ "status": "healthy" }))
}

async fn handle_webhook(State(state): State<WebhookState>, headers: HeaderMap, body: String) -> impl IntoResponse {
  if let Some(expected) = state.secret.as_deref() {
    let observed = headers
      .get(SECRET_HEADER)
      .and_then(|value| value.to_str().ok())
      .unwrap_or_default();
    if !secret_matches(expected.as_bytes(), observed.as_bytes()) {
      warn!("Rejected webhook call with a bad secret token");
      return (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false, "error": "invalid secret token" })));
    }
  }

  let update = match serde_json::from_str::<Update>(&body) {
    Ok(update) => update,
    Err(error) => {
      debug!("Malformed webhook payload: {}", error);
      return (StatusCode::BAD_REQUEST, Json(json!({ "ok": false, "error": "malformed update" })));
    }
  };

  tokio::spawn(async move {
    handle_update(&state.api, &state.dispatcher, update).await;
  });
  (StatusCode::OK, Json(json!({ "ok": true })))
}

/// Compare secrets in time independent of where they first differ
fn secret_matches(expected: &[u8], observed: &[u8]) -> bool {
  if expected.len() != observed.len() {
    return false;
  }
  expected
    .iter()
    .zip(observed)
    .fold(0u8, |diff, (a, b)| diff | (a ^ b))
    == 0
}

/// Register the webhook with Telegram and serve until Ctrl-C
pub async fn run_webhook(state: WebhookState, endpoint: &str, path: &str, bind_address: &str) -> anyhow::Result<()> {
  state
    .api
    .set_webhook(endpoint, state.secret.as_deref())
    .await
    .context("Failed to register the webhook with Telegram")?;

  let listener = TcpListener::bind(bind_address)
    .await
    .with_context(|| format!("Failed to bind {bind_address}"))?;
  let local_addr = listener
    .local_addr()
    .context("Failed to resolve the webhook server address")?;
  info!("Webhook server listening on {} (route {})", local_addr, path);

  axum::serve(listener, router(state, path))
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!("Shutting down");
    })
    .await
    .context("Webhook server exited unexpectedly")
}
