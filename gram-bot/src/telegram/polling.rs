//! # Long Polling Transport
//!
//! Pulls updates with `getUpdates`. The offset advances past the highest
//! update id seen, which acknowledges the batch to Telegram.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::api::{BotApi, LONG_POLL_TIMEOUT_SECS, Result};
use super::updates::{handle_update, parse_update};
use crate::dispatch::Dispatcher;

/// Pause after a failed `getUpdates` call
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Fetch one batch of updates and spawn a task per update.
///
/// Returns the offset for the next call together with the spawned tasks.
pub async fn poll_once(
  api: &BotApi,
  dispatcher: &Arc<Dispatcher>,
  offset: i64,
  timeout_secs: u64,
) -> Result<(i64, Vec<JoinHandle<()>>)> {
  let updates = api.get_updates(offset, timeout_secs).await?;

  let mut next_offset = offset;
  let mut tasks = Vec::with_capacity(updates.len());
  for raw in updates {
    // Acknowledge even updates we cannot decode so they are not redelivered
    if let Some(update_id) = raw.get("update_id").and_then(serde_json::Value::as_i64) {
      next_offset = next_offset.max(update_id.saturating_add(1));
    }
    let Some(update) = parse_update(raw) else {
      continue;
    };

    let api = api.clone();
    let dispatcher = Arc::clone(dispatcher);
    tasks.push(tokio::spawn(async move {
      handle_update(&api, &dispatcher, update).await;
    }));
  }

  if !tasks.is_empty() {
    debug!("Dispatched {} updates, next offset {}", tasks.len(), next_offset);
  }
  Ok((next_offset, tasks))
}

/// Run the polling loop until Ctrl-C
pub async fn run_polling(api: BotApi, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
  if let Err(error) = api.delete_webhook().await {
    warn!("Failed to remove existing webhook: {}", error);
  }
  info!("Polling for updates, press Ctrl-C to stop");

  let mut offset = 0;
  loop {
    tokio::select! {
      _ = tokio::signal::ctrl_c() => {
        info!("Shutting down");
        return Ok(());
      }
      result = poll_once(&api, &dispatcher, offset, LONG_POLL_TIMEOUT_SECS) => match result {
        Ok((next_offset, _tasks)) => offset = next_offset,
        Err(poll_error) => {
          error!("Failed to fetch updates: {}", poll_error);
          tokio::time::sleep(RETRY_DELAY).await;
        }
      }
    }
  }
}
