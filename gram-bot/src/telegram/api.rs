//! # Telegram Bot API Client
//!
//! Minimal JSON-over-HTTPS client for the Bot API methods the bot uses.
//! Every method posts a JSON payload to `{api_url}/bot{token}/{method}` and
//! unwraps Telegram's `{ok, result, description}` envelope.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, instrument};

use super::types::{ApiResponse, InlineKeyboardMarkup, User};

/// Seconds Telegram may hold a `getUpdates` call open
pub const LONG_POLL_TIMEOUT_SECS: u64 = 30;

/// HTTP timeout for Bot API calls; must outlast a long poll
const HTTP_TIMEOUT: Duration = Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 15);

/// Errors returned by [`BotApi`] calls
#[derive(Debug, Error)]
pub enum TelegramError {
  #[error("Failed to reach the Telegram Bot API: {0}")]
  Http(#[source] reqwest::Error),

  #[error("Telegram rejected {method}: {description} (code {code})")]
  Api {
    method: &'static str,
    code: i64,
    description: String,
  },

  #[error("Telegram returned no result for {0}")]
  MissingResult(&'static str),
}

pub type Result<T> = std::result::Result<T, TelegramError>;

/// Bot API client bound to one bot token
#[derive(Clone)]
pub struct BotApi {
  client: Client,
  base: String,
}

impl std::fmt::Debug for BotApi {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BotApi").field("base", &"<redacted>").finish()
  }
}

impl BotApi {
  pub fn new(api_url: &str, token: &str) -> Result<Self> {
    let client = Client::builder()
      .timeout(HTTP_TIMEOUT)
      .build()
      .map_err(|error| TelegramError::Http(error.without_url()))?;

    Ok(Self {
      client,
      base: format!("{}/bot{}", api_url.trim().trim_end_matches('/'), token.trim()),
    })
  }

  /// Call a Bot API method and return its `result`.
  ///
  /// URLs embed the bot token, so they are stripped from transport errors.
  async fn call<P, T>(&self, method: &'static str, payload: &P) -> Result<T>
  where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let response = self
      .client
      .post(format!("{}/{method}", self.base))
      .json(payload)
      .send()
      .await
      .map_err(|error| TelegramError::Http(error.without_url()))?;

    let status = response.status();
    let envelope = response
      .json::<ApiResponse<T>>()
      .await
      .map_err(|error| TelegramError::Http(error.without_url()))?;

    if !envelope.ok {
      return Err(TelegramError::Api {
        method,
        code: envelope.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
        description: envelope.description.unwrap_or_default(),
      });
    }
    envelope.result.ok_or(TelegramError::MissingResult(method))
  }

  /// The bot's own account, used to recognize commands addressed to it
  #[instrument(skip(self), level = "debug")]
  pub async fn get_me(&self) -> Result<User> {
    self.call("getMe", &json!({})).await
  }

  /// Fetch pending updates starting at `offset`.
  ///
  /// Updates are returned as raw JSON so that one malformed update cannot
  /// poison the whole batch.
  #[instrument(skip(self), level = "trace")]
  pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Value>> {
    self
      .call(
        "getUpdates",
        &json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"]
        }),
      )
      .await
  }

  #[instrument(skip(self, text, markup), level = "debug")]
  pub async fn send_message(&self, chat_id: i64, text: &str, markup: Option<&InlineKeyboardMarkup>) -> Result<()> {
    let mut payload = json!({ "chat_id": chat_id, "text": text });
    if let Some(markup) = markup {
      payload["reply_markup"] = json!(markup);
    }
    let _: Value = self.call("sendMessage", &payload).await?;
    Ok(())
  }

  #[instrument(skip(self, text, markup), level = "debug")]
  pub async fn edit_message_text(
    &self,
    chat_id: i64,
    message_id: i64,
    text: &str,
    markup: Option<&InlineKeyboardMarkup>,
  ) -> Result<()> {
    let mut payload = json!({ "chat_id": chat_id, "message_id": message_id, "text": text });
    if let Some(markup) = markup {
      payload["reply_markup"] = json!(markup);
    }
    let _: Value = self.call("editMessageText", &payload).await?;
    Ok(())
  }

  #[instrument(skip(self), level = "debug")]
  pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
    let _: Value = self
      .call("answerCallbackQuery", &json!({ "callback_query_id": callback_query_id }))
      .await?;
    Ok(())
  }

  /// Show the "typing…" indicator in a chat
  #[instrument(skip(self), level = "trace")]
  pub async fn send_chat_action(&self, chat_id: i64) -> Result<()> {
    let _: Value = self
      .call("sendChatAction", &json!({ "chat_id": chat_id, "action": "typing" }))
      .await?;
    Ok(())
  }

  /// Register `url` as the webhook, optionally with a secret token Telegram
  /// echoes back in the `X-Telegram-Bot-Api-Secret-Token` header
  #[instrument(skip(self, secret), level = "debug")]
  pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<()> {
    let mut payload = json!({
        "url": url,
        "allowed_updates": ["message", "callback_query"]
    });
    if let Some(secret) = secret {
      payload["secret_token"] = json!(secret);
    }
    let _: Value = self.call("setWebhook", &payload).await?;
    debug!("Webhook registered");
    Ok(())
  }

  /// Remove any registered webhook so `getUpdates` is allowed
  #[instrument(skip(self), level = "debug")]
  pub async fn delete_webhook(&self) -> Result<()> {
    let _: Value = self.call("deleteWebhook", &json!({})).await?;
    Ok(())
  }
}
