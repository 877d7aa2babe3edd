//! Turning a single Telegram update into a delivered reply.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::api::BotApi;
use super::types::{CallbackQuery, Message, Update};
use crate::dispatch::{Dispatcher, Sender};

/// Decode a raw update, logging and skipping anything malformed
pub fn parse_update(raw: Value) -> Option<Update> {
  match serde_json::from_value::<Update>(raw) {
    Ok(update) => Some(update),
    Err(error) => {
      warn!("Skipping malformed update: {}", error);
      None
    }
  }
}

/// Process one update end to end.
///
/// Delivery failures are logged and dropped; there is nobody to report them
/// to.
#[instrument(skip_all, fields(update_id = update.update_id))]
pub async fn handle_update(api: &BotApi, dispatcher: &Dispatcher, update: Update) {
  if let Some(message) = update.message {
    handle_message(api, dispatcher, message).await;
  } else if let Some(query) = update.callback_query {
    handle_callback_query(api, dispatcher, query).await;
  } else {
    debug!("Ignoring update without message or callback query");
  }
}

async fn handle_message(api: &BotApi, dispatcher: &Dispatcher, message: Message) {
  let (Some(from), Some(text)) = (message.from, message.text) else {
    debug!("Ignoring message without sender or text");
    return;
  };
  if from.is_bot || dispatcher.ignores(&text) {
    return;
  }

  let chat_id = message.chat.id;
  if let Err(error) = api.send_chat_action(chat_id).await {
    debug!("Failed to send typing action: {}", error);
  }

  let sender = Sender {
    user_id: from.id,
    display_name: from.display_name(),
  };
  let Some(reply) = dispatcher.handle_text(&sender, &text).await else {
    return;
  };

  if let Err(error) = api
    .send_message(chat_id, &reply.text, reply.reply_markup().as_ref())
    .await
  {
    warn!("Failed to deliver reply to chat {}: {}", chat_id, error);
  }
}

async fn handle_callback_query(api: &BotApi, dispatcher: &Dispatcher, query: CallbackQuery) {
  // Stops the client's loading spinner on the pressed button
  if let Err(error) = api.answer_callback_query(&query.id).await {
    debug!("Failed to answer callback query: {}", error);
  }

  let Some(message) = query.message else {
    debug!("Ignoring callback query without its original message");
    return;
  };

  let chat_id = message.chat.id;
  if let Err(error) = api.send_chat_action(chat_id).await {
    debug!("Failed to send typing action: {}", error);
  }

  let sender = Sender {
    user_id: query.from.id,
    display_name: query.from.display_name(),
  };
  let data = query.data.unwrap_or_default();
  let reply = dispatcher.handle_callback(&sender, &data).await;

  if let Err(error) = api
    .edit_message_text(chat_id, message.message_id, &reply.text, reply.reply_markup().as_ref())
    .await
  {
    warn!("Failed to edit message {} in chat {}: {}", message.message_id, chat_id, error);
  }
}
