//! # Telegram Bot API Types
//!
//! The subset of the Bot API object model the bot reads and writes. Unknown
//! fields are ignored so new Bot API releases do not break deserialization.

use serde::{Deserialize, Serialize};

/// An incoming update
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id: i64,
  #[serde(default)]
  pub message: Option<Message>,
  #[serde(default)]
  pub callback_query: Option<CallbackQuery>,
}

/// A chat message
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub message_id: i64,
  #[serde(default)]
  pub from: Option<User>,
  pub chat: Chat,
  #[serde(default)]
  pub text: Option<String>,
}

/// A Telegram user or bot
#[derive(Debug, Clone, Deserialize)]
pub struct User {
  pub id: i64,
  #[serde(default)]
  pub is_bot: bool,
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub username: Option<String>,
}

impl User {
  /// Name used when attributing comments: first name, else username
  pub fn display_name(&self) -> String {
    if !self.first_name.trim().is_empty() {
      return self.first_name.trim().to_string();
    }
    self
      .username
      .clone()
      .unwrap_or_else(|| format!("user {}", self.id))
  }
}

/// The chat a message belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
  pub id: i64,
}

/// A press on an inline keyboard button
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
  pub id: String,
  pub from: User,
  #[serde(default)]
  pub message: Option<Message>,
  #[serde(default)]
  pub data: Option<String>,
}

/// Inline keyboard attached to an outgoing message
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InlineKeyboardMarkup {
  pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// A single inline keyboard button; exactly one of the optional fields is set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InlineKeyboardButton {
  pub text: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub callback_data: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
}

/// Envelope wrapping every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
  pub ok: bool,
  #[serde(default = "Option::default")]
  pub result: Option<T>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub error_code: Option<i64>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_message_update_deserialization() {
    let update: Update = serde_json::from_value(json!({
        "update_id": 7,
        "message": {
            "message_id": 70,
            "date": 1_700_000_000,
            "from": { "id": 42, "is_bot": false, "first_name": "Alice", "language_code": "en" },
            "chat": { "id": 42, "type": "private", "first_name": "Alice" },
            "text": "/view PROJ-1",
            "entities": [{ "type": "bot_command", "offset": 0, "length": 5 }]
        }
    }))
    .unwrap();

    let message = update.message.unwrap();
    assert_eq!(update.update_id, 7);
    assert_eq!(message.chat.id, 42);
    assert_eq!(message.from.unwrap().display_name(), "Alice");
    assert_eq!(message.text.as_deref(), Some("/view PROJ-1"));
    assert!(update.callback_query.is_none());
  }

  #[test]
  fn test_display_name_fallbacks() {
    let user = User {
      id: 5,
      is_bot: false,
      first_name: " ".into(),
      username: Some("bob".into()),
    };
    assert_eq!(user.display_name(), "bob");

    let anonymous = User {
      username: None,
      ..user
    };
    assert_eq!(anonymous.display_name(), "user 5");
  }

  #[test]
  fn test_keyboard_serialization_skips_unset_fields() {
    let markup = InlineKeyboardMarkup {
      inline_keyboard: vec![vec![InlineKeyboardButton {
        text: "Open".into(),
        callback_data: None,
        url: Some("https://example.com".into()),
      }]],
    };

    assert_eq!(
      serde_json::to_value(&markup).unwrap(),
      json!({ "inline_keyboard": [[{ "text": "Open", "url": "https://example.com" }]] })
    );
  }

  #[test]
  fn test_error_envelope() {
    let response: ApiResponse<bool> = serde_json::from_value(json!({
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: message text is empty"
    }))
    .unwrap();
    assert!(!response.ok);
    assert!(response.result.is_none());
    assert_eq!(response.error_code, Some(400));
  }
}
