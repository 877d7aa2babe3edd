//! Telegram Bot API fixtures and mocks

use serde_json::{Value, json};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bot token used by tests talking to a mocked Bot API
pub const TEST_BOT_TOKEN: &str = "123456:TEST";
/// Username the mocked `getMe` reports
pub const TEST_BOT_USERNAME: &str = "jira_gram_bot";

/// An update carrying a plain text message
pub fn message_update(update_id: i64, user_id: i64, chat_id: i64, text: &str) -> Value {
  json!({
      "update_id": update_id,
      "message": {
          "message_id": update_id * 10,
          "date": 1_700_000_000,
          "from": {
              "id": user_id,
              "is_bot": false,
              "first_name": "Alice",
              "username": "alice"
          },
          "chat": { "id": chat_id, "type": "private" },
          "text": text
      }
  })
}

/// An update carrying an inline-keyboard callback on a previous bot message
pub fn callback_update(update_id: i64, user_id: i64, chat_id: i64, message_id: i64, data: &str) -> Value {
  json!({
      "update_id": update_id,
      "callback_query": {
          "id": format!("cb-{update_id}"),
          "from": {
              "id": user_id,
              "is_bot": false,
              "first_name": "Alice"
          },
          "message": {
              "message_id": message_id,
              "date": 1_700_000_000,
              "chat": { "id": chat_id, "type": "private" },
              "text": "previous reply"
          },
          "data": data
      }
  })
}

/// Answer every Bot API method with a successful, minimal envelope
pub async fn mount_bot_api_ok(server: &MockServer) {
  Mock::given(method("POST"))
    .and(path_regex(r"^/bot[^/]+/(sendMessage|editMessageText)$"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": { "message_id": 1, "date": 1_700_000_000, "chat": { "id": 1, "type": "private" } }
    })))
    .mount(server)
    .await;

  Mock::given(method("POST"))
    .and(path_regex(r"^/bot[^/]+/getMe$"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": { "id": 123456, "is_bot": true, "first_name": "Jira", "username": TEST_BOT_USERNAME }
    })))
    .mount(server)
    .await;

  Mock::given(method("POST"))
    .and(path_regex(r"^/bot[^/]+/(answerCallbackQuery|sendChatAction|setWebhook|deleteWebhook)$"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
    .mount(server)
    .await;
}

/// JSON bodies of every request made to the given Bot API method
pub async fn requests_to(server: &MockServer, api_method: &str) -> Vec<Value> {
  let suffix = format!("/{api_method}");
  server
    .received_requests()
    .await
    .unwrap_or_default()
    .into_iter()
    .filter(|request| request.url.path().ends_with(&suffix))
    .filter_map(|request| serde_json::from_slice(&request.body).ok())
    .collect()
}
