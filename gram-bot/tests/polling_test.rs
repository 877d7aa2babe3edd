use std::sync::Arc;
use std::time::Duration;

use gram_bot::Dispatcher;
use gram_bot::telegram::BotApi;
use gram_bot::telegram::polling::poll_once;
use gram_core::AllowList;
use gram_jira::{JiraAuth, JiraClient};
use gram_test_utils::telegram::{TEST_BOT_TOKEN, message_update, mount_bot_api_ok, requests_to};
use gram_test_utils::tracker::{TEST_TOKEN, TEST_USER, issue_json};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher(jira: &MockServer) -> Arc<Dispatcher> {
  let auth = JiraAuth {
    username: TEST_USER.to_string(),
    api_token: TEST_TOKEN.to_string(),
  };
  let client = JiraClient::new(&jira.uri(), auth, Duration::from_secs(5)).unwrap();
  Arc::new(Dispatcher::new(client, AllowList::open(), 10))
}

#[tokio::test]
async fn test_poll_once_dispatches_each_update_and_advances_offset() -> anyhow::Result<()> {
  let telegram = MockServer::start().await;
  let jira = MockServer::start().await;
  mount_bot_api_ok(&telegram).await;

  Mock::given(method("POST"))
    .and(path(format!("/bot{TEST_BOT_TOKEN}/getUpdates")))
    .and(body_partial_json(json!({ "offset": 100 })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": [
            message_update(100, 1, 10, "/start"),
            message_update(101, 2, 20, "/view PROJ-7"),
            { "update_id": 104, "message": "not an object" }
        ]
    })))
    .expect(1)
    .mount(&telegram)
    .await;

  Mock::given(method("GET"))
    .and(path("/rest/api/2/issue/PROJ-7"))
    .respond_with(ResponseTemplate::new(200).set_body_json(issue_json("PROJ-7", "Polling works", "Done")))
    .expect(1)
    .mount(&jira)
    .await;

  let api = BotApi::new(&telegram.uri(), TEST_BOT_TOKEN)?;
  let (next_offset, tasks) = poll_once(&api, &dispatcher(&jira), 100, 0).await?;

  // The malformed update is acknowledged but not dispatched
  assert_eq!(next_offset, 105);
  assert_eq!(tasks.len(), 2);
  for task in tasks {
    task.await?;
  }

  let mut sent = requests_to(&telegram, "sendMessage").await;
  sent.sort_by_key(|body| body["chat_id"].as_i64());
  assert_eq!(sent.len(), 2);
  assert_eq!(sent[0]["chat_id"], 10);
  assert!(sent[0]["text"].as_str().unwrap().contains("/search"));
  assert_eq!(sent[1]["chat_id"], 20);
  assert!(sent[1]["text"].as_str().unwrap().contains("PROJ-7: Polling works"));
  assert!(sent[1]["reply_markup"]["inline_keyboard"].is_array());
  Ok(())
}

#[tokio::test]
async fn test_poll_once_empty_batch_keeps_offset() -> anyhow::Result<()> {
  let telegram = MockServer::start().await;
  let jira = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(format!("/bot{TEST_BOT_TOKEN}/getUpdates")))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": [] })))
    .mount(&telegram)
    .await;

  let api = BotApi::new(&telegram.uri(), TEST_BOT_TOKEN)?;
  let (next_offset, tasks) = poll_once(&api, &dispatcher(&jira), 42, 0).await?;

  assert_eq!(next_offset, 42);
  assert!(tasks.is_empty());
  Ok(())
}

#[tokio::test]
async fn test_poll_once_reports_api_errors() -> anyhow::Result<()> {
  let telegram = MockServer::start().await;
  let jira = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(format!("/bot{TEST_BOT_TOKEN}/getUpdates")))
    .respond_with(ResponseTemplate::new(409).set_body_json(json!({
        "ok": false,
        "error_code": 409,
        "description": "Conflict: can't use getUpdates method while webhook is active"
    })))
    .mount(&telegram)
    .await;

  let api = BotApi::new(&telegram.uri(), TEST_BOT_TOKEN)?;
  let result = poll_once(&api, &dispatcher(&jira), 0, 0).await;

  assert!(result.is_err());
  Ok(())
}
