//! Jira REST payload fixtures
//!
//! Fixtures are plain JSON values so they can be served by a `wiremock`
//! server without depending on the client crate's model types.

use serde_json::{Value, json};

/// Username the test clients authenticate with
pub const TEST_USER: &str = "test_user";
/// API token the test clients authenticate with
pub const TEST_TOKEN: &str = "test_token";

/// A fully populated issue as returned by `GET /rest/api/2/issue/{key}`
pub fn issue_json(key: &str, summary: &str, status: &str) -> Value {
  json!({
      "id": "10000",
      "key": key,
      "fields": {
          "summary": summary,
          "description": "Steps to reproduce are attached.",
          "status": {
              "id": "10001",
              "name": status,
              "statusCategory": {
                  "id": 4,
                  "key": "indeterminate",
                  "name": status
              }
          },
          "priority": { "name": "High" },
          "assignee": { "displayName": "Ada Lovelace", "accountId": "acc-ada" },
          "reporter": { "displayName": "Grace Hopper", "accountId": "acc-grace" },
          "created": "2024-01-02T10:00:00.000+0000",
          "updated": "2024-01-05T16:30:00.000+0000"
      }
  })
}

/// A `search/jql` response listing `(key, summary)` pairs. When `is_last` is
/// false the page carries a continuation token, as Jira does.
pub fn search_json(issues: &[(&str, &str)], is_last: bool) -> Value {
  let issues: Vec<Value> = issues
    .iter()
    .enumerate()
    .map(|(index, (key, summary))| {
      json!({
          "id": (10000 + index).to_string(),
          "key": key,
          "fields": {
              "summary": summary,
              "status": { "name": "To Do" },
              "assignee": null
          }
      })
    })
    .collect();

  let mut body = json!({
      "issues": issues,
      "isLast": is_last
  });
  if !is_last {
    body["nextPageToken"] = json!("CAEaAggD");
  }
  body
}

/// A comment listing built from `(id, author, body, created)` tuples
pub fn comments_json(comments: &[(&str, &str, &str, &str)]) -> Value {
  let comments: Vec<Value> = comments
    .iter()
    .map(|(id, author, body, created)| {
      json!({
          "id": id,
          "author": { "displayName": author },
          "body": body,
          "created": created
      })
    })
    .collect();

  json!({
      "startAt": 0,
      "maxResults": comments.len(),
      "total": comments.len(),
      "comments": comments
  })
}
