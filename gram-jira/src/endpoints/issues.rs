//! # Jira Issue Endpoints
//!
//! Jira API endpoint implementations for fetching single issues.

use tracing::{info, instrument};

use crate::client::{JiraClient, check_status};
use crate::error::{JiraError, Result};
use crate::models::JiraIssue;

impl JiraClient {
  /// Get a Jira issue by key
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue> {
    info!("Fetching Jira issue {}", issue_key);

    let url = self.api_url(&format!("/issue/{issue_key}"));

    let response = self
      .request(self.client.get(&url))
      .send()
      .await
      .map_err(JiraError::Network)?;

    let response = check_status(response, Some(issue_key)).await?;
    response.json::<JiraIssue>().await.map_err(JiraError::Decode)
  }
}

#[cfg(test)]
mod tests {
  use gram_test_utils::tracker::{TEST_TOKEN, TEST_USER, issue_json};
  use wiremock::matchers::{basic_auth, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::JiraClient;
  use crate::error::{ErrorKind, JiraError};
  use crate::models::JiraAuth;

  fn test_auth() -> JiraAuth {
    JiraAuth {
      username: TEST_USER.to_string(),
      api_token: TEST_TOKEN.to_string(),
    }
  }

  #[tokio::test]
  async fn test_get_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = JiraClient::with_default_timeout(&mock_server.uri(), test_auth())?;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(issue_json("TEST-123", "Test issue", "In Progress")))
      .mount(&mock_server)
      .await;

    let issue = client.get_issue("TEST-123").await?;
    assert_eq!(issue.key, "TEST-123");
    assert_eq!(issue.fields.summary, "Test issue");
    assert_eq!(issue.fields.status.name, "In Progress");
    assert_eq!(issue.fields.reporter.map(|r| r.display_name).as_deref(), Some("Grace Hopper"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = JiraClient::with_default_timeout(&mock_server.uri(), test_auth())?;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/NONEXISTENT-123"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let err = client.get_issue("NONEXISTENT-123").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("not found"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_unauthorized() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = JiraClient::with_default_timeout(&mock_server.uri(), test_auth())?;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
          "errorMessages": ["Authentication failed"],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let err = client.get_issue("TEST-123").await.unwrap_err();
    assert!(matches!(err, JiraError::Unauthorized));
    assert_eq!(err.kind(), ErrorKind::Upstream);

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_garbled_body_is_upstream_error() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = JiraClient::with_default_timeout(&mock_server.uri(), test_auth())?;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
      .mount(&mock_server)
      .await;

    let err = client.get_issue("TEST-123").await.unwrap_err();
    assert!(matches!(err, JiraError::Decode(_)));
    assert_eq!(err.kind(), ErrorKind::Upstream);

    Ok(())
  }
}
