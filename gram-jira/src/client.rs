use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use tracing::{debug, warn};

use crate::consts::{API_PREFIX, DEFAULT_TIMEOUT_SECS, USER_AGENT};
use crate::error::{JiraError, Result};
use crate::models::{JiraAuth, JiraErrorBody};

/// Represents a Jira API client
#[derive(Clone)]
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new Jira client whose requests give up after `timeout`
  pub fn new(base_url: &str, auth: JiraAuth, timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(USER_AGENT)
      .build()
      .map_err(JiraError::Client)?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    })
  }

  /// Create a new Jira client with the default request timeout
  pub fn with_default_timeout(base_url: &str, auth: JiraAuth) -> Result<Self> {
    Self::new(base_url, auth, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
  }

  /// Base URL every request is built from
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Link to an issue in the Jira web UI
  pub fn browse_url(&self, issue_key: &str) -> String {
    format!("{}/browse/{}", self.base_url, issue_key)
  }

  /// Test the Jira connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let response = self
      .request(self.client.get(self.api_url("/myself")))
      .send()
      .await
      .map_err(JiraError::Network)?;

    Ok(response.status().is_success())
  }

  pub(crate) fn api_url(&self, endpoint: &str) -> String {
    format!("{}{}{}", self.base_url, API_PREFIX, endpoint)
  }

  pub(crate) fn request(&self, builder: RequestBuilder) -> RequestBuilder {
    builder
      .header(header::ACCEPT, "application/json")
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
  }
}

/// Map a non-success response onto the error taxonomy.
///
/// `issue_key` names the resource a 404 refers to; endpoints without a single
/// target issue pass `None` and a 404 is then treated as an upstream failure.
pub(crate) async fn check_status(response: Response, issue_key: Option<&str>) -> Result<Response> {
  let status = response.status();
  debug!("Jira API response status: {}", status);

  if status.is_success() {
    return Ok(response);
  }

  match (status, issue_key) {
    (StatusCode::NOT_FOUND, Some(key)) => Err(JiraError::NotFound(key.to_string())),
    (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
      warn!("Authentication failed when accessing Jira API");
      Err(JiraError::Unauthorized)
    }
    (StatusCode::BAD_REQUEST, _) => {
      let body = response.json::<JiraErrorBody>().await.unwrap_or_default();
      let message = if body.error_messages.is_empty() {
        "bad request".to_string()
      } else {
        body.error_messages.join("; ")
      };
      Err(JiraError::Rejected(message))
    }
    _ => Err(JiraError::Upstream {
      status,
      body: response.text().await.unwrap_or_default(),
    }),
  }
}
