use serde::{Deserialize, Serialize};

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

impl std::fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JiraAuth")
      .field("username", &self.username)
      .field("api_token", &"<redacted>")
      .finish()
  }
}

/// Represents a Jira issue
#[derive(Debug, Deserialize)]
pub struct JiraIssue {
  #[allow(dead_code)]
  pub id: String,
  pub key: String,
  pub fields: JiraIssueFields,
}

/// Represents Jira issue fields
///
/// Search results only carry the fields that were requested, so everything
/// beyond the status is optional.
#[derive(Debug, Deserialize)]
pub struct JiraIssueFields {
  #[serde(default)]
  pub summary: String,
  #[serde(default)]
  pub description: Option<String>,
  pub status: JiraIssueStatus,
  #[serde(default)]
  pub priority: Option<JiraPriority>,
  #[serde(default)]
  pub assignee: Option<JiraUser>,
  #[serde(default)]
  pub reporter: Option<JiraUser>,
  #[serde(default)]
  pub created: Option<String>,
  #[serde(default)]
  pub updated: Option<String>,
}

/// Represents a Jira issue status
#[derive(Debug, Deserialize)]
pub struct JiraIssueStatus {
  #[allow(dead_code)]
  pub id: Option<String>,
  pub name: String,
}

/// Represents a Jira issue priority
#[derive(Debug, Deserialize)]
pub struct JiraPriority {
  pub name: String,
}

/// Represents a Jira user as embedded in issues and comments
#[derive(Debug, Clone, Deserialize)]
pub struct JiraUser {
  #[serde(rename = "displayName")]
  pub display_name: String,
}

/// Represents a single comment on an issue
#[derive(Debug, Deserialize)]
pub struct JiraComment {
  pub id: String,
  #[serde(default)]
  pub author: Option<JiraUser>,
  #[serde(default)]
  pub body: String,
  #[serde(default)]
  pub created: String,
}

/// Represents the comment listing of an issue
#[derive(Debug, Deserialize)]
pub struct JiraComments {
  pub comments: Vec<JiraComment>,
}

/// Payload for adding a comment
#[derive(Debug, Serialize)]
pub struct CommentRequest<'a> {
  pub body: &'a str,
}

/// Identifier assigned by Jira to a newly created comment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentId {
  pub id: String,
}

/// Payload for a JQL search
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
  pub jql: &'a str,
  #[serde(rename = "maxResults")]
  pub max_results: u32,
  pub fields: &'a [&'a str],
}

/// Raw response of the token-paged `search/jql` endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
  #[serde(rename = "isLast", default)]
  pub is_last: Option<bool>,
  #[serde(rename = "nextPageToken", default)]
  pub next_page_token: Option<String>,
}

impl SearchResponse {
  /// Whether Jira has matches beyond this page. `isLast` wins when present;
  /// otherwise a continuation token means there is another page.
  pub fn has_more(&self) -> bool {
    match self.is_last {
      Some(is_last) => !is_last,
      None => self.next_page_token.is_some(),
    }
  }
}

/// A bounded page of search results
#[derive(Debug)]
pub struct SearchPage {
  pub issues: Vec<JiraIssue>,
  /// Jira matched more issues than were returned
  pub has_more: bool,
}

/// Error body Jira sends alongside 4xx responses
#[derive(Debug, Default, Deserialize)]
pub struct JiraErrorBody {
  #[serde(rename = "errorMessages", default)]
  pub error_messages: Vec<String>,
}
