//! # Jira Comment Endpoints
//!
//! Adding comments to an issue, listing the existing ones and fetching a
//! single comment by id.

use tracing::{info, instrument};

use crate::client::{JiraClient, check_status};
use crate::error::{JiraError, Result};
use crate::models::{CommentId, CommentRequest, JiraComment, JiraComments};

impl JiraClient {
  /// Add a comment to an issue, returning the id Jira assigned to it.
  ///
  /// A failed call is reported as-is; nothing is retried.
  #[instrument(skip(self, body), level = "debug")]
  pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<CommentId> {
    info!("Adding comment to {} ({} chars)", issue_key, body.chars().count());

    let url = self.api_url(&format!("/issue/{issue_key}/comment"));

    let response = self
      .request(self.client.post(&url))
      .json(&CommentRequest { body })
      .send()
      .await
      .map_err(JiraError::Network)?;

    let response = check_status(response, Some(issue_key)).await?;
    response.json::<CommentId>().await.map_err(JiraError::Decode)
  }

  /// List all comments of an issue in the order Jira returns them (oldest first)
  #[instrument(skip(self), level = "debug")]
  pub async fn get_comments(&self, issue_key: &str) -> Result<Vec<JiraComment>> {
    info!("Fetching comments for {}", issue_key);

    let url = self.api_url(&format!("/issue/{issue_key}/comment"));

    let response = self
      .request(self.client.get(&url))
      .send()
      .await
      .map_err(JiraError::Network)?;

    let response = check_status(response, Some(issue_key)).await?;
    let comments = response.json::<JiraComments>().await.map_err(JiraError::Decode)?;
    Ok(comments.comments)
  }

  /// Fetch one comment of an issue by its id
  #[instrument(skip(self), level = "debug")]
  pub async fn get_comment(&self, issue_key: &str, comment_id: &str) -> Result<JiraComment> {
    info!("Fetching comment {} on {}", comment_id, issue_key);

    let url = self.api_url(&format!("/issue/{issue_key}/comment/{comment_id}"));

    let response = self
      .request(self.client.get(&url))
      .send()
      .await
      .map_err(JiraError::Network)?;

    let response = check_status(response, Some(issue_key)).await?;
    response.json::<JiraComment>().await.map_err(JiraError::Decode)
  }
}
