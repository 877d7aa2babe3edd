//! # Jira Search Endpoint
//!
//! JQL search through the token-paged `search/jql` endpoint. The query string
//! is forwarded untouched; Jira is the only judge of whether it is valid.
//! Only the first page is fetched.

use tracing::{debug, info, instrument};

use crate::client::{JiraClient, check_status};
use crate::consts::SEARCH_FIELDS;
use crate::error::{JiraError, Result};
use crate::models::{SearchPage, SearchRequest, SearchResponse};

impl JiraClient {
  /// Search issues with JQL, returning at most `max_results` of them
  #[instrument(skip(self), level = "debug")]
  pub async fn search(&self, jql: &str, max_results: u32) -> Result<SearchPage> {
    info!("Searching Jira issues");

    let url = self.api_url("/search/jql");
    let payload = SearchRequest {
      jql,
      max_results,
      fields: SEARCH_FIELDS,
    };

    let response = self
      .request(self.client.post(&url))
      .json(&payload)
      .send()
      .await
      .map_err(JiraError::Network)?;

    let response = check_status(response, None).await?;
    let mut result = response.json::<SearchResponse>().await.map_err(JiraError::Decode)?;

    let mut has_more = result.has_more();
    // Some Jira deployments ignore maxResults above their own page size.
    if result.issues.len() > max_results as usize {
      result.issues.truncate(max_results as usize);
      has_more = true;
    }
    debug!("Search returned {} issues, more available: {}", result.issues.len(), has_more);

    Ok(SearchPage {
      issues: result.issues,
      has_more,
    })
  }
}
