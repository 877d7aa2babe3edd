//! # Jira Client Errors
//!
//! Failure taxonomy for Jira calls. Callers usually only care about the
//! coarse [`ErrorKind`], which separates a missing resource from a tracker
//! that answered badly and a tracker that could not be reached at all.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`crate::JiraClient`] operations
#[derive(Debug, Error)]
pub enum JiraError {
  #[error("Issue {0} not found")]
  NotFound(String),

  #[error("Authentication failed. Please check your Jira credentials.")]
  Unauthorized,

  #[error("Jira rejected the request: {0}")]
  Rejected(String),

  #[error("Unexpected error: HTTP {status} - {body}")]
  Upstream { status: StatusCode, body: String },

  #[error("Failed to reach Jira: {0}")]
  Network(#[source] reqwest::Error),

  #[error("Failed to parse Jira response: {0}")]
  Decode(#[source] reqwest::Error),

  #[error("Failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),
}

/// Coarse classification used when turning an error into a user-facing reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Upstream,
  Network,
}

impl JiraError {
  /// Classify this error
  pub fn kind(&self) -> ErrorKind {
    match self {
      JiraError::NotFound(_) => ErrorKind::NotFound,
      JiraError::Unauthorized | JiraError::Rejected(_) | JiraError::Upstream { .. } | JiraError::Decode(_) => {
        ErrorKind::Upstream
      }
      JiraError::Network(_) | JiraError::Client(_) => ErrorKind::Network,
    }
  }
}

/// Convenience alias for results produced by this crate
pub type Result<T> = std::result::Result<T, JiraError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_kinds() {
    assert_eq!(JiraError::NotFound("PROJ-1".into()).kind(), ErrorKind::NotFound);
    assert_eq!(JiraError::Unauthorized.kind(), ErrorKind::Upstream);
    assert_eq!(JiraError::Rejected("bad jql".into()).kind(), ErrorKind::Upstream);
    assert_eq!(
      JiraError::Upstream {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: String::new(),
      }
      .kind(),
      ErrorKind::Upstream
    );
  }

  #[test]
  fn test_error_messages() {
    assert_eq!(JiraError::NotFound("PROJ-1".into()).to_string(), "Issue PROJ-1 not found");
    let upstream = JiraError::Upstream {
      status: StatusCode::BAD_GATEWAY,
      body: "oops".into(),
    };
    assert_eq!(upstream.to_string(), "Unexpected error: HTTP 502 Bad Gateway - oops");
  }
}
