//! URL normalization for the tracker base URL.
//!
//! The base URL is joined with REST paths by plain string formatting, so it
//! must carry an explicit scheme and must not end in a slash.

use thiserror::Error;
use url::{Position, Url};

/// Errors produced while normalizing a base URL
#[derive(Debug, Error, PartialEq)]
pub enum UrlError {
  #[error("URL cannot be empty")]
  Empty,
  #[error("URL '{0}' must start with http:// or https://")]
  MissingScheme(String),
  #[error("Failed to parse URL '{input}': {source}")]
  Invalid {
    input: String,
    #[source]
    source: url::ParseError,
  },
  #[error("URL '{0}' has no host")]
  MissingHost(String),
}

/// Validate a base URL and strip trailing slashes.
///
/// Only `http` and `https` are accepted. A path prefix (for Jira servers
/// hosted under a context path) is preserved; query and fragment are dropped.
pub fn normalize_base_url(input: &str) -> Result<String, UrlError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(UrlError::Empty);
  }

  let lowered = trimmed.to_ascii_lowercase();
  if !lowered.starts_with("http://") && !lowered.starts_with("https://") {
    return Err(UrlError::MissingScheme(trimmed.to_string()));
  }

  let url = Url::parse(trimmed).map_err(|source| UrlError::Invalid {
    input: trimmed.to_string(),
    source,
  })?;
  if url.host_str().is_none_or(str::is_empty) {
    return Err(UrlError::MissingHost(trimmed.to_string()));
  }

  let mut result = url[..Position::BeforePath].to_string();
  result.push_str(url.path().trim_end_matches('/'));
  Ok(result)
}

/// Ensure a route path starts with exactly one slash
pub fn normalize_route_path(input: &str) -> String {
  let trimmed = input.trim().trim_start_matches('/');
  format!("/{trimmed}")
}
