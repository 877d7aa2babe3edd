//! Constants for the gram-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("jira-gram/", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Prefix shared by every Jira REST v2 endpoint
pub const API_PREFIX: &str = "/rest/api/2";

/// Fields requested from the search endpoint; keeps result pages small
pub const SEARCH_FIELDS: &[&str] = &["summary", "status", "assignee"];

/// Timeout applied when the caller does not configure one
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
