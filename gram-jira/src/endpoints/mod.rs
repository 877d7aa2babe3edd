//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by Jira resource: issues, their comments,
//! and JQL search.

pub mod comments;
pub mod issues;
pub mod search;
