//! # Jira API Client
//!
//! Thin Jira REST API client covering what the bot needs: fetching an issue,
//! listing and adding comments, and JQL search. Every call maps failures onto
//! [`JiraError`], whose [`ErrorKind`] tells a missing issue apart from a
//! misbehaving or unreachable tracker.

mod client;
pub mod consts;
mod endpoints;
mod error;
pub mod models;

// Re-export the client
pub use client::JiraClient;
pub use error::{ErrorKind, JiraError, Result};
// Re-export models
pub use models::{CommentId, JiraAuth, JiraComment, JiraIssue, JiraIssueFields, JiraIssueStatus, JiraUser, SearchPage};
