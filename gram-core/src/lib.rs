//! # jira-gram Core Library
//!
//! Pieces of the bot that do not touch the network: validated settings, the
//! user allow-list, slash-command parsing and plain-text helpers used when
//! formatting replies.

pub mod access;
pub mod command;
pub mod settings;
pub mod text;
pub mod url;

// Re-export main types
pub use access::{AllowList, is_allowed};
pub use command::{Command, CommandName, IssueKey, ParseError, addressee};
pub use settings::{Settings, SettingsError, TransportMode};
