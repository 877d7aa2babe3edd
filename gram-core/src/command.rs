//! # Command Parser
//!
//! Turns the text of an inbound message into a [`Command`]. Parsing is the
//! only place that looks at raw text; everything downstream matches on the
//! closed enum.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static ISSUE_KEY_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*-\d+$").expect("Failed to compile issue key regex"));

/// A validated, upper-case Jira issue key such as `PROJ-123`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueKey(String);

impl IssueKey {
  /// Parse user input, accepting any letter case
  pub fn parse(input: &str) -> Result<Self, ParseError> {
    let candidate = input.trim().to_ascii_uppercase();
    if ISSUE_KEY_PATTERN.is_match(&candidate) {
      Ok(Self(candidate))
    } else {
      Err(ParseError::InvalidIssueKey(input.trim().to_string()))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for IssueKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// The recognized command names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
  Start,
  View,
  Comment,
  Search,
}

impl CommandName {
  pub const fn as_str(self) -> &'static str {
    match self {
      CommandName::Start => "start",
      CommandName::View => "view",
      CommandName::Comment => "comment",
      CommandName::Search => "search",
    }
  }

  fn from_name(name: &str) -> Option<Self> {
    match name {
      "start" => Some(CommandName::Start),
      "view" => Some(CommandName::View),
      "comment" => Some(CommandName::Comment),
      "search" => Some(CommandName::Search),
      _ => None,
    }
  }
}

impl fmt::Display for CommandName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "/{}", self.as_str())
  }
}

/// A parsed slash-command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Start,
  View { key: IssueKey },
  Comment { key: IssueKey, text: String },
  Search { query: String },
  Unknown { name: String },
}

impl Command {
  /// Parse the text of a message.
  ///
  /// The command name is matched case-insensitively and may carry a
  /// `@botname` suffix, as Telegram adds in group chats.
  pub fn parse(text: &str) -> Result<Self, ParseError> {
    let text = text.trim();
    let Some(body) = text.strip_prefix('/') else {
      return Err(ParseError::NotACommand);
    };

    let (head, rest) = match body.find(char::is_whitespace) {
      Some(index) => (&body[..index], body[index..].trim()),
      None => (body, ""),
    };
    let name = head.split('@').next().unwrap_or_default().to_ascii_lowercase();

    let Some(command) = CommandName::from_name(&name) else {
      return Ok(Command::Unknown { name });
    };

    match command {
      CommandName::Start => Ok(Command::Start),
      CommandName::View => {
        let key = rest.split_whitespace().next().ok_or(ParseError::MissingArguments(command))?;
        Ok(Command::View {
          key: IssueKey::parse(key)?,
        })
      }
      CommandName::Comment => {
        let (key, comment) = match rest.find(char::is_whitespace) {
          Some(index) => (&rest[..index], rest[index..].trim()),
          None => (rest, ""),
        };
        if key.is_empty() || comment.is_empty() {
          return Err(ParseError::MissingArguments(command));
        }
        Ok(Command::Comment {
          key: IssueKey::parse(key)?,
          text: comment.to_string(),
        })
      }
      CommandName::Search => {
        if rest.is_empty() {
          return Err(ParseError::MissingArguments(command));
        }
        Ok(Command::Search {
          query: rest.to_string(),
        })
      }
    }
  }
}

/// The bot a command is addressed to, from its `@botname` suffix.
///
/// Returns `None` for plain text and for commands without a suffix.
pub fn addressee(text: &str) -> Option<&str> {
  let body = text.trim().strip_prefix('/')?;
  let head = body.split(char::is_whitespace).next().unwrap_or_default();
  head.split_once('@').map(|(_, bot)| bot).filter(|bot| !bot.is_empty())
}

/// Reasons a message could not be turned into a runnable command
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
  #[error("message is not a command")]
  NotACommand,
  #[error("missing arguments for {0}")]
  MissingArguments(CommandName),
  #[error("invalid issue key '{0}'")]
  InvalidIssueKey(String),
}
