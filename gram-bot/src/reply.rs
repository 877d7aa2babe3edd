//! # Replies
//!
//! Everything the bot says lives here. Each dispatcher path produces exactly
//! one [`Reply`]: plain text plus an optional inline keyboard.

use gram_core::text::{date_part, truncate_chars, truncate_utf16};
use gram_core::{CommandName, IssueKey};
use gram_jira::{ErrorKind, JiraComment, JiraError, JiraIssue, JiraUser, SearchPage};

use crate::telegram::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Telegram's message length limit, in UTF-16 code units
pub const MAX_MESSAGE_LEN: usize = 4096;
/// Longest description shown in an issue card
pub const MAX_DESCRIPTION_CHARS: usize = 500;
/// Longest comment body shown in a comment listing
pub const MAX_COMMENT_CHARS: usize = 200;
/// Number of comments shown in a comment listing
pub const MAX_COMMENTS_SHOWN: usize = 5;
/// Telegram's limit on inline button callback data, in bytes
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

pub const DENIED: &str = "Sorry, you are not authorized to use this bot.";
pub const NOT_A_COMMAND: &str = "I only understand commands. Send /start to see what I can do.";
pub const UNKNOWN_ACTION: &str = "This button is no longer supported. Send /start to see what I can do.";
pub const NO_SEARCH_RESULTS: &str = "No issues found matching your query.";
pub const COMMENT_NOT_FOUND: &str = "Comment not found.";

const WELCOME: &str = "Welcome to Jira Telegram Bot! 🤖

Available commands:
/start - Show this help message
/view <ISSUE-KEY> - View Jira ticket details
/comment <ISSUE-KEY> <comment> - Add comment to a ticket
/search <JQL> - Search for issues using JQL

Examples:
• /view PROJ-123 - View details of PROJ-123
• /comment PROJ-123 This is working now - Add comment
• /search assignee = currentUser() AND status = \"In Progress\" - Search your in-progress issues";

/// A single inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
  /// Sends `data` back to the bot as a callback query
  Callback { label: String, data: String },
  /// Opens `url` in the client
  Link { label: String, url: String },
}

impl Button {
  fn into_telegram(self) -> InlineKeyboardButton {
    match self {
      Button::Callback { label, data } => InlineKeyboardButton {
        text: label,
        callback_data: Some(data),
        url: None,
      },
      Button::Link { label, url } => InlineKeyboardButton {
        text: label,
        callback_data: None,
        url: Some(url),
      },
    }
  }
}

/// Text to send back to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
  pub text: String,
  pub buttons: Vec<Vec<Button>>,
}

impl Reply {
  /// A plain reply, cut down to fit in a single Telegram message
  pub fn text(text: impl Into<String>) -> Self {
    Self {
      text: truncate_utf16(&text.into(), MAX_MESSAGE_LEN),
      buttons: Vec::new(),
    }
  }

  pub fn with_buttons(mut self, buttons: Vec<Vec<Button>>) -> Self {
    self.buttons = buttons;
    self
  }

  /// Keyboard markup for the Bot API, if the reply has any buttons
  pub fn reply_markup(&self) -> Option<InlineKeyboardMarkup> {
    if self.buttons.is_empty() {
      return None;
    }
    Some(InlineKeyboardMarkup {
      inline_keyboard: self
        .buttons
        .iter()
        .map(|row| row.iter().cloned().map(Button::into_telegram).collect())
        .collect(),
    })
  }
}

pub fn welcome() -> Reply {
  Reply::text(WELCOME)
}

pub fn denied() -> Reply {
  Reply::text(DENIED)
}

pub fn not_a_command() -> Reply {
  Reply::text(NOT_A_COMMAND)
}

pub fn unknown_command(name: &str) -> Reply {
  Reply::text(format!(
    "Unknown command /{name}. Send /start to see the available commands."
  ))
}

/// Usage hint for a command invoked without its arguments
pub fn usage(command: CommandName) -> Reply {
  let text = match command {
    CommandName::Start => return welcome(),
    CommandName::View => "Please provide an issue key. Usage: /view PROJ-123",
    CommandName::Comment => "Please provide an issue key and comment. Usage: /comment PROJ-123 Your comment here",
    CommandName::Search => "Please provide a JQL query. Usage: /search assignee = currentUser()",
  };
  Reply::text(text)
}

pub fn invalid_issue_key(input: &str) -> Reply {
  Reply::text(format!(
    "Invalid issue key format: {input}. Use format like: PROJ-123"
  ))
}

fn user_name(user: Option<&JiraUser>, fallback: &str) -> String {
  user.map_or_else(|| fallback.to_string(), |user| user.display_name.clone())
}

/// Issue card shown for `/view`, with the follow-up action buttons
pub fn issue(issue: &JiraIssue, browse_url: &str) -> Reply {
  let fields = &issue.fields;
  let description = fields
    .description
    .as_deref()
    .map(str::trim)
    .filter(|text| !text.is_empty())
    .map_or_else(
      || "No description".to_string(),
      |text| truncate_chars(text, MAX_DESCRIPTION_CHARS),
    );

  let mut text = format!("🎫 {}: {}\n\n", issue.key, fields.summary);
  text.push_str(&format!("Status: {}\n", fields.status.name));
  text.push_str(&format!(
    "Priority: {}\n",
    fields.priority.as_ref().map_or("None", |priority| priority.name.as_str())
  ));
  text.push_str(&format!("Assignee: {}\n", user_name(fields.assignee.as_ref(), "Unassigned")));
  text.push_str(&format!("Reporter: {}\n\n", user_name(fields.reporter.as_ref(), "Unknown")));
  text.push_str(&format!("Description:\n{description}\n\n"));
  if let Some(created) = &fields.created {
    text.push_str(&format!("Created: {}\n", date_part(created)));
  }
  if let Some(updated) = &fields.updated {
    text.push_str(&format!("Updated: {}\n", date_part(updated)));
  }
  text.push_str(&format!("\n{browse_url}"));

  Reply::text(text).with_buttons(vec![
    vec![
      Button::Callback {
        label: "📝 Add Comment".to_string(),
        data: format!("comment:{}", issue.key),
      },
      Button::Callback {
        label: "💬 View Comments".to_string(),
        data: format!("comments:{}", issue.key),
      },
    ],
    vec![Button::Link {
      label: "🔗 Open in Jira".to_string(),
      url: browse_url.to_string(),
    }],
  ])
}

pub fn comment_added(key: &IssueKey) -> Reply {
  Reply::text(format!("✅ Comment added successfully to {key}!"))
}

/// Hint shown when the "Add Comment" button is pressed
pub fn comment_hint(key: &IssueKey) -> Reply {
  Reply::text(format!(
    "To add a comment to {key}, send:\n\n/comment {key} Your comment here"
  ))
}

fn utf16_len(text: &str) -> usize {
  text.encode_utf16().count()
}

/// Closing line of a search listing. `omitted` issues were fetched but did
/// not fit in the message; `has_more` means Jira matched even more.
fn more_results_notice(omitted: usize, has_more: bool) -> Option<String> {
  match (omitted, has_more) {
    (0, false) => None,
    (0, true) => Some("…and more results. Narrow the query to see them.".to_string()),
    (omitted, false) => Some(format!("…and {omitted} more results")),
    (omitted, true) => Some(format!("…and {omitted}+ more results")),
  }
}

/// Result listing for `/search`. `browse_url` maps an issue key to its link.
///
/// Entries are added only while they fit in one message next to the closing
/// notice, so the notice is never cut off.
pub fn search_results(page: &SearchPage, browse_url: impl Fn(&str) -> String) -> Reply {
  if page.issues.is_empty() {
    return Reply::text(NO_SEARCH_RESULTS);
  }

  let header = "🔎 Search Results:\n\n";
  let reserve = [0, page.issues.len()]
    .into_iter()
    .filter_map(|omitted| more_results_notice(omitted, true))
    .map(|notice| utf16_len(&notice) + 2)
    .max()
    .unwrap_or_default();
  let mut used = utf16_len(header) + reserve;

  let mut text = header.to_string();
  let mut shown = 0;
  for issue in &page.issues {
    let entry = format!(
      "🎫 {} - {}\n   Status: {} | Assignee: {}\n   {}\n\n",
      issue.key,
      issue.fields.summary,
      issue.fields.status.name,
      user_name(issue.fields.assignee.as_ref(), "Unassigned"),
      browse_url(&issue.key)
    );
    let entry_len = utf16_len(&entry);
    if used + entry_len > MAX_MESSAGE_LEN {
      break;
    }
    used += entry_len;
    text.push_str(&entry);
    shown += 1;
  }

  let mut text = text.trim_end().to_string();
  if let Some(notice) = more_results_notice(page.issues.len() - shown, page.has_more) {
    text.push_str("\n\n");
    text.push_str(&notice);
  }

  Reply::text(text)
}

/// Callback data of the "View Full" button, if it fits Telegram's 64-byte
/// limit on callback data
fn full_comment_data(key: &IssueKey, comment_id: &str) -> Option<String> {
  let data = format!("comment_full:{key}|{comment_id}");
  (data.len() <= MAX_CALLBACK_DATA_LEN).then_some(data)
}

/// Latest comments on an issue, newest first
pub fn comments(key: &IssueKey, comments: &[JiraComment]) -> Reply {
  let back = vec![Button::Callback {
    label: "🔙 Back".to_string(),
    data: format!("view:{key}"),
  }];

  if comments.is_empty() {
    return Reply::text(format!("No comments found for {key}.")).with_buttons(vec![back]);
  }

  let mut latest: Vec<&JiraComment> = comments.iter().collect();
  // Jira timestamps share one offset format, so lexical order is time order
  latest.sort_by(|a, b| b.created.cmp(&a.created));

  let mut text = format!("💬 Comments for {key} ({} total):\n\n", comments.len());
  let mut buttons = Vec::new();
  for (index, comment) in latest.iter().take(MAX_COMMENTS_SHOWN).enumerate() {
    let body = comment.body.trim();
    text.push_str(&format!(
      "{}. {} ({})\n{}\n\n",
      index + 1,
      user_name(comment.author.as_ref(), "Unknown"),
      date_part(&comment.created),
      truncate_chars(body, MAX_COMMENT_CHARS)
    ));

    if body.chars().count() > MAX_COMMENT_CHARS {
      if let Some(data) = full_comment_data(key, &comment.id) {
        buttons.push(vec![Button::Callback {
          label: format!("📄 View Full #{}", index + 1),
          data,
        }]);
      }
    }
  }
  if comments.len() > MAX_COMMENTS_SHOWN {
    text.push_str(&format!("…and {} more", comments.len() - MAX_COMMENTS_SHOWN));
  }
  buttons.push(back);

  Reply::text(text.trim_end()).with_buttons(buttons)
}

/// A single comment shown in full
pub fn full_comment(key: &IssueKey, comment: &JiraComment) -> Reply {
  let text = format!(
    "💬 Comment on {key}\n\n{} ({}):\n\n{}",
    user_name(comment.author.as_ref(), "Unknown"),
    date_part(&comment.created),
    comment.body.trim()
  );
  Reply::text(text).with_buttons(vec![vec![back_to_comments(key)]])
}

/// Reply for a "View Full" press on a comment that no longer exists
pub fn comment_not_found(key: &IssueKey) -> Reply {
  Reply::text(COMMENT_NOT_FOUND).with_buttons(vec![vec![back_to_comments(key)]])
}

fn back_to_comments(key: &IssueKey) -> Button {
  Button::Callback {
    label: "🔙 Back to Comments".to_string(),
    data: format!("comments:{key}"),
  }
}

/// What the user was trying to do when Jira failed
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
  View(&'a IssueKey),
  Comment(&'a IssueKey),
  Comments(&'a IssueKey),
  FullComment(&'a IssueKey),
  Search,
}

/// Turn a Jira failure into a reply that says what kind of failure it was
pub fn jira_failure(action: Action<'_>, error: &JiraError) -> Reply {
  let text = match (error.kind(), action) {
    (ErrorKind::NotFound, Action::FullComment(_)) => COMMENT_NOT_FOUND.to_string(),
    (ErrorKind::NotFound, Action::View(key) | Action::Comment(key) | Action::Comments(key)) => {
      format!("Could not find issue {key}. Please check the issue key.")
    }
    (ErrorKind::Network, _) => "❌ Could not reach Jira. Please try again later.".to_string(),
    (_, action) => match error {
      JiraError::Rejected(message) if matches!(action, Action::Search) => {
        format!("❌ Jira rejected the query: {message}")
      }
      JiraError::Unauthorized => {
        "❌ Jira refused the bot's credentials. Please contact the bot administrator.".to_string()
      }
      _ => match action {
        Action::View(key) => format!("❌ Failed to fetch {key}. Jira returned an error."),
        Action::Comment(key) => format!("❌ Failed to add comment to {key}. Jira returned an error."),
        Action::Comments(key) | Action::FullComment(key) => {
          format!("❌ Failed to load comments for {key}. Jira returned an error.")
        }
        Action::Search => "❌ Search failed. Jira returned an error.".to_string(),
      },
    },
  };
  Reply::text(text)
}
