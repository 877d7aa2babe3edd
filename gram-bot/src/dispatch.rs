//! # Command Dispatcher
//!
//! Maps an inbound message or button press onto at most one Jira call and
//! exactly one [`Reply`]. The dispatcher holds no per-user state; it is
//! built once at startup and shared read-only between update tasks.

use gram_core::{AllowList, Command, IssueKey, ParseError, addressee, is_allowed};
use gram_jira::{ErrorKind, JiraClient};
use tracing::{debug, info, instrument, warn};

use crate::reply::{self, Action, Reply};

/// Who sent an update
#[derive(Debug, Clone)]
pub struct Sender {
  pub user_id: i64,
  /// Name used when attributing comments
  pub display_name: String,
}

/// Decoded inline keyboard callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
  /// "Add Comment": explain how to comment
  CommentHint(IssueKey),
  /// "View Comments": list the latest comments
  Comments(IssueKey),
  /// "Back": show the issue card again
  View(IssueKey),
  /// "View Full": show one comment without truncation
  FullComment(IssueKey, String),
}

impl CallbackAction {
  /// Parse `comment:KEY`, `comments:KEY`, `view:KEY` or
  /// `comment_full:KEY|COMMENT_ID`
  pub fn parse(data: &str) -> Option<Self> {
    let (action, payload) = data.split_once(':')?;
    if action == "comment_full" {
      let (key, comment_id) = payload.split_once('|')?;
      if comment_id.is_empty() || !comment_id.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
      }
      return Some(CallbackAction::FullComment(IssueKey::parse(key).ok()?, comment_id.to_string()));
    }

    let key = IssueKey::parse(payload).ok()?;
    match action {
      "comment" => Some(CallbackAction::CommentHint(key)),
      "comments" => Some(CallbackAction::Comments(key)),
      "view" => Some(CallbackAction::View(key)),
      _ => None,
    }
  }
}

/// Stateless request handler shared by both transports
pub struct Dispatcher {
  jira: JiraClient,
  allowed_users: AllowList,
  search_max_results: u32,
  /// The bot's own username, as reported by `getMe`
  bot_username: Option<String>,
}

impl Dispatcher {
  pub fn new(jira: JiraClient, allowed_users: AllowList, search_max_results: u32) -> Self {
    Self {
      jira,
      allowed_users,
      search_max_results,
      bot_username: None,
    }
  }

  /// Ignore commands whose `@botname` suffix names a different bot
  pub fn with_bot_username(mut self, bot_username: Option<String>) -> Self {
    self.bot_username = bot_username;
    self
  }

  /// Whether `text` is a command addressed to some other bot. Without a
  /// known username every command is taken as ours.
  pub fn ignores(&self, text: &str) -> bool {
    match (addressee(text), self.bot_username.as_deref()) {
      (Some(target), Some(own)) => !target.eq_ignore_ascii_case(own),
      _ => false,
    }
  }

  /// Handle the text of a message. Returns `None` when the message is a
  /// command for another bot and must go unanswered.
  #[instrument(skip(self, text), fields(user_id = sender.user_id))]
  pub async fn handle_text(&self, sender: &Sender, text: &str) -> Option<Reply> {
    if self.ignores(text) {
      debug!("Ignoring command addressed to another bot");
      return None;
    }
    Some(self.handle_own_text(sender, text).await)
  }

  async fn handle_own_text(&self, sender: &Sender, text: &str) -> Reply {
    if !is_allowed(sender.user_id, &self.allowed_users) {
      warn!("Rejected message from unauthorized user");
      return reply::denied();
    }

    let command = match Command::parse(text) {
      Ok(command) => command,
      Err(ParseError::NotACommand) => return reply::not_a_command(),
      Err(ParseError::MissingArguments(name)) => {
        debug!("Missing arguments for {}", name);
        return reply::usage(name);
      }
      Err(ParseError::InvalidIssueKey(input)) => return reply::invalid_issue_key(&input),
    };

    match command {
      Command::Start => reply::welcome(),
      Command::View { key } => self.view(&key).await,
      Command::Comment { key, text } => self.comment(sender, &key, &text).await,
      Command::Search { query } => self.search(&query).await,
      Command::Unknown { name } => {
        debug!("Unknown command /{}", name);
        reply::unknown_command(&name)
      }
    }
  }

  /// Handle the data attached to a pressed inline button
  #[instrument(skip(self), fields(user_id = sender.user_id))]
  pub async fn handle_callback(&self, sender: &Sender, data: &str) -> Reply {
    if !is_allowed(sender.user_id, &self.allowed_users) {
      warn!("Rejected callback from unauthorized user");
      return reply::denied();
    }

    match CallbackAction::parse(data) {
      Some(CallbackAction::CommentHint(key)) => reply::comment_hint(&key),
      Some(CallbackAction::Comments(key)) => self.list_comments(&key).await,
      Some(CallbackAction::View(key)) => self.view(&key).await,
      Some(CallbackAction::FullComment(key, comment_id)) => self.full_comment(&key, &comment_id).await,
      None => {
        debug!("Unsupported callback data");
        Reply::text(reply::UNKNOWN_ACTION)
      }
    }
  }

  async fn view(&self, key: &IssueKey) -> Reply {
    match self.jira.get_issue(key.as_str()).await {
      Ok(issue) => reply::issue(&issue, &self.jira.browse_url(&issue.key)),
      Err(error) => {
        warn!("Failed to fetch {}: {}", key, error);
        reply::jira_failure(Action::View(key), &error)
      }
    }
  }

  async fn comment(&self, sender: &Sender, key: &IssueKey, text: &str) -> Reply {
    let body = format!("Comment from Telegram ({}):\n{}", sender.display_name, text);
    match self.jira.add_comment(key.as_str(), &body).await {
      Ok(created) => {
        info!("Added comment {} to {}", created.id, key);
        reply::comment_added(key)
      }
      Err(error) => {
        warn!("Failed to add comment to {}: {}", key, error);
        reply::jira_failure(Action::Comment(key), &error)
      }
    }
  }

  async fn list_comments(&self, key: &IssueKey) -> Reply {
    match self.jira.get_comments(key.as_str()).await {
      Ok(comments) => reply::comments(key, &comments),
      Err(error) => {
        warn!("Failed to load comments for {}: {}", key, error);
        reply::jira_failure(Action::Comments(key), &error)
      }
    }
  }

  async fn full_comment(&self, key: &IssueKey, comment_id: &str) -> Reply {
    match self.jira.get_comment(key.as_str(), comment_id).await {
      Ok(comment) => reply::full_comment(key, &comment),
      Err(error) if error.kind() == ErrorKind::NotFound => {
        debug!("Comment {} on {} no longer exists", comment_id, key);
        reply::comment_not_found(key)
      }
      Err(error) => {
        warn!("Failed to load comment {} on {}: {}", comment_id, key, error);
        reply::jira_failure(Action::FullComment(key), &error)
      }
    }
  }

  async fn search(&self, query: &str) -> Reply {
    match self.jira.search(query, self.search_max_results).await {
      Ok(page) => reply::search_results(&page, |key| self.jira.browse_url(key)),
      Err(error) => {
        warn!("Search failed: {}", error);
        reply::jira_failure(Action::Search, &error)
      }
    }
  }
}
