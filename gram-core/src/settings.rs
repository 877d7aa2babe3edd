//! # Settings
//!
//! Process configuration sourced from environment variables, optionally
//! backed by a `.env` file. Values already present in the environment win
//! over the file. Settings are validated once at startup and then passed
//! around by reference; nothing re-reads the environment afterwards.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::access::{AllowList, AllowListError};
use crate::url::{UrlError, normalize_base_url, normalize_route_path};

pub const ENV_TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TELEGRAM_API_URL: &str = "TELEGRAM_API_URL";
pub const ENV_WEBHOOK_URL: &str = "WEBHOOK_URL";
pub const ENV_WEBHOOK_PATH: &str = "WEBHOOK_PATH";
pub const ENV_WEBHOOK_SECRET: &str = "WEBHOOK_SECRET";
pub const ENV_JIRA_URL: &str = "JIRA_URL";
pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const ENV_JIRA_TIMEOUT_SECS: &str = "JIRA_TIMEOUT_SECS";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ALLOWED_USERS: &str = "ALLOWED_USERS";
pub const ENV_SEARCH_MAX_RESULTS: &str = "SEARCH_MAX_RESULTS";

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_JIRA_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SEARCH_MAX_RESULTS: u32 = 10;
pub const MAX_SEARCH_MAX_RESULTS: u32 = 50;

/// Errors raised while loading settings. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("Missing required configuration: {}", .0.join(", "))]
  Missing(Vec<&'static str>),

  #[error("Invalid {key}: {source}")]
  InvalidUrl {
    key: &'static str,
    #[source]
    source: UrlError,
  },

  #[error("Invalid ALLOWED_USERS: {0}")]
  InvalidAllowList(#[from] AllowListError),

  #[error("Invalid {key}: '{value}' is not a valid number")]
  InvalidNumber { key: &'static str, value: String },

  #[error("Invalid {key}: {value} must be between {min} and {max}")]
  OutOfRange {
    key: &'static str,
    value: u64,
    min: u64,
    max: u64,
  },

  #[error("Failed to read env file {}: {source}", .path.display())]
  EnvFile {
    path: PathBuf,
    #[source]
    source: dotenvy::Error,
  },
}

/// How updates reach the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
  /// Repeatedly call `getUpdates`
  Polling,
  /// Telegram posts updates to this public URL
  Webhook { endpoint: String },
}

/// Validated application settings
#[derive(Clone)]
pub struct Settings {
  pub telegram_bot_token: String,
  pub telegram_api_url: String,
  pub webhook_url: Option<String>,
  pub webhook_path: String,
  pub webhook_secret: Option<String>,
  pub jira_url: String,
  pub jira_email: String,
  pub jira_api_token: String,
  pub jira_timeout: Duration,
  pub host: String,
  pub port: u16,
  pub allowed_users: AllowList,
  pub search_max_results: u32,
}

impl fmt::Debug for Settings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Settings")
      .field("telegram_bot_token", &"<redacted>")
      .field("telegram_api_url", &self.telegram_api_url)
      .field("webhook_url", &self.webhook_url)
      .field("webhook_path", &self.webhook_path)
      .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
      .field("jira_url", &self.jira_url)
      .field("jira_email", &self.jira_email)
      .field("jira_api_token", &"<redacted>")
      .field("jira_timeout", &self.jira_timeout)
      .field("host", &self.host)
      .field("port", &self.port)
      .field("allowed_users", &self.allowed_users.len())
      .field("search_max_results", &self.search_max_results)
      .finish()
  }
}

impl Settings {
  /// Load settings from the environment, falling back to a `.env` file.
  ///
  /// With `env_file` set, that file must exist and parse. Without it, a
  /// `.env` in the working directory is used when present.
  pub fn load(env_file: Option<&Path>) -> Result<Self, SettingsError> {
    let file_values = match env_file {
      Some(path) => read_env_file(path)?,
      None => {
        let default_path = Path::new(".env");
        if default_path.is_file() {
          read_env_file(default_path)?
        } else {
          HashMap::new()
        }
      }
    };

    Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file_values.get(key).cloned()))
  }

  /// Build settings from an arbitrary key lookup. Blank values count as
  /// unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| {
      lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    };

    let mut missing = Vec::new();
    let mut require = |key: &'static str| {
      let value = get(key);
      if value.is_none() {
        missing.push(key);
      }
      value.unwrap_or_default()
    };

    let telegram_bot_token = require(ENV_TELEGRAM_BOT_TOKEN);
    let jira_url = require(ENV_JIRA_URL);
    let jira_email = require(ENV_JIRA_EMAIL);
    let jira_api_token = require(ENV_JIRA_API_TOKEN);

    if !missing.is_empty() {
      return Err(SettingsError::Missing(missing));
    }

    let jira_url = normalize_base_url(&jira_url).map_err(|source| SettingsError::InvalidUrl {
      key: ENV_JIRA_URL,
      source,
    })?;

    let telegram_api_url = match get(ENV_TELEGRAM_API_URL) {
      Some(url) => normalize_base_url(&url).map_err(|source| SettingsError::InvalidUrl {
        key: ENV_TELEGRAM_API_URL,
        source,
      })?,
      None => DEFAULT_TELEGRAM_API_URL.to_string(),
    };

    let webhook_url = get(ENV_WEBHOOK_URL)
      .map(|url| {
        normalize_base_url(&url).map_err(|source| SettingsError::InvalidUrl {
          key: ENV_WEBHOOK_URL,
          source,
        })
      })
      .transpose()?;

    let webhook_path = normalize_route_path(&get(ENV_WEBHOOK_PATH).unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.to_string()));

    let allowed_users = match get(ENV_ALLOWED_USERS) {
      Some(list) => list.parse::<AllowList>()?,
      None => AllowList::open(),
    };

    let port = parse_number(&get, ENV_PORT, u64::from(DEFAULT_PORT), 1, u64::from(u16::MAX))?;
    let jira_timeout_secs = parse_number(&get, ENV_JIRA_TIMEOUT_SECS, DEFAULT_JIRA_TIMEOUT_SECS, 1, 300)?;
    let search_max_results = parse_number(
      &get,
      ENV_SEARCH_MAX_RESULTS,
      u64::from(DEFAULT_SEARCH_MAX_RESULTS),
      1,
      u64::from(MAX_SEARCH_MAX_RESULTS),
    )?;

    let settings = Self {
      telegram_bot_token,
      telegram_api_url,
      webhook_url,
      webhook_path,
      webhook_secret: get(ENV_WEBHOOK_SECRET),
      jira_url,
      jira_email,
      jira_api_token,
      jira_timeout: Duration::from_secs(jira_timeout_secs),
      host: get(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
      // Range-checked above.
      port: port as u16,
      allowed_users,
      search_max_results: search_max_results as u32,
    };
    debug!("Loaded settings: {:?}", settings);

    Ok(settings)
  }

  /// Webhook mode when a public webhook URL is configured, polling otherwise
  pub fn transport_mode(&self) -> TransportMode {
    match &self.webhook_url {
      Some(url) => TransportMode::Webhook {
        endpoint: format!("{}{}", url, self.webhook_path),
      },
      None => TransportMode::Polling,
    }
  }

  /// Socket address the webhook server binds to
  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, SettingsError> {
  let to_error = |source| SettingsError::EnvFile {
    path: path.to_path_buf(),
    source,
  };
  dotenvy::from_path_iter(path)
    .map_err(to_error)?
    .collect::<Result<HashMap<_, _>, _>>()
    .map_err(to_error)
}

fn parse_number<G>(get: &G, key: &'static str, default: u64, min: u64, max: u64) -> Result<u64, SettingsError>
where
  G: Fn(&str) -> Option<String>,
{
  let Some(raw) = get(key) else {
    return Ok(default);
  };
  let value = raw
    .parse::<u64>()
    .map_err(|_| SettingsError::InvalidNumber { key, value: raw.clone() })?;
  if !(min..=max).contains(&value) {
    return Err(SettingsError::OutOfRange { key, value, min, max });
  }
  Ok(value)
}

#[cfg(test)]
mod tests {
  use gram_test_utils::{DotenvGuard, EnvVarGuard};

  use super::*;

  fn base_env() -> HashMap<&'static str, String> {
    HashMap::from([
      (ENV_TELEGRAM_BOT_TOKEN, "test_token".to_string()),
      (ENV_JIRA_URL, "https://test.atlassian.net".to_string()),
      (ENV_JIRA_EMAIL, "test@example.com".to_string()),
      (ENV_JIRA_API_TOKEN, "test_api_token".to_string()),
    ])
  }

  fn load(env: &HashMap<&'static str, String>) -> Result<Settings, SettingsError> {
    Settings::from_lookup(|key| env.get(key).cloned())
  }

  #[test]
  fn test_settings_with_valid_env() {
    let settings = load(&base_env()).unwrap();

    assert_eq!(settings.telegram_bot_token, "test_token");
    assert_eq!(settings.jira_url, "https://test.atlassian.net");
    assert_eq!(settings.jira_email, "test@example.com");
    assert_eq!(settings.jira_api_token, "test_api_token");
  }

  #[test]
  fn test_settings_defaults() {
    let settings = load(&base_env()).unwrap();

    assert_eq!(settings.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
    assert_eq!(settings.webhook_url, None);
    assert_eq!(settings.webhook_path, "/webhook");
    assert_eq!(settings.host, "0.0.0.0");
    assert_eq!(settings.port, 8000);
    assert_eq!(settings.jira_timeout, Duration::from_secs(10));
    assert_eq!(settings.search_max_results, 10);
    assert!(settings.allowed_users.is_open());
    assert_eq!(settings.transport_mode(), TransportMode::Polling);
    assert_eq!(settings.bind_address(), "0.0.0.0:8000");
  }

  #[test]
  fn test_missing_required_fields_are_all_reported() {
    let mut env = base_env();
    env.remove(ENV_JIRA_URL);
    env.insert(ENV_JIRA_API_TOKEN, "   ".to_string());

    let err = load(&env).unwrap_err();
    match &err {
      SettingsError::Missing(keys) => assert_eq!(keys, &vec![ENV_JIRA_URL, ENV_JIRA_API_TOKEN]),
      other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
      err.to_string(),
      "Missing required configuration: JIRA_URL, JIRA_API_TOKEN"
    );
  }

  #[test]
  fn test_jira_url_validation() {
    let mut env = base_env();
    env.insert(ENV_JIRA_URL, "invalid-url".to_string());

    let err = load(&env).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidUrl { key: ENV_JIRA_URL, .. }));
    assert!(err.to_string().contains("JIRA_URL"));
  }

  #[test]
  fn test_jira_url_trailing_slash_removed() {
    let mut env = base_env();
    env.insert(ENV_JIRA_URL, "https://test.atlassian.net/".to_string());

    let settings = load(&env).unwrap();
    assert_eq!(settings.jira_url, "https://test.atlassian.net");
  }

  #[test]
  fn test_allowed_user_ids_parsing() {
    let mut env = base_env();
    env.insert(ENV_ALLOWED_USERS, "123,456, 789".to_string());

    let settings = load(&env).unwrap();
    assert_eq!(settings.allowed_users.len(), 3);
    assert!(settings.allowed_users.contains(789));
  }

  #[test]
  fn test_malformed_allow_list_fails_fast() {
    let mut env = base_env();
    env.insert(ENV_ALLOWED_USERS, "123,bob".to_string());

    let err = load(&env).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidAllowList(_)));
    assert!(err.to_string().contains("bob"));
  }

  #[test]
  fn test_numeric_settings_are_validated() {
    let mut env = base_env();
    env.insert(ENV_PORT, "eighty".to_string());
    assert!(matches!(
      load(&env).unwrap_err(),
      SettingsError::InvalidNumber { key: ENV_PORT, .. }
    ));

    let mut env = base_env();
    env.insert(ENV_PORT, "70000".to_string());
    assert!(matches!(
      load(&env).unwrap_err(),
      SettingsError::OutOfRange { key: ENV_PORT, .. }
    ));

    let mut env = base_env();
    env.insert(ENV_SEARCH_MAX_RESULTS, "0".to_string());
    assert!(matches!(
      load(&env).unwrap_err(),
      SettingsError::OutOfRange {
        key: ENV_SEARCH_MAX_RESULTS,
        ..
      }
    ));
  }

  #[test]
  fn test_webhook_mode() {
    let mut env = base_env();
    env.insert(ENV_WEBHOOK_URL, "https://bot.example.com/".to_string());
    env.insert(ENV_WEBHOOK_PATH, "tg-hook".to_string());
    env.insert(ENV_PORT, "9000".to_string());

    let settings = load(&env).unwrap();
    assert_eq!(settings.webhook_path, "/tg-hook");
    assert_eq!(
      settings.transport_mode(),
      TransportMode::Webhook {
        endpoint: "https://bot.example.com/tg-hook".to_string()
      }
    );
    assert_eq!(settings.port, 9000);
  }

  #[test]
  fn test_debug_output_redacts_secrets() {
    let mut env = base_env();
    env.insert(ENV_WEBHOOK_SECRET, "hook-secret".to_string());

    let rendered = format!("{:?}", load(&env).unwrap());
    assert!(!rendered.contains("test_token"));
    assert!(!rendered.contains("test_api_token"));
    assert!(!rendered.contains("hook-secret"));
    assert!(rendered.contains("test.atlassian.net"));
  }

  // Reads and mutates the process environment; keep every env-dependent
  // assertion in this one test.
  #[test]
  fn test_load_merges_env_file_and_environment() {
    let dotenv = DotenvGuard::new(
      "TELEGRAM_BOT_TOKEN=file_token\n\
       JIRA_URL=https://file.atlassian.net/\n\
       JIRA_EMAIL=file@example.com\n\
       JIRA_API_TOKEN=file_api_token\n",
    );
    let guards: Vec<EnvVarGuard> = [
      ENV_TELEGRAM_BOT_TOKEN,
      ENV_JIRA_URL,
      ENV_JIRA_EMAIL,
      ENV_JIRA_API_TOKEN,
      ENV_TELEGRAM_API_URL,
      ENV_WEBHOOK_URL,
      ENV_WEBHOOK_PATH,
      ENV_WEBHOOK_SECRET,
      ENV_JIRA_TIMEOUT_SECS,
      ENV_HOST,
      ENV_PORT,
      ENV_ALLOWED_USERS,
      ENV_SEARCH_MAX_RESULTS,
    ]
    .into_iter()
    .map(|key| {
      let guard = EnvVarGuard::new(key);
      guard.remove();
      guard
    })
    .collect();

    let settings = Settings::load(Some(dotenv.path())).unwrap();
    assert_eq!(settings.telegram_bot_token, "file_token");
    assert_eq!(settings.jira_url, "https://file.atlassian.net");

    // The environment wins over the file.
    guards[0].set("env_token");
    let settings = Settings::load(Some(dotenv.path())).unwrap();
    assert_eq!(settings.telegram_bot_token, "env_token");

    let missing = dotenv.temp_dir.path().join("missing.env");
    assert!(matches!(
      Settings::load(Some(&missing)).unwrap_err(),
      SettingsError::EnvFile { .. }
    ));
  }
}
