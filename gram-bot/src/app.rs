//! # Application Wiring
//!
//! Builds the long-lived pieces from [`Settings`] and starts the selected
//! transport.

use std::sync::Arc;

use anyhow::{Context, Result};
use gram_core::{Settings, TransportMode};
use gram_jira::{JiraAuth, JiraClient};
use tracing::{info, warn};

use crate::dispatch::Dispatcher;
use crate::telegram::BotApi;
use crate::telegram::polling::run_polling;
use crate::telegram::webhook::{WebhookState, run_webhook};

/// The bot, ready to run
pub struct App {
  pub api: BotApi,
  pub jira: JiraClient,
  pub dispatcher: Arc<Dispatcher>,
}

impl App {
  /// Build the clients and ask Telegram for the bot's username. Without
  /// the username, commands addressed to other bots are answered too.
  pub async fn from_settings(settings: &Settings) -> Result<Self> {
    let auth = JiraAuth {
      username: settings.jira_email.clone(),
      api_token: settings.jira_api_token.clone(),
    };
    let jira =
      JiraClient::new(&settings.jira_url, auth, settings.jira_timeout).context("Failed to create Jira client")?;
    let api = BotApi::new(&settings.telegram_api_url, &settings.telegram_bot_token)
      .context("Failed to create Telegram client")?;

    let bot_username = match api.get_me().await {
      Ok(me) => {
        info!("Running as @{}", me.username.as_deref().unwrap_or("<no username>"));
        me.username
      }
      Err(error) => {
        warn!("Could not look up the bot's username: {}", error);
        None
      }
    };
    let dispatcher = Arc::new(
      Dispatcher::new(jira.clone(), settings.allowed_users.clone(), settings.search_max_results)
        .with_bot_username(bot_username),
    );

    Ok(Self { api, jira, dispatcher })
  }

  /// Log whether the Jira credentials work. A failure is not fatal; every
  /// request reports its own error later.
  pub async fn check_jira(&self) {
    match self.jira.test_connection().await {
      Ok(true) => info!("Connected to Jira at {}", self.jira.base_url()),
      Ok(false) => warn!("Jira at {} did not accept the configured credentials", self.jira.base_url()),
      Err(error) => warn!("Could not reach Jira at {}: {}", self.jira.base_url(), error),
    }
  }
}

/// Start the bot with the transport chosen by `settings`, or polling when
/// `force_polling` is set
pub async fn run(settings: Settings, force_polling: bool) -> Result<()> {
  let app = App::from_settings(&settings).await?;

  if settings.allowed_users.is_open() {
    warn!("ALLOWED_USERS is empty, the bot will answer anyone");
  } else {
    info!("Access restricted to {} users", settings.allowed_users.len());
  }
  app.check_jira().await;

  match settings.transport_mode() {
    TransportMode::Webhook { endpoint } if !force_polling => {
      let state = WebhookState {
        api: app.api,
        dispatcher: app.dispatcher,
        secret: settings.webhook_secret.clone(),
      };
      run_webhook(state, &endpoint, &settings.webhook_path, &settings.bind_address()).await
    }
    _ => run_polling(app.api, app.dispatcher).await,
  }
}
