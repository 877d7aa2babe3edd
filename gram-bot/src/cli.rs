//! # Command Line Interface
//!
//! Process flags. Everything else is configured through the environment.

use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser};

/// Top-level CLI for the bot
#[derive(Debug, Parser)]
#[command(name = "jira-gram")]
#[command(about = "A Telegram bot for viewing, commenting on and searching Jira issues")]
#[command(
  long_about = "jira-gram relays Telegram slash-commands to the Jira REST API.\n\n\
        Credentials and options are read from the environment, optionally\n\
        seeded from a .env file. When WEBHOOK_URL is set the bot serves a\n\
        webhook; otherwise it long-polls Telegram for updates."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show debug level messages\n\
             -vv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Read settings from this file instead of ./.env
  #[arg(long = "env-file", value_name = "PATH")]
  pub env_file: Option<PathBuf>,

  /// Long-poll for updates even when WEBHOOK_URL is set
  #[arg(long)]
  pub polling: bool,
}

impl Cli {
  /// Base log level for the verbosity count
  pub fn log_level(&self) -> tracing::Level {
    match self.verbose {
      0 => tracing::Level::INFO,
      1 => tracing::Level::DEBUG,
      _ => tracing::Level::TRACE,
    }
  }
}
