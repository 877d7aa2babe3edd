//! # jira-gram Entry Point
//!
//! Parses flags, sets up tracing, loads settings and runs the bot.

use anyhow::{Context, Result};
use clap::Parser;
use gram_bot::cli::Cli;
use gram_core::Settings;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // Set up tracing based on verbosity level
  let level = cli.log_level();
  tracing_subscriber::registry()
    .with(fmt::layer())
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  // Invalid configuration is fatal before anything binds or connects
  let settings = Settings::load(cli.env_file.as_deref()).context("Failed to load settings")?;

  gram_bot::run(settings, cli.polling).await
}
