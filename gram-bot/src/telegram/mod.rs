//! # Telegram Transport
//!
//! Bot API client, update handling and the two ways of receiving updates:
//! long polling and webhook.

pub mod api;
pub mod polling;
pub mod types;
pub mod updates;
pub mod webhook;

pub use api::{BotApi, TelegramError};
