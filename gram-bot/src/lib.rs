//! # jira-gram Bot
//!
//! The Telegram side of the bot: command dispatch, reply formatting and the
//! polling and webhook transports.

pub mod app;
pub mod cli;
pub mod dispatch;
pub mod reply;
pub mod telegram;

pub use app::{App, run};
pub use dispatch::{Dispatcher, Sender};
pub use reply::Reply;
