//! Test utilities shared across the jira-gram workspace
//!
//! This crate provides common testing infrastructure including:
//! - Environment variable isolation ([`EnvVarGuard`], [`DotenvGuard`])
//! - Jira REST payload fixtures ([`tracker`])
//! - Telegram Bot API payload fixtures and mocks ([`telegram`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod telegram;
pub mod tracker;

// Re-export commonly used items
pub use env::{DotenvGuard, EnvVarGuard};
