//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, TwitchConfig, BotConfig)
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks

mod defaults;
mod types;
pub mod validation;

pub use types::{AutoReplyRule, BotConfig, CommandReply, Config, ConfigError, TwitchConfig};
