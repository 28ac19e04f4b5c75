//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::network::EndpointConnector;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("twitch.channel is required")]
    MissingChannel,
    #[error("twitch.channel must not start with '#', got '{0}'")]
    ChannelHasHash(String),
    #[error("twitch.nick is required")]
    MissingNick,
    #[error("twitch.url must be ws://, wss://, or irc://, got '{0}'")]
    UnsupportedUrl(String),
    #[error("no OAuth token: set twitch.oauth_token or TWITCH_IRC_BOT_OAUTH")]
    MissingToken,
    #[error("bot.{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("bot.timeout_reasons must not be empty")]
    NoTimeoutReasons,
    #[error("bot.auto_replies has an empty trigger")]
    EmptyTrigger,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let twitch = &config.twitch;

    // Required fields
    if twitch.channel.trim().is_empty() {
        errors.push(ValidationError::MissingChannel);
    } else if twitch.channel.starts_with('#') {
        errors.push(ValidationError::ChannelHasHash(twitch.channel.clone()));
    }
    if twitch.nick.trim().is_empty() {
        errors.push(ValidationError::MissingNick);
    }
    if EndpointConnector::new(&twitch.url).is_err() {
        errors.push(ValidationError::UnsupportedUrl(twitch.url.clone()));
    }
    if twitch.token().is_err() {
        errors.push(ValidationError::MissingToken);
    }

    // Rewards
    let bot = &config.bot;
    if bot.timeout_seconds == 0 {
        errors.push(ValidationError::ZeroDuration("timeout_seconds"));
    }
    if bot.emote_only_seconds == 0 {
        errors.push(ValidationError::ZeroDuration("emote_only_seconds"));
    }
    if bot.timeout_reasons.is_empty() {
        errors.push(ValidationError::NoTimeoutReasons);
    }
    if bot.auto_replies.iter().any(|rule| rule.trigger.is_empty()) {
        errors.push(ValidationError::EmptyTrigger);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
