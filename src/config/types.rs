//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_auto_replies, default_emote_only_seconds, default_greeting, default_timeout_reasons,
    default_timeout_seconds, default_url,
};
use crate::network::ConnectionSettings;

/// Environment variable that overrides `twitch.oauth_token`.
pub const TOKEN_ENV: &str = "TWITCH_IRC_BOT_OAUTH";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no OAuth token: set twitch.oauth_token or TWITCH_IRC_BOT_OAUTH")]
    MissingToken,
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat login and endpoint.
    pub twitch: TwitchConfig,
    /// Bot behavior.
    #[serde(default)]
    pub bot: BotConfig,
}

impl Config {
    /// Load configuration from a TOML file, then apply the token from the
    /// environment if set.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_token_override(std::env::var(TOKEN_ENV).ok());
        Ok(config)
    }

    /// A non-empty `token` replaces whatever the file said.
    pub fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.twitch.oauth_token = Some(token);
        }
    }
}

/// `[twitch]` section.
#[derive(Clone, Deserialize)]
pub struct TwitchConfig {
    /// Channel to join, without `#`.
    pub channel: String,
    /// Bot account login.
    pub nick: String,
    /// `wss://`, `ws://`, or `irc://` endpoint.
    #[serde(default = "default_url")]
    pub url: String,
    /// OAuth token; usually supplied through the environment instead.
    #[serde(default)]
    pub oauth_token: Option<String>,
}

impl TwitchConfig {
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.oauth_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    pub fn connection_settings(&self) -> Result<ConnectionSettings, ConfigError> {
        Ok(ConnectionSettings {
            channel: self.channel.clone(),
            nick: self.nick.clone(),
            token: self.token()?.to_owned(),
            url: self.url.clone(),
        })
    }
}

impl std::fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("channel", &self.channel)
            .field("nick", &self.nick)
            .field("url", &self.url)
            .field("oauth_token", &self.oauth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `[bot]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Sent once the bot has joined. Empty disables it.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Length of the "Timeout" reward.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Length of the "Emote-only Chat" reward.
    #[serde(default = "default_emote_only_seconds")]
    pub emote_only_seconds: u64,
    /// One is picked at random for each timeout.
    #[serde(default = "default_timeout_reasons")]
    pub timeout_reasons: Vec<String>,
    #[serde(default = "default_auto_replies")]
    pub auto_replies: Vec<AutoReplyRule>,
    /// `!name` replies.
    #[serde(default)]
    pub commands: Vec<CommandReply>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            timeout_seconds: default_timeout_seconds(),
            emote_only_seconds: default_emote_only_seconds(),
            timeout_reasons: default_timeout_reasons(),
            auto_replies: default_auto_replies(),
            commands: Vec::new(),
        }
    }
}

/// Reply with `reply` when a chat message contains `trigger`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutoReplyRule {
    pub trigger: String,
    pub reply: String,
}

/// Reply with `reply` to `!name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandReply {
    pub name: String,
    pub reply: String,
}
