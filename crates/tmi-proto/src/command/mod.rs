//! Twitch chat command types and classification.

mod classify;
mod types;

pub use self::classify::{classify_command, extract_bot_command};
pub use self::types::{BotCommand, Command, CommandKind};
