//! Bot behavior layered on top of a [`Connection`].
//!
//! - [`ChatLogger`]: logs chat traffic
//! - [`AutoReply`]: emote call-and-response
//! - [`CommandReplies`]: fixed `!command` replies
//! - [`rewards`]: channel point redemptions

mod auto_reply;
mod commands;
mod logger;
pub mod rewards;

pub use auto_reply::AutoReply;
pub use commands::CommandReplies;
pub use logger::ChatLogger;

use tracing::{info, warn};

use crate::config::BotConfig;
use crate::network::{ChatHandle, Connection};

/// Register the bot's listeners. Order matters: the logger sees every
/// message before anything replies to it.
pub fn install(connection: &mut Connection, config: &BotConfig, nick: &str) {
    connection
        .on_message(ChatLogger)
        .on_message(AutoReply::new(config.auto_replies.clone(), nick))
        .on_message(CommandReplies::new(&config.commands));
    info!(
        auto_replies = config.auto_replies.len(),
        commands = config.commands.len(),
        "Bot listeners installed"
    );
}

/// Send the configured greeting once the connection is ready.
pub fn spawn_greeting(chat: &ChatHandle, greeting: &str) {
    if greeting.trim().is_empty() {
        return;
    }

    let chat = chat.clone();
    let greeting = greeting.to_owned();
    tokio::spawn(async move {
        if let Err(e) = chat.send_privmsg(greeting).await {
            warn!(error = %e, "Failed to send greeting");
        }
    });
}
