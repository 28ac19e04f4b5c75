//! `!command` replies.

use std::collections::HashMap;

use tmi_proto::{CommandKind, ParsedMessage};
use tracing::{debug, warn};

use crate::config::CommandReply;
use crate::network::{ChatHandle, MessageListener};

/// Fixed replies keyed by bot command name.
///
/// Names match case-insensitively. `{user}` in a reply is replaced with the
/// sender's display name.
#[derive(Debug, Clone, Default)]
pub struct CommandReplies {
    replies: HashMap<String, String>,
}

impl CommandReplies {
    pub fn new(commands: &[CommandReply]) -> Self {
        let replies = commands
            .iter()
            .map(|c| (c.name.trim_start_matches('!').to_lowercase(), c.reply.clone()))
            .collect();
        Self { replies }
    }

    fn reply_for(&self, message: &ParsedMessage) -> Option<String> {
        if !matches!(message.command.kind, CommandKind::Privmsg { .. }) {
            return None;
        }
        let command = message.bot_command()?;
        let reply = self.replies.get(&command.name.to_lowercase())?;
        let user = message.display_name().unwrap_or("chat");
        Some(reply.replace("{user}", user))
    }
}

impl MessageListener for CommandReplies {
    fn on_message(&mut self, message: &ParsedMessage, chat: &ChatHandle) {
        let Some(reply) = self.reply_for(message) else {
            return;
        };

        debug!(command = ?message.bot_command().map(|c| &c.name), "Command reply");
        if let Err(e) = chat.say(reply) {
            warn!(error = %e, "Failed to queue command reply");
        }
    }
}
