//! Auto replies - answer an emote with the same emote.

use tmi_proto::{CommandKind, ParsedMessage};
use tracing::{debug, warn};

use crate::config::AutoReplyRule;
use crate::network::{ChatHandle, MessageListener};

/// Replies to the first rule whose trigger appears in a chat message.
#[derive(Debug, Clone)]
pub struct AutoReply {
    rules: Vec<AutoReplyRule>,
    own_nick: String,
}

impl AutoReply {
    pub fn new(rules: Vec<AutoReplyRule>, own_nick: &str) -> Self {
        Self {
            rules,
            own_nick: own_nick.to_ascii_lowercase(),
        }
    }

    /// The reply for `message`, if any.
    ///
    /// Only chat messages from someone other than the bot qualify, otherwise
    /// `catJAM` would answer itself forever.
    fn reply_for(&self, message: &ParsedMessage) -> Option<&str> {
        if !matches!(message.command.kind, CommandKind::Privmsg { .. }) {
            return None;
        }
        let sender = message.sender_nick()?;
        if sender.eq_ignore_ascii_case(&self.own_nick) {
            return None;
        }

        let text = message.text()?;
        self.rules
            .iter()
            .find(|rule| text.contains(rule.trigger.as_str()))
            .map(|rule| rule.reply.as_str())
    }
}

impl MessageListener for AutoReply {
    fn on_message(&mut self, message: &ParsedMessage, chat: &ChatHandle) {
        let Some(reply) = self.reply_for(message) else {
            return;
        };

        debug!(sender = message.sender_nick(), %reply, "Auto reply");
        if let Err(e) = chat.say(reply) {
            warn!(error = %e, "Failed to queue auto reply");
        }
    }
}
