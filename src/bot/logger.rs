//! Chat logger - writes interesting traffic to the log.

use tmi_proto::{CommandKind, ParsedMessage};
use tracing::{debug, info, trace, warn};

use crate::network::{ChatHandle, MessageListener};

/// Logs joins, chat, notices, and protocol events.
#[derive(Debug, Default)]
pub struct ChatLogger;

impl MessageListener for ChatLogger {
    fn on_message(&mut self, message: &ParsedMessage, _chat: &ChatHandle) {
        let nick = message.sender_nick().unwrap_or("?");
        let text = message.text().unwrap_or_default();

        match &message.command.kind {
            CommandKind::Join { channel } => info!(%nick, %channel, "User joined"),
            CommandKind::Part { channel } => debug!(%nick, %channel, "User left"),
            CommandKind::Privmsg { channel } => {
                let name = message.display_name().unwrap_or(nick);
                info!(%channel, "{name}: {text}");
            }
            CommandKind::Notice { channel } => {
                let msg_id = message
                    .tags
                    .as_ref()
                    .and_then(|tags| tags.text("msg-id"))
                    .unwrap_or("-");
                info!(%channel, %msg_id, "Notice: {text}");
            }
            CommandKind::ClearChat { channel } if text.is_empty() => {
                info!(%channel, "Chat cleared");
            }
            CommandKind::ClearChat { channel } => info!(%channel, user = %text, "Messages cleared"),
            CommandKind::HostTarget { channel } => info!(%channel, target = %text, "Host target"),
            CommandKind::Cap {
                is_cap_request_enabled: true,
            } => info!(capabilities = %text, "Capabilities acknowledged"),
            CommandKind::Cap { .. } => warn!(capabilities = %text, "Capability request rejected"),
            CommandKind::Reconnect => info!("Server is going away"),
            other => trace!(command = %other, "Message received"),
        }
    }
}
