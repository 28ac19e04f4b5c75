use crate::command::{BotCommand, Command};
use crate::source::Source;
use crate::tags::Tags;

/// One parsed chat line.
///
/// Only lines whose command is supported become a `ParsedMessage`; see
/// [`parse`](crate::parse).
///
/// # Example
///
/// ```
/// use tmi_proto::{CommandKind, ParsedMessage};
///
/// let msg: ParsedMessage = ":nick!user@host.tmi.twitch.tv PRIVMSG #channel :hello"
///     .parse()
///     .unwrap();
/// assert_eq!(msg.channel(), Some("#channel"));
/// assert_eq!(msg.sender_nick(), Some("nick"));
/// assert_eq!(msg.text(), Some("hello"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Decoded tag segment. `None` if absent or undecodable.
    pub tags: Option<Tags>,
    /// Sender, if the line had a source segment.
    pub source: Option<Source>,
    /// Classified command.
    pub command: Command,
    /// Trailing parameters (after the first `:`), trimmed.
    pub parameters: Option<String>,
}

impl ParsedMessage {
    /// Channel of a channel-scoped command.
    pub fn channel(&self) -> Option<&str> {
        self.command.channel()
    }

    /// Sender nickname.
    pub fn sender_nick(&self) -> Option<&str> {
        self.source.as_ref()?.nick.as_deref()
    }

    /// The `display-name` tag, falling back to the sender nick.
    pub fn display_name(&self) -> Option<&str> {
        self.tags
            .as_ref()
            .and_then(Tags::display_name)
            .or_else(|| self.sender_nick())
    }

    /// The trailing text (chat message body for PRIVMSG).
    pub fn text(&self) -> Option<&str> {
        self.parameters.as_deref()
    }

    /// The `!command` typed into chat, if any.
    pub fn bot_command(&self) -> Option<&BotCommand> {
        self.command.bot_command.as_ref()
    }
}
