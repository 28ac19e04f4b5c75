//! Command types.
//!
//! Only the commands a chat bot acts on are modelled. Numeric replies and
//! anything else the server sends never become a [`Command`].

use std::fmt;

/// The command of a parsed line, with the fields meaningful to it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommandKind {
    /// `JOIN #channel` (membership capability).
    Join {
        /// Channel name, `#` included.
        channel: String,
    },
    /// `PART #channel` (membership capability).
    Part {
        /// Channel name, `#` included.
        channel: String,
    },
    /// `NOTICE #channel :text`
    Notice {
        /// Channel name, `#` included.
        channel: String,
    },
    /// `CLEARCHAT #channel [:user]` (chat cleared or user banned/timed out).
    ClearChat {
        /// Channel name, `#` included.
        channel: String,
    },
    /// `HOSTTARGET #channel :target viewers`
    HostTarget {
        /// Channel name, `#` included.
        channel: String,
    },
    /// `PRIVMSG #channel :text`
    Privmsg {
        /// Channel name, `#` included.
        channel: String,
    },
    /// `USERSTATE #channel` (commands capability).
    UserState {
        /// Channel name, `#` included.
        channel: String,
    },
    /// `ROOMSTATE #channel` (commands capability).
    RoomState {
        /// Channel name, `#` included.
        channel: String,
    },
    /// `CAP * ACK :caps` / `CAP * NAK :caps`
    Cap {
        /// `true` iff the server acknowledged the request.
        is_cap_request_enabled: bool,
    },
    /// `PING :tmi.twitch.tv`
    Ping,
    /// `GLOBALUSERSTATE` (sent once after login).
    GlobalUserState,
    /// `RECONNECT`: the server is about to drop the connection.
    Reconnect,
}

impl CommandKind {
    /// The wire token for this command.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Join { .. } => "JOIN",
            CommandKind::Part { .. } => "PART",
            CommandKind::Notice { .. } => "NOTICE",
            CommandKind::ClearChat { .. } => "CLEARCHAT",
            CommandKind::HostTarget { .. } => "HOSTTARGET",
            CommandKind::Privmsg { .. } => "PRIVMSG",
            CommandKind::UserState { .. } => "USERSTATE",
            CommandKind::RoomState { .. } => "ROOMSTATE",
            CommandKind::Cap { .. } => "CAP",
            CommandKind::Ping => "PING",
            CommandKind::GlobalUserState => "GLOBALUSERSTATE",
            CommandKind::Reconnect => "RECONNECT",
        }
    }

    /// The channel, for channel-scoped commands.
    pub fn channel(&self) -> Option<&str> {
        match self {
            CommandKind::Join { channel }
            | CommandKind::Part { channel }
            | CommandKind::Notice { channel }
            | CommandKind::ClearChat { channel }
            | CommandKind::HostTarget { channel }
            | CommandKind::Privmsg { channel }
            | CommandKind::UserState { channel }
            | CommandKind::RoomState { channel } => Some(channel),
            CommandKind::Cap { .. }
            | CommandKind::Ping
            | CommandKind::GlobalUserState
            | CommandKind::Reconnect => None,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.channel() {
            Some(channel) => write!(f, "{} {}", self.name(), channel),
            None => f.write_str(self.name()),
        }
    }
}

/// A `!command args` typed into chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotCommand {
    /// The token right after `!`.
    pub name: String,
    /// Everything after the name, trimmed. `None` when nothing follows.
    pub params: Option<String>,
}

/// A classified command plus the bot command found in its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    /// Which command this is.
    pub kind: CommandKind,
    /// Set when the parameters start with `!`.
    pub bot_command: Option<BotCommand>,
}

impl Command {
    /// Wrap a kind with no bot command.
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            bot_command: None,
        }
    }

    /// Shorthand for [`CommandKind::channel`].
    pub fn channel(&self) -> Option<&str> {
        self.kind.channel()
    }
}

impl From<CommandKind> for Command {
    fn from(kind: CommandKind) -> Self {
        Command::new(kind)
    }
}
