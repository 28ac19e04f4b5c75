//! Lines the client writes to the server.
//!
//! Every outbound line is built through [`Outgoing`] so the formatting of
//! the handshake, keepalive replies, and chat messages lives in one place.
//! Text supplied by callers is cut at the first line ending; a chat message
//! can never smuggle a second protocol line onto the wire.

use std::fmt;

/// Host name Twitch uses in PING/PONG and server sources.
pub const TWITCH_HOST: &str = "tmi.twitch.tv";

/// Capability for JOIN/PART membership events.
pub const MEMBERSHIP_CAPABILITY: &str = "twitch.tv/membership";

/// Capabilities for message tags and Twitch-specific commands.
pub const TAGS_AND_COMMANDS_CAPABILITY: &str = "twitch.tv/tags twitch.tv/commands";

/// A single outbound line.
#[derive(Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// `PASS oauth:<token>`
    Pass(String),
    /// `NICK <nick>`
    Nick(String),
    /// `JOIN #<channel>`
    Join(String),
    /// `CAP REQ :<capabilities>`
    CapReq(String),
    /// `PONG :<server>`
    Pong(String),
    /// `PRIVMSG #<channel> :<text>`
    Privmsg {
        /// Channel name without `#`.
        channel: String,
        /// Message body.
        text: String,
    },
}

fn bare_channel(channel: &str) -> String {
    channel.trim_start_matches('#').to_owned()
}

impl Outgoing {
    /// `PASS`, adding the `oauth:` prefix if the token lacks it.
    #[must_use]
    pub fn pass(token: &str) -> Self {
        if token.starts_with("oauth:") {
            Outgoing::Pass(token.to_owned())
        } else {
            Outgoing::Pass(format!("oauth:{token}"))
        }
    }

    /// `NICK <nick>`
    #[must_use]
    pub fn nick(nick: impl Into<String>) -> Self {
        Outgoing::Nick(nick.into())
    }

    /// `JOIN #<channel>`. A leading `#` on `channel` is accepted.
    #[must_use]
    pub fn join(channel: &str) -> Self {
        Outgoing::Join(bare_channel(channel))
    }

    /// `CAP REQ :<capabilities>`
    #[must_use]
    pub fn cap_req(capabilities: impl Into<String>) -> Self {
        Outgoing::CapReq(capabilities.into())
    }

    /// `PONG :<server>`
    #[must_use]
    pub fn pong(server: impl Into<String>) -> Self {
        Outgoing::Pong(server.into())
    }

    /// `PRIVMSG #<channel> :<text>`
    #[must_use]
    pub fn privmsg(channel: &str, text: impl Into<String>) -> Self {
        Outgoing::Privmsg {
            channel: bare_channel(channel),
            text: text.into(),
        }
    }

    /// `/timeout <user> <seconds> <reason>` sent as a chat message.
    #[must_use]
    pub fn timeout(channel: &str, user: &str, seconds: u64, reason: &str) -> Self {
        let command = format!("/timeout {user} {seconds} {reason}");
        Outgoing::privmsg(channel, command.trim_end())
    }

    /// `/emoteonly` sent as a chat message.
    #[must_use]
    pub fn emote_only(channel: &str) -> Self {
        Outgoing::privmsg(channel, "/emoteonly")
    }

    /// `/emoteonlyoff` sent as a chat message.
    #[must_use]
    pub fn emote_only_off(channel: &str) -> Self {
        Outgoing::privmsg(channel, "/emoteonlyoff")
    }

    /// The login sequence, in the order it must be sent.
    pub fn handshake(token: &str, nick: &str, channel: &str) -> [Outgoing; 5] {
        [
            Outgoing::pass(token),
            Outgoing::nick(nick),
            Outgoing::join(channel),
            Outgoing::cap_req(MEMBERSHIP_CAPABILITY),
            Outgoing::cap_req(TAGS_AND_COMMANDS_CAPABILITY),
        ]
    }

    /// The command token of this line.
    pub fn name(&self) -> &'static str {
        match self {
            Outgoing::Pass(_) => "PASS",
            Outgoing::Nick(_) => "NICK",
            Outgoing::Join(_) => "JOIN",
            Outgoing::CapReq(_) => "CAP",
            Outgoing::Pong(_) => "PONG",
            Outgoing::Privmsg { .. } => "PRIVMSG",
        }
    }
}

/// Cut `text` at its first line ending.
pub fn sanitize(text: &str) -> &str {
    match text.find(['\r', '\n']) {
        Some(pos) => &text[..pos],
        None => text,
    }
}

impl fmt::Display for Outgoing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outgoing::Pass(token) => write!(f, "PASS {}", sanitize(token)),
            Outgoing::Nick(nick) => write!(f, "NICK {}", sanitize(nick)),
            Outgoing::Join(channel) => write!(f, "JOIN #{}", sanitize(channel)),
            Outgoing::CapReq(caps) => write!(f, "CAP REQ :{}", sanitize(caps)),
            Outgoing::Pong(server) => write!(f, "PONG :{}", sanitize(server)),
            Outgoing::Privmsg { channel, text } => {
                write!(f, "PRIVMSG #{} :{}", sanitize(channel), sanitize(text))
            }
        }
    }
}

// PASS carries the OAuth token, keep it out of logs.
impl fmt::Debug for Outgoing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outgoing::Pass(_) => f.write_str("PASS oauth:<redacted>"),
            other => write!(f, "{other}"),
        }
    }
}
