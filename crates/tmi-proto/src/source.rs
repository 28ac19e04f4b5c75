//! Message source (the `:nick!user@host` or `:server-host` segment).

use std::fmt;

/// Who sent a message.
///
/// Lines from a user carry `nick!user@host`; the nick is everything before
/// the `!` and the host everything after it. Lines from the server itself
/// carry only a host name, in which case `nick` is `None`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Source {
    /// Sender nickname, `None` for server-originated lines.
    pub nick: Option<String>,
    /// `user@host` for users, the full server host otherwise.
    pub host: String,
}

impl Source {
    /// Split a raw source segment (without the leading `:`).
    ///
    /// # Example
    ///
    /// ```
    /// use tmi_proto::Source;
    ///
    /// let src = Source::parse("nick!user@host.tmi.twitch.tv");
    /// assert_eq!(src.nick.as_deref(), Some("nick"));
    /// assert_eq!(src.host, "user@host.tmi.twitch.tv");
    ///
    /// let server = Source::parse("tmi.twitch.tv");
    /// assert_eq!(server.nick, None);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split('!');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(nick), Some(host), None) => Source {
                nick: Some(nick.to_owned()),
                host: host.to_owned(),
            },
            _ => Source {
                nick: None,
                host: raw.to_owned(),
            },
        }
    }

    /// Whether the line came from the server rather than a user.
    pub fn is_server(&self) -> bool {
        self.nick.is_none()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.nick {
            Some(nick) => write!(f, "{}!{}", nick, self.host),
            None => f.write_str(&self.host),
        }
    }
}
