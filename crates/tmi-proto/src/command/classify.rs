//! Command segment classification.

use tracing::{debug, trace};

use super::types::{BotCommand, CommandKind};

/// Classify a trimmed command segment such as `PRIVMSG #channel` or `CAP * ACK`.
///
/// Returns `None` for numeric replies, unknown tokens, and channel-scoped
/// commands that arrive without a channel. Callers drop such lines.
///
/// # Example
///
/// ```
/// use tmi_proto::{classify_command, CommandKind};
///
/// assert_eq!(classify_command("PING"), Some(CommandKind::Ping));
/// assert_eq!(
///     classify_command("CAP * ACK"),
///     Some(CommandKind::Cap { is_cap_request_enabled: true })
/// );
/// assert_eq!(classify_command("001 joxtabot"), None);
/// ```
pub fn classify_command(raw: &str) -> Option<CommandKind> {
    let mut parts = raw.split_whitespace();
    let name = parts.next()?;

    let kind = match name {
        "JOIN" | "PART" | "NOTICE" | "CLEARCHAT" | "HOSTTARGET" | "PRIVMSG" | "USERSTATE"
        | "ROOMSTATE" => {
            let Some(channel) = parts.next() else {
                debug!(command = name, "Channel missing from command");
                return None;
            };
            channel_command(name, channel.to_owned())?
        }
        "PING" => CommandKind::Ping,
        "GLOBALUSERSTATE" => CommandKind::GlobalUserState,
        "RECONNECT" => {
            debug!("Server is about to terminate the connection for maintenance");
            CommandKind::Reconnect
        }
        "CAP" => CommandKind::Cap {
            is_cap_request_enabled: parts.nth(1) == Some("ACK"),
        },
        "421" => {
            debug!(command = ?parts.nth(1), "Server rejected command as unknown");
            return None;
        }
        numeric if is_numeric(numeric) => {
            trace!(code = numeric, "Ignoring numeric reply");
            return None;
        }
        other => {
            debug!(command = other, "Unexpected command");
            return None;
        }
    };

    Some(kind)
}

fn channel_command(name: &str, channel: String) -> Option<CommandKind> {
    Some(match name {
        "JOIN" => CommandKind::Join { channel },
        "PART" => CommandKind::Part { channel },
        "NOTICE" => CommandKind::Notice { channel },
        "CLEARCHAT" => CommandKind::ClearChat { channel },
        "HOSTTARGET" => CommandKind::HostTarget { channel },
        "PRIVMSG" => CommandKind::Privmsg { channel },
        "USERSTATE" => CommandKind::UserState { channel },
        "ROOMSTATE" => CommandKind::RoomState { channel },
        _ => return None,
    })
}

fn is_numeric(token: &str) -> bool {
    token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit())
}

/// Extract a `!command params` from the parameters of a message.
///
/// The leading `!` is stripped and the rest trimmed; the command name runs
/// to the first whitespace and the remainder, trimmed, becomes the params.
/// Returns `None` if `params` does not start with `!` or no name follows it.
///
/// # Example
///
/// ```
/// use tmi_proto::extract_bot_command;
///
/// let cmd = extract_bot_command("!dilly dally").unwrap();
/// assert_eq!(cmd.name, "dilly");
/// assert_eq!(cmd.params.as_deref(), Some("dally"));
/// ```
pub fn extract_bot_command(params: &str) -> Option<BotCommand> {
    let body = params.strip_prefix('!')?.trim();
    if body.is_empty() {
        return None;
    }

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    Some(BotCommand {
        name: name.to_owned(),
        params: (!rest.is_empty()).then(|| rest.to_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_commands() {
        for (raw, name) in [
            ("JOIN #joxtacy", "JOIN"),
            ("PART #joxtacy", "PART"),
            ("NOTICE #joxtacy", "NOTICE"),
            ("CLEARCHAT #joxtacy", "CLEARCHAT"),
            ("HOSTTARGET #joxtacy", "HOSTTARGET"),
            ("PRIVMSG #joxtacy", "PRIVMSG"),
            ("USERSTATE #joxtacy", "USERSTATE"),
            ("ROOMSTATE #joxtacy", "ROOMSTATE"),
        ] {
            let kind = classify_command(raw).unwrap();
            assert_eq!(kind.name(), name);
            assert_eq!(kind.channel(), Some("#joxtacy"));
        }
    }

    #[test]
    fn test_fieldless_commands() {
        assert_eq!(classify_command("PING"), Some(CommandKind::Ping));
        assert_eq!(
            classify_command("GLOBALUSERSTATE"),
            Some(CommandKind::GlobalUserState)
        );
        assert_eq!(classify_command("RECONNECT"), Some(CommandKind::Reconnect));
    }

    #[test]
    fn test_cap_ack_and_nak() {
        assert_eq!(
            classify_command("CAP * ACK"),
            Some(CommandKind::Cap {
                is_cap_request_enabled: true
            })
        );
        assert_eq!(
            classify_command("CAP * NAK"),
            Some(CommandKind::Cap {
                is_cap_request_enabled: false
            })
        );
    }

    #[test]
    fn test_numerics_unsupported() {
        for raw in ["001 joxtabot", "002 joxtabot", "353 joxtabot = #joxtacy", "366 joxtabot #joxtacy", "372 joxtabot", "375 joxtabot", "376 joxtabot"] {
            assert_eq!(classify_command(raw), None, "{raw}");
        }
        assert_eq!(classify_command("421 joxtabot WHO"), None);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(classify_command("WHISPER joxtabot"), None);
        assert_eq!(classify_command(""), None);
        assert_eq!(classify_command("PRIVMSG"), None);
    }

    #[test]
    fn test_extract_bot_command_without_params() {
        let cmd = extract_bot_command("!lurk").unwrap();
        assert_eq!(cmd.name, "lurk");
        assert_eq!(cmd.params, None);
    }

    #[test]
    fn test_extract_bot_command_trims() {
        let cmd = extract_bot_command("!  so   joxtacy  is cool  ").unwrap();
        assert_eq!(cmd.name, "so");
        assert_eq!(cmd.params.as_deref(), Some("joxtacy  is cool"));
    }

    #[test]
    fn test_extract_bot_command_rejects() {
        assert_eq!(extract_bot_command("hello"), None);
        assert_eq!(extract_bot_command("!"), None);
        assert_eq!(extract_bot_command("!   "), None);
    }
}
