//! # tmi-proto
//!
//! Parsing and framing for the Twitch chat protocol (TMI), the IRC dialect
//! spoken by `irc-ws.chat.twitch.tv` and `irc.chat.twitch.tv`.
//!
//! ## Features
//!
//! - Single-pass positional parser producing a typed [`ParsedMessage`]
//! - Typed tag decoding, including badges, emote positions, and emote sets
//! - Classification of the command set a chat bot cares about, with
//!   `!command` extraction from chat text
//! - Outbound line formatting for login, keepalive, chat, and moderation
//! - Optional Tokio codec for CRLF-framed TCP streams
//!
//! ## Quick Start
//!
//! ```rust
//! use tmi_proto::{parse, CommandKind};
//!
//! let raw = "@badges=broadcaster/1;display-name=Joxtacy :joxtacy!joxtacy@joxtacy.tmi.twitch.tv PRIVMSG #joxtacy :!dice 20";
//! let msg = parse(raw).expect("PRIVMSG is supported");
//!
//! assert_eq!(msg.channel(), Some("#joxtacy"));
//! assert_eq!(msg.display_name(), Some("Joxtacy"));
//! assert_eq!(msg.bot_command().map(|c| c.name.as_str()), Some("dice"));
//!
//! // Numeric replies are not an error, they are just not interesting.
//! assert!(parse(":tmi.twitch.tv 372 joxtabot :You are in a maze of twisty passages.").is_none());
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod outgoing;
pub mod source;
pub mod tags;

pub use self::command::{classify_command, extract_bot_command, BotCommand, Command, CommandKind};
pub use self::error::{ParseError, ProtocolError, TagError};
#[cfg(feature = "tokio")]
pub use self::line::{split_frame, LineCodec, MAX_LINE_LEN};
pub use self::message::{parse, ParsedMessage};
pub use self::outgoing::{Outgoing, TWITCH_HOST};
pub use self::source::Source;
pub use self::tags::{decode_tags, EmoteRange, TagValue, Tags};
