//! Positional line parser.
//!
//! A line is scanned once, left to right:
//!
//! ```text
//! [@tags ][:source ]COMMAND [args][ :parameters]
//! ```
//!
//! The command segment is everything up to the first `:` after the source,
//! so tag values and sources are never mistaken for the parameters.

use std::str::FromStr;

use tracing::debug;

use crate::command::{classify_command, extract_bot_command, Command};
use crate::error::ParseError;
use crate::source::Source;
use crate::tags::decode_tags;

use super::types::ParsedMessage;

/// Raw segments of a line before any decoding.
#[derive(Debug, Default, PartialEq, Eq)]
struct RawSegments<'a> {
    tags: Option<&'a str>,
    source: Option<&'a str>,
    command: &'a str,
    parameters: Option<&'a str>,
}

/// Consume `rest` up to the next space. Returns the segment and what follows it.
fn take_until_space(rest: &str) -> (&str, &str) {
    match rest.split_once(' ') {
        Some((segment, after)) => (segment, after),
        None => (rest, ""),
    }
}

fn split_segments(line: &str) -> RawSegments<'_> {
    let mut rest = line;
    let mut raw = RawSegments::default();

    if let Some(after_at) = rest.strip_prefix('@') {
        let (tags, after) = take_until_space(after_at);
        raw.tags = Some(tags);
        rest = after;
    }

    if let Some(after_colon) = rest.strip_prefix(':') {
        let (source, after) = take_until_space(after_colon);
        raw.source = Some(source);
        rest = after;
    }

    match rest.split_once(':') {
        Some((command, parameters)) => {
            raw.command = command.trim();
            raw.parameters = Some(parameters);
        }
        None => raw.command = rest.trim(),
    }

    raw
}

/// Parse one protocol line.
///
/// Returns `None` when the command is a numeric reply, unknown, or missing.
/// That is the expected outcome for a large share of server traffic and
/// callers should drop the line rather than treat it as an error.
///
/// A tag segment that fails to decode leaves `tags` as `None`; the rest of
/// the message is still returned.
///
/// # Example
///
/// ```
/// use tmi_proto::{parse, CommandKind};
///
/// let msg = parse("PING :tmi.twitch.tv").unwrap();
/// assert_eq!(msg.command.kind, CommandKind::Ping);
/// assert_eq!(msg.parameters.as_deref(), Some("tmi.twitch.tv"));
///
/// assert!(parse(":tmi.twitch.tv 001 joxtabot :Welcome, GLHF!").is_none());
/// ```
pub fn parse(line: &str) -> Option<ParsedMessage> {
    let line = line.trim_end_matches(['\r', '\n']);
    let raw = split_segments(line);

    let kind = classify_command(raw.command)?;
    let mut command = Command::new(kind);

    let tags = raw.tags.and_then(|t| match decode_tags(t) {
        Ok(tags) => Some(tags),
        Err(e) => {
            debug!(error = %e, "Dropping undecodable tag segment");
            None
        }
    });

    let parameters = raw.parameters.map(|p| p.trim().to_owned());
    if let Some(params) = parameters.as_deref() {
        if params.starts_with('!') {
            command.bot_command = extract_bot_command(params);
        }
    }

    Some(ParsedMessage {
        tags,
        source: raw.source.map(Source::parse),
        command,
        parameters,
    })
}

impl ParsedMessage {
    /// Parse one protocol line. See [`parse`](crate::parse).
    pub fn parse(line: &str) -> Option<Self> {
        parse(line)
    }
}

impl FromStr for ParsedMessage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        parse(line).ok_or_else(|| {
            let command = split_segments(line).command;
            ParseError::Unsupported(command.split_whitespace().next().unwrap_or("").to_owned())
        })
    }
}
