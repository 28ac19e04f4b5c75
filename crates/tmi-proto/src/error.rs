//! Error types for the TMI protocol library.
//!
//! Parsing a chat line is deliberately forgiving: an unsupported command is
//! not an error at the [`parse`](crate::parse) level, it is simply `None`.
//! The types here cover the cases where a caller wants a reason, plus the
//! framing failures raised by the line codec.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while framing raw bytes into protocol lines.
///
/// [`LineCodec`](crate::LineCodec) only returns [`Io`](Self::Io); the other
/// variants describe a line it logged and skipped.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a line.
    #[error("invalid UTF-8 in line at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// The raw line as bytes.
        raw_line: Vec<u8>,
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from the UTF-8 decoder.
        details: String,
    },

    /// Line exceeded the maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },
}

/// Reasons a line did not produce a [`ParsedMessage`](crate::ParsedMessage).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The line was empty after stripping the terminator.
    #[error("empty line")]
    Empty,

    /// The command token is a numeric reply or is not handled.
    #[error("unsupported command: {0:?}")]
    Unsupported(String),
}

/// Failures while decoding the `@key=value;...` tag segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TagError {
    /// A `badges`/`badge-info` entry had no `/` separator.
    #[error("malformed badge entry {entry:?} in tag {tag}")]
    MalformedBadge {
        /// Tag name (`badges` or `badge-info`).
        tag: String,
        /// The offending entry.
        entry: String,
    },

    /// An `emotes` segment had no `:` between id and positions.
    #[error("malformed emote segment: {0:?}")]
    MalformedEmote(String),

    /// An emote position was not `start-end` with integer bounds.
    #[error("malformed emote range: {0:?}")]
    MalformedRange(String),
}
