//! Line framing.
//!
//! Twitch terminates every line with CRLF. Over plain TCP the lines arrive
//! as a byte stream and are cut by [`LineCodec`]; over WebSocket a single
//! text frame may carry several lines, which [`split_frame`] separates.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error;

/// Maximum accepted line length in bytes, terminator included.
///
/// Twitch lines with a full tag segment routinely exceed the classic
/// 512-byte IRC limit.
pub const MAX_LINE_LEN: usize = 8191;

/// Split a WebSocket text frame into its non-empty lines, terminators removed.
///
/// # Example
///
/// ```
/// use tmi_proto::line::split_frame;
///
/// let lines: Vec<_> = split_frame("PING :tmi.twitch.tv\r\n:a!a@a PRIVMSG #c :hi\r\n").collect();
/// assert_eq!(lines, ["PING :tmi.twitch.tv", ":a!a@a PRIVMSG #c :hi"]);
/// ```
pub fn split_frame(frame: &str) -> impl Iterator<Item = &str> {
    frame
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
}

/// Codec for CRLF-terminated lines.
///
/// Decoded lines have their terminator stripped; encoded lines get `\r\n`
/// appended. A line that is not valid UTF-8 or exceeds the length limit is
/// logged and skipped, so one bad line never ends the stream.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Skipping the rest of an overlong line up to its newline
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with the default [`MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if src.len() > self.max_len {
                    if !self.discarding {
                        let err = error::ProtocolError::MessageTooLong {
                            actual: src.len(),
                            limit: self.max_len,
                        };
                        warn!(error = %err, "Discarding overlong line");
                        self.discarding = true;
                    }
                    src.clear();
                    self.next_index = 0;
                } else {
                    // No complete line yet - remember where we stopped
                    self.next_index = src.len();
                }

                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if std::mem::take(&mut self.discarding) {
                continue;
            }

            if line.len() > self.max_len {
                let err = error::ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                };
                warn!(error = %err, "Discarding overlong line");
                continue;
            }

            let data = match String::from_utf8(line.to_vec()) {
                Ok(data) => data,
                Err(e) => {
                    let err = error::ProtocolError::InvalidUtf8 {
                        byte_pos: e.utf8_error().valid_up_to(),
                        details: e.utf8_error().to_string(),
                        raw_line: e.into_bytes(),
                    };
                    warn!(error = %err, "Discarding undecodable line");
                    continue;
                }
            };

            let trimmed = data.trim_end_matches(['\r', '\n']);
            // Blank keepalive lines carry nothing to parse
            if trimmed.is_empty() {
                continue;
            }

            return Ok(Some(trimmed.to_owned()));
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
