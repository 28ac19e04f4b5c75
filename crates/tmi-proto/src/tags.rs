//! Twitch message tag decoding.
//!
//! Twitch attaches per-message metadata as an IRCv3 tag segment
//! (`@badges=broadcaster/1;color=#0000FF;...`). Most tags are plain strings,
//! but a few carry their own sub-grammar:
//!
//! - `badges` / `badge-info`: `name/version,name/version`
//! - `emotes`: `id:start-end,start-end/id:start-end`
//! - `emote-sets`: `id,id,id`
//!
//! [`decode_tags`] turns the raw segment into a typed [`Tags`] map.

use std::collections::hash_map;
use std::collections::HashMap;

use crate::error::TagError;

/// Tags that are dropped during decoding.
pub const IGNORED_TAGS: &[&str] = &["client-nonce", "flags"];

/// Character range of one emote occurrence inside the chat text.
///
/// The bounds are kept exactly as sent on the wire (`start-end`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EmoteRange {
    /// First character index.
    pub start: u32,
    /// Last character index, as sent.
    pub end: u32,
}

/// Decoded value of a single tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagValue {
    /// The tag was present with an empty value.
    Null,
    /// Plain string value.
    Text(String),
    /// `badges` / `badge-info`: badge name to badge version.
    Badges(HashMap<String, String>),
    /// `emotes`: emote id to every place it occurs in the text.
    Emotes(HashMap<String, Vec<EmoteRange>>),
    /// `emote-sets`: ordered emote set ids.
    EmoteSets(Vec<String>),
}

impl TagValue {
    /// The string value, if this is a [`TagValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the tag was sent with an empty value.
    pub fn is_null(&self) -> bool {
        matches!(self, TagValue::Null)
    }
}

/// Decoded tag segment of one message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags(HashMap<String, TagValue>);

impl Tags {
    /// Get a tag by name.
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.0.get(key)
    }

    /// Get a plain string tag. Returns `None` for null or structured tags.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TagValue::as_text)
    }

    /// The `badges` mapping, if present and non-empty.
    pub fn badges(&self) -> Option<&HashMap<String, String>> {
        match self.get("badges") {
            Some(TagValue::Badges(badges)) => Some(badges),
            _ => None,
        }
    }

    /// The `emotes` mapping, if present and non-empty.
    pub fn emotes(&self) -> Option<&HashMap<String, Vec<EmoteRange>>> {
        match self.get("emotes") {
            Some(TagValue::Emotes(emotes)) => Some(emotes),
            _ => None,
        }
    }

    /// The `emote-sets` ids, if present.
    pub fn emote_sets(&self) -> Option<&[String]> {
        match self.get("emote-sets") {
            Some(TagValue::EmoteSets(sets)) => Some(sets),
            _ => None,
        }
    }

    /// The sender's `display-name`.
    pub fn display_name(&self) -> Option<&str> {
        self.text("display-name")
    }

    /// Whether the sender carries the given badge (e.g. `moderator`).
    pub fn has_badge(&self, name: &str) -> bool {
        self.badges().is_some_and(|b| b.contains_key(name))
    }

    /// Check whether a tag is present (including null tags).
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of decoded tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no tags were decoded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, TagValue> {
        self.0.iter()
    }

    /// Insert a tag, replacing any earlier value with the same name.
    pub fn insert(&mut self, key: impl Into<String>, value: TagValue) {
        self.0.insert(key.into(), value);
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = (&'a String, &'a TagValue);
    type IntoIter = hash_map::Iter<'a, String, TagValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, TagValue)> for Tags {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        Tags(iter.into_iter().collect())
    }
}

/// Decode a raw tag segment (without the leading `@`).
///
/// Empty values decode to [`TagValue::Null`]. Tags in [`IGNORED_TAGS`] are
/// dropped, and so is an empty `emote-sets`. If a name repeats, the last
/// occurrence wins.
///
/// # Errors
///
/// Returns a [`TagError`] when a badge, emote, or emote range does not
/// follow its sub-grammar.
///
/// # Example
///
/// ```
/// use tmi_proto::{decode_tags, TagValue};
///
/// let tags = decode_tags("badges=moderator/1;color=#FF0000;display-name=Nick").unwrap();
/// assert_eq!(tags.display_name(), Some("Nick"));
/// assert!(tags.has_badge("moderator"));
/// ```
pub fn decode_tags(raw: &str) -> Result<Tags, TagError> {
    let mut tags = Tags::default();

    for pair in raw.split(';').filter(|s| !s.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };

        if IGNORED_TAGS.contains(&key) {
            continue;
        }

        let decoded = match key {
            _ if value.is_empty() && key == "emote-sets" => continue,
            _ if value.is_empty() => TagValue::Null,
            "badges" | "badge-info" => TagValue::Badges(decode_badges(key, value)?),
            "emotes" => TagValue::Emotes(decode_emotes(value)?),
            "emote-sets" => TagValue::EmoteSets(value.split(',').map(str::to_owned).collect()),
            _ => TagValue::Text(value.to_owned()),
        };

        tags.insert(key, decoded);
    }

    Ok(tags)
}

/// `staff/1,broadcaster/1,turbo/1`
fn decode_badges(tag: &str, value: &str) -> Result<HashMap<String, String>, TagError> {
    value
        .split(',')
        .map(|entry| {
            entry
                .split_once('/')
                .map(|(name, version)| (name.to_owned(), version.to_owned()))
                .ok_or_else(|| TagError::MalformedBadge {
                    tag: tag.to_owned(),
                    entry: entry.to_owned(),
                })
        })
        .collect()
}

/// `25:0-4,12-16/1902:6-10`
fn decode_emotes(value: &str) -> Result<HashMap<String, Vec<EmoteRange>>, TagError> {
    let mut emotes = HashMap::new();

    for segment in value.split('/') {
        let (id, positions) = segment
            .split_once(':')
            .ok_or_else(|| TagError::MalformedEmote(segment.to_owned()))?;

        let ranges = positions
            .split(',')
            .map(decode_range)
            .collect::<Result<Vec<_>, _>>()?;

        emotes.insert(id.to_owned(), ranges);
    }

    Ok(emotes)
}

fn decode_range(position: &str) -> Result<EmoteRange, TagError> {
    let malformed = || TagError::MalformedRange(position.to_owned());

    let (start, end) = position.split_once('-').ok_or_else(malformed)?;
    Ok(EmoteRange {
        start: start.parse().map_err(|_| malformed())?,
        end: end.parse().map_err(|_| malformed())?,
    })
}
