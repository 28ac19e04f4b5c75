//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use super::AutoReplyRule;

// =============================================================================
// Twitch Defaults
// =============================================================================

pub fn default_url() -> String {
    "wss://irc-ws.chat.twitch.tv:443".to_string()
}

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_greeting() -> String {
    "I am online, peeps! widepeepoHappy".to_string()
}

pub fn default_timeout_seconds() -> u64 {
    180
}

pub fn default_emote_only_seconds() -> u64 {
    120
}

pub fn default_timeout_reasons() -> Vec<String> {
    [
        "Because I felt like it.",
        "You redeemed it, you live with it.",
        "Chat voted. Well, someone did.",
        "Touch grass for a bit.",
        "This is what channel points are for.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Twitch chat's favorite call-and-response emotes.
pub fn default_auto_replies() -> Vec<AutoReplyRule> {
    ["catJAM", "widepeepoHappy"]
        .into_iter()
        .map(|emote| AutoReplyRule {
            trigger: emote.to_string(),
            reply: emote.to_string(),
        })
        .collect()
}
