//! Channel point rewards.
//!
//! Redemptions arrive from the EventSub receiver already verified; this
//! module only maps a reward title to a chat action and performs it.

use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::config::BotConfig;
use crate::error::ClientError;
use crate::network::ChatHandle;

/// Reward titles as configured on the channel.
pub const TIMEOUT_REWARD: &str = "Timeout";
pub const EMOTE_ONLY_REWARD: &str = "Emote-only Chat";

const FALLBACK_REASON: &str = "Channel point redemption";

/// What a redeemed reward does to chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardAction {
    /// Time out the redeeming user.
    Timeout {
        user: String,
        seconds: u64,
        reason: String,
    },
    /// Emote-only chat for a while.
    EmoteOnly { duration: Duration },
}

impl RewardAction {
    /// Map a redemption to an action. Unknown titles are logged and ignored.
    pub fn from_title(title: &str, user: &str, config: &BotConfig) -> Option<Self> {
        match title {
            TIMEOUT_REWARD => Some(RewardAction::Timeout {
                user: user.to_owned(),
                seconds: config.timeout_seconds,
                reason: pick_reason(&config.timeout_reasons),
            }),
            EMOTE_ONLY_REWARD => Some(RewardAction::EmoteOnly {
                duration: Duration::from_secs(config.emote_only_seconds),
            }),
            _ => {
                warn!(%title, %user, "Unknown channel point reward");
                None
            }
        }
    }

    /// Perform the action. Waits for the connection to be ready.
    pub async fn apply(&self, chat: &ChatHandle) -> Result<(), ClientError> {
        match self {
            RewardAction::Timeout {
                user,
                seconds,
                reason,
            } => chat.timeout(user, *seconds, reason).await,
            RewardAction::EmoteOnly { duration } => chat.emote_only(*duration).await,
        }
    }
}

/// Handle one redemption end to end.
pub async fn redeem(
    chat: &ChatHandle,
    config: &BotConfig,
    title: &str,
    user: &str,
) -> Result<(), ClientError> {
    let Some(action) = RewardAction::from_title(title, user, config) else {
        return Ok(());
    };
    info!(%title, %user, ?action, "Reward redeemed");
    action.apply(chat).await
}

fn pick_reason(reasons: &[String]) -> String {
    reasons
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| FALLBACK_REASON.to_owned())
}
