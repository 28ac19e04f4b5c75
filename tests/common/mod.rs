//! Integration test common infrastructure.
//!
//! Provides a fake Twitch chat server and a way to run the bot against it.

pub mod bot;
pub mod tmi;

#[allow(unused_imports)]
pub use bot::TestBot;
#[allow(unused_imports)]
pub use tmi::{FakeTmi, TmiPeer};
