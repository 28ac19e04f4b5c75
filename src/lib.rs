//! joxtabot - Twitch chat client and bot for #joxtacy.
//!
//! The binary wires these together; the EventSub receiver links the library
//! to drive channel point rewards through a [`network::ChatHandle`].

pub mod bot;
pub mod config;
pub mod error;
pub mod network;
pub mod telemetry;
