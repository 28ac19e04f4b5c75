//! Connection lifecycle states and notifications.

use std::fmt;

/// Where a [`Connection`](super::Connection) is in its lifecycle.
///
/// ```text
/// Connecting -> Authenticating -> Ready
///                                   |  RECONNECT
///                                   v
///                              Reconnecting -> Connecting -> ...
/// (any) -> Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Opening the transport.
    Connecting,
    /// Transport open, handshake being written.
    Authenticating,
    /// Handshake written; sends are released.
    Ready,
    /// The server asked us to move; the old transport is being replaced.
    Reconnecting,
    /// Terminal.
    Closed,
}

impl ConnectionState {
    pub fn is_closed(self) -> bool {
        self == ConnectionState::Closed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Authenticating => "authenticating",
            ConnectionState::Ready => "ready",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broadcast to every [`ChatHandle::subscribe`](super::ChatHandle::subscribe) receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    StateChanged(ConnectionState),
    /// The server sent RECONNECT.
    ReconnectRequested,
    /// A socket or protocol failure; the connection is about to close.
    Error(String),
    Closed { reason: String },
}
