//! Error handling for joxtabot.
//!
//! Transport failures are kept apart from client failures so the run loop
//! can tell a dead socket from a rejected handshake or a failed reconnect.

use thiserror::Error;
use tmi_proto::ProtocolError;
use tokio_tungstenite::tungstenite;

// ============================================================================
// Transport Errors (socket level)
// ============================================================================

/// Errors raised by a [`Transport`](crate::network::Transport) or
/// [`Connector`](crate::network::Connector).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] Box<tungstenite::Error>),

    #[error("line framing error: {0}")]
    Framing(#[from] ProtocolError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported endpoint: {0}")]
    UnsupportedScheme(String),

    /// The server closed the stream without being asked to.
    #[error("connection closed by server")]
    PeerClosed,
}

impl From<tungstenite::Error> for TransportError {
    fn from(err: tungstenite::Error) -> Self {
        TransportError::WebSocket(Box::new(err))
    }
}

// ============================================================================
// Client Errors (connection manager)
// ============================================================================

/// Errors surfaced by [`Connection`](crate::network::Connection) and
/// [`ChatHandle`](crate::network::ChatHandle).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The connection is closed; nothing more can be sent.
    #[error("connection closed")]
    Closed,

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to connect: {0}")]
    Connect(#[source] TransportError),

    #[error("unsupported endpoint: {0}")]
    UnsupportedScheme(String),

    #[error("handshake failed: {0}")]
    Handshake(#[source] TransportError),
}

impl ClientError {
    /// Get a static error code string for log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Transport(TransportError::PeerClosed) => "peer_closed",
            Self::Transport(_) => "transport",
            Self::Connect(_) => "connect",
            Self::UnsupportedScheme(_) => "unsupported_scheme",
            Self::Handshake(_) => "handshake",
        }
    }
}
