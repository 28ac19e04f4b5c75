//! Telemetry utilities for chat observability.

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for a chat connection.
    pub fn connection(channel: &str, url: &str) -> Span {
        info_span!("connection", channel = %channel, url = %url)
    }

    /// Create a span for dispatching one message to the listeners.
    pub fn dispatch(command: &str) -> Span {
        info_span!("dispatch", command = %command)
    }
}
