//! ChatHandle - the cloneable send side of a [`Connection`](super::Connection).
//!
//! Nothing here touches the transport. Every line goes into the outbound
//! queue and is written by the run loop, one at a time.

use std::sync::Arc;
use std::time::Duration;

use tmi_proto::Outgoing;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use super::{ConnectionState, LifecycleEvent};
use crate::error::ClientError;

/// Item in the outbound queue.
#[derive(Debug)]
pub(crate) enum Outbound {
    Line(Outgoing),
    Shutdown,
}

/// Send side of a chat connection.
#[derive(Clone)]
pub struct ChatHandle {
    channel: Arc<str>,
    outgoing: mpsc::UnboundedSender<Outbound>,
    state: watch::Receiver<ConnectionState>,
    events: broadcast::Sender<LifecycleEvent>,
}

impl ChatHandle {
    pub(crate) fn new(
        channel: &str,
        outgoing: mpsc::UnboundedSender<Outbound>,
        state: watch::Receiver<ConnectionState>,
        events: broadcast::Sender<LifecycleEvent>,
    ) -> Self {
        Self {
            channel: Arc::from(channel.trim_start_matches('#')),
            outgoing,
            state,
            events,
        }
    }

    /// Channel name without `#`.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Wait until the handshake has been written.
    ///
    /// Returns [`ClientError::Closed`] if the connection is or becomes closed
    /// first. During a reconnect this waits for the new transport.
    pub async fn wait_ready(&self) -> Result<(), ClientError> {
        let mut state = self.state.clone();
        let reached = state
            .wait_for(|s| matches!(s, ConnectionState::Ready | ConnectionState::Closed))
            .await
            .map(|s| *s)
            .map_err(|_| ClientError::Closed)?;

        if reached.is_closed() {
            return Err(ClientError::Closed);
        }
        Ok(())
    }

    /// Send a chat message once the connection is ready.
    pub async fn send_privmsg(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.wait_ready().await?;
        self.enqueue(Outgoing::privmsg(&self.channel, text))
    }

    /// Queue a chat message without waiting.
    ///
    /// The run loop only drains the queue after the handshake, so this is
    /// safe to call from a listener or before `run` starts.
    pub fn say(&self, text: impl Into<String>) -> Result<(), ClientError> {
        if self.state().is_closed() {
            return Err(ClientError::Closed);
        }
        self.enqueue(Outgoing::privmsg(&self.channel, text))
    }

    /// `/timeout <user> <seconds> <reason>`
    pub async fn timeout(&self, user: &str, seconds: u64, reason: &str) -> Result<(), ClientError> {
        self.wait_ready().await?;
        info!(channel = %self.channel, %user, seconds, %reason, "Timing out user");
        self.enqueue(Outgoing::timeout(&self.channel, user, seconds, reason))
    }

    /// Turn emote-only mode on, and off again after `duration`.
    ///
    /// The off switch runs on a detached timer. It is not cancellable and is
    /// lost if the connection closes before it fires.
    pub async fn emote_only(&self, duration: Duration) -> Result<(), ClientError> {
        self.wait_ready().await?;
        info!(channel = %self.channel, seconds = duration.as_secs(), "Emote-only mode on");
        self.enqueue(Outgoing::emote_only(&self.channel))?;

        let chat = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Err(e) = chat.emote_only_off().await {
                warn!(channel = %chat.channel, error = %e, "Failed to turn emote-only mode off");
            }
        });
        Ok(())
    }

    /// `/emoteonlyoff`
    pub async fn emote_only_off(&self) -> Result<(), ClientError> {
        self.wait_ready().await?;
        info!(channel = %self.channel, "Emote-only mode off");
        self.enqueue(Outgoing::emote_only_off(&self.channel))
    }

    /// Ask the run loop to close the transport and return.
    pub fn shutdown(&self) -> Result<(), ClientError> {
        debug!("Shutdown queued");
        self.outgoing
            .send(Outbound::Shutdown)
            .map_err(|_| ClientError::Closed)
    }

    /// Receive lifecycle events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    fn enqueue(&self, line: Outgoing) -> Result<(), ClientError> {
        self.outgoing
            .send(Outbound::Line(line))
            .map_err(|_| ClientError::Closed)
    }
}

impl std::fmt::Debug for ChatHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatHandle")
            .field("channel", &self.channel)
            .field("state", &self.state())
            .finish()
    }
}

/// Handles wired to an in-memory queue instead of a run loop.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Receiving end of a test handle's queue.
    pub(crate) struct Outbox {
        rx: mpsc::UnboundedReceiver<Outbound>,
        pub(crate) state: watch::Sender<ConnectionState>,
    }

    impl Outbox {
        /// Drain every queued line, formatted as written to the wire.
        pub(crate) fn lines(&mut self) -> Vec<String> {
            let mut lines = Vec::new();
            while let Ok(outbound) = self.rx.try_recv() {
                if let Outbound::Line(line) = outbound {
                    lines.push(line.to_string());
                }
            }
            lines
        }

        pub(crate) fn close(&mut self) {
            self.rx.close();
        }
    }

    pub(crate) fn handle(state: ConnectionState) -> (ChatHandle, Outbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(state);
        let (events, _) = broadcast::channel(8);
        (
            ChatHandle::new("#joxtacy", tx, state_rx, events),
            Outbox {
                rx,
                state: state_tx,
            },
        )
    }
}
