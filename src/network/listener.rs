//! Message listeners.

use tmi_proto::ParsedMessage;

use super::ChatHandle;

/// Receives every parsed inbound message, in registration order.
///
/// Listeners run on the reader task. A listener that wants to talk back
/// queues lines through `chat` and returns; it must not block.
pub trait MessageListener: Send {
    fn on_message(&mut self, message: &ParsedMessage, chat: &ChatHandle);
}

impl<F> MessageListener for F
where
    F: FnMut(&ParsedMessage, &ChatHandle) + Send,
{
    fn on_message(&mut self, message: &ParsedMessage, chat: &ChatHandle) {
        self(message, chat)
    }
}
