//! Network module.
//!
//! Contains the chat Connection (reader loop and state machine), the
//! ChatHandle used to send, and the transports underneath.

mod connection;
mod handle;
mod listener;
mod state;
mod transport;

pub use connection::{Connection, ConnectionSettings};
pub use handle::ChatHandle;
pub use listener::MessageListener;
pub use state::{ConnectionState, LifecycleEvent};
pub use transport::{Connector, EndpointConnector, Transport};

#[cfg(test)]
pub(crate) use handle::testing;
