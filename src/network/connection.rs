//! Connection - one chat connection and its reader loop.
//!
//! ```text
//! Phase 1: connect + handshake (sequential writes, state -> Ready)
//!    ↓
//! Phase 2: tokio::select!
//!    ┌──────────────────────────────────────────────┐
//!    │  transport.next_lines()   outbound queue     │
//!    │        │                        │            │
//!    │        ▼                        ▼            │
//!    │  parse → PING? PONG now   write one line     │
//!    │        │                                     │
//!    │        ▼                                     │
//!    │  listeners, in order                         │
//!    │        │                                     │
//!    │  RECONNECT? → close, Phase 1 again (once)    │
//!    └──────────────────────────────────────────────┘
//! ```

use tmi_proto::{CommandKind, Outgoing, ParsedMessage, TWITCH_HOST};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, debug, error, info, trace, warn};

use super::handle::Outbound;
use super::{
    ChatHandle, ConnectionState, Connector, EndpointConnector, LifecycleEvent, MessageListener,
    Transport,
};
use crate::error::{ClientError, TransportError};
use crate::telemetry::spans;

/// Lifecycle events kept for slow subscribers.
const EVENT_CAPACITY: usize = 64;

/// Login details for one channel.
#[derive(Clone)]
pub struct ConnectionSettings {
    /// Channel to join, without `#`.
    pub channel: String,
    pub nick: String,
    /// OAuth token, with or without the `oauth:` prefix.
    pub token: String,
    /// Endpoint URL, for logging.
    pub url: String,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("channel", &self.channel)
            .field("nick", &self.nick)
            .field("token", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}

/// What the reader loop should do after a line.
enum LineOutcome {
    Continue,
    Reconnect,
}

/// A chat connection.
///
/// Register listeners with [`on_message`](Self::on_message), grab as many
/// [`ChatHandle`]s as needed, then hand the connection to [`run`](Self::run).
pub struct Connection {
    settings: ConnectionSettings,
    connector: Box<dyn Connector>,
    listeners: Vec<Box<dyn MessageListener>>,
    chat: ChatHandle,
    state_tx: watch::Sender<ConnectionState>,
    events_tx: broadcast::Sender<LifecycleEvent>,
    outgoing_rx: mpsc::UnboundedReceiver<Outbound>,
}

impl Connection {
    pub fn new(settings: ConnectionSettings, connector: Box<dyn Connector>) -> Self {
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let chat = ChatHandle::new(&settings.channel, outgoing_tx, state_rx, events_tx.clone());

        Self {
            settings,
            connector,
            listeners: Vec::new(),
            chat,
            state_tx,
            events_tx,
            outgoing_rx,
        }
    }

    /// Connect to `settings.url`, picking the transport by scheme.
    pub fn from_url(settings: ConnectionSettings) -> Result<Self, ClientError> {
        let connector = EndpointConnector::new(&settings.url).map_err(|e| match e {
            TransportError::UnsupportedScheme(url) => ClientError::UnsupportedScheme(url),
            other => ClientError::Connect(other),
        })?;
        Ok(Self::new(settings, Box::new(connector)))
    }

    /// Add a listener. Listeners see messages in the order they were added.
    pub fn on_message(&mut self, listener: impl MessageListener + 'static) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn handle(&self) -> ChatHandle {
        self.chat.clone()
    }

    /// Connect, log in, and read until shutdown or failure.
    ///
    /// Returns `Ok(())` after [`ChatHandle::shutdown`]; any socket error,
    /// unexpected close, or failed reconnect is returned as `Err` after the
    /// state has moved to [`ConnectionState::Closed`].
    pub async fn run(self) -> Result<(), ClientError> {
        let span = spans::connection(&self.settings.channel, &self.settings.url);
        self.run_inner().instrument(span).await
    }

    async fn run_inner(mut self) -> Result<(), ClientError> {
        let mut transport = match self.open().await {
            Ok(transport) => transport,
            Err(e) => return Err(self.fail(e)),
        };

        loop {
            tokio::select! {
                result = transport.next_lines() => {
                    let lines = match result {
                        Ok(Some(lines)) => lines,
                        Ok(None) => return Err(self.fail(TransportError::PeerClosed.into())),
                        Err(e) => return Err(self.fail(e.into())),
                    };

                    let mut reconnect = false;
                    for line in &lines {
                        match self.process_line(line, transport.as_mut()).await {
                            Ok(LineOutcome::Continue) => {}
                            Ok(LineOutcome::Reconnect) => reconnect = true,
                            Err(e) => return Err(self.fail(e.into())),
                        }
                    }

                    if reconnect {
                        transport = match self.reconnect(transport).await {
                            Ok(transport) => transport,
                            Err(e) => return Err(self.fail(e)),
                        };
                    }
                }
                Some(outbound) = self.outgoing_rx.recv() => {
                    match outbound {
                        Outbound::Line(line) => {
                            if let Err(e) = write_line(transport.as_mut(), &line).await {
                                return Err(self.fail(e.into()));
                            }
                        }
                        Outbound::Shutdown => {
                            info!("Shutting down chat connection");
                            if let Err(e) = transport.close().await {
                                debug!(error = %e, "Error closing transport");
                            }
                            self.finish("shutdown requested");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Open a transport and write the handshake. Ready on success.
    async fn open(&mut self) -> Result<Box<dyn Transport>, ClientError> {
        self.set_state(ConnectionState::Connecting);
        let mut transport = self
            .connector
            .connect()
            .await
            .map_err(ClientError::Connect)?;

        self.set_state(ConnectionState::Authenticating);
        let handshake = Outgoing::handshake(
            &self.settings.token,
            &self.settings.nick,
            &self.settings.channel,
        );
        for line in &handshake {
            write_line(transport.as_mut(), line)
                .await
                .map_err(ClientError::Handshake)?;
        }

        // Twitch acknowledges with numerics; nothing waits for them.
        self.set_state(ConnectionState::Ready);
        info!(nick = %self.settings.nick, channel = %self.settings.channel, "Joined chat");
        Ok(transport)
    }

    /// Replace the transport after RECONNECT. One attempt only.
    async fn reconnect(
        &mut self,
        mut old: Box<dyn Transport>,
    ) -> Result<Box<dyn Transport>, ClientError> {
        self.set_state(ConnectionState::Reconnecting);
        if let Err(e) = old.close().await {
            debug!(error = %e, "Error closing old transport");
        }
        drop(old);

        info!("Reconnecting");
        self.open().await
    }

    async fn process_line(
        &mut self,
        line: &str,
        transport: &mut dyn Transport,
    ) -> Result<LineOutcome, TransportError> {
        trace!(raw = %line, "Received line");
        let Some(message) = tmi_proto::parse(line) else {
            return Ok(LineOutcome::Continue);
        };

        // Answer before anything else is read or dispatched
        if message.command.kind == CommandKind::Ping {
            let server = message.parameters.as_deref().unwrap_or(TWITCH_HOST);
            debug!(%server, "PING received, sending PONG");
            write_line(transport, &Outgoing::pong(server)).await?;
        }

        self.dispatch(&message);

        if message.command.kind == CommandKind::Reconnect {
            info!("Server requested reconnect");
            let _ = self.events_tx.send(LifecycleEvent::ReconnectRequested);
            return Ok(LineOutcome::Reconnect);
        }
        Ok(LineOutcome::Continue)
    }

    fn dispatch(&mut self, message: &ParsedMessage) {
        let _span = spans::dispatch(message.command.kind.name()).entered();
        for listener in &mut self.listeners {
            listener.on_message(message, &self.chat);
        }
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "Connection state changed");
            let _ = self.events_tx.send(LifecycleEvent::StateChanged(state));
        }
    }

    /// Log, publish, and close. Hands the error back for returning.
    fn fail(&mut self, err: ClientError) -> ClientError {
        error!(error = %err, code = err.error_code(), "Chat connection failed");
        let _ = self.events_tx.send(LifecycleEvent::Error(err.to_string()));
        self.finish(&err.to_string());
        err
    }

    fn finish(&mut self, reason: &str) {
        self.set_state(ConnectionState::Closed);
        let _ = self.events_tx.send(LifecycleEvent::Closed {
            reason: reason.to_owned(),
        });

        self.outgoing_rx.close();
        let mut dropped = 0usize;
        while self.outgoing_rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            warn!(dropped, "Discarded unsent lines on close");
        }
    }
}

async fn write_line(transport: &mut dyn Transport, line: &Outgoing) -> Result<(), TransportError> {
    trace!(line = ?line, "Sending line");
    transport.send_line(&line.to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Shared record of everything the connection wrote and dispatched.
    type Log = Arc<Mutex<Vec<String>>>;

    struct MockTransport {
        inbound: mpsc::UnboundedReceiver<Vec<String>>,
        log: Log,
        closed: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
            self.log.lock().unwrap().push(format!("sent: {line}"));
            Ok(())
        }

        async fn next_lines(&mut self) -> Result<Option<Vec<String>>, TransportError> {
            Ok(self.inbound.recv().await)
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    /// Feeds one frame per send; dropping it closes the stream.
    type Server = mpsc::UnboundedSender<Vec<String>>;

    struct MockConnector {
        transports: Mutex<VecDeque<MockTransport>>,
        connects: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl Connector for MockConnector {
        async fn connect(&self) -> Result<Box<dyn Transport>, TransportError> {
            *self.connects.lock().unwrap() += 1;
            match self.transports.lock().unwrap().pop_front() {
                Some(transport) => Ok(Box::new(transport)),
                None => Err(std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into()),
            }
        }
    }

    struct Harness {
        connection: Connection,
        servers: Vec<Server>,
        log: Log,
        closed: Vec<Arc<Mutex<bool>>>,
        connects: Arc<Mutex<usize>>,
    }

    fn harness(transport_count: usize) -> Harness {
        let log = Log::default();
        let mut transports = VecDeque::new();
        let mut servers = Vec::new();
        let mut closed = Vec::new();
        for _ in 0..transport_count {
            let (tx, rx) = mpsc::unbounded_channel();
            let flag = Arc::new(Mutex::new(false));
            transports.push_back(MockTransport {
                inbound: rx,
                log: log.clone(),
                closed: flag.clone(),
            });
            servers.push(tx);
            closed.push(flag);
        }

        let connects = Arc::new(Mutex::new(0));
        let connector = MockConnector {
            transports: Mutex::new(transports),
            connects: connects.clone(),
        };
        let settings = ConnectionSettings {
            channel: "joxtacy".into(),
            nick: "joxtabot".into(),
            token: "abc123".into(),
            url: "mock://".into(),
        };

        Harness {
            connection: Connection::new(settings, Box::new(connector)),
            servers,
            log,
            closed,
            connects,
        }
    }

    fn frame(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn recorder(log: Log, name: &'static str) -> impl MessageListener {
        move |message: &ParsedMessage, _chat: &ChatHandle| {
            log.lock()
                .unwrap()
                .push(format!("{name}: {}", message.command.kind.name()));
        }
    }

    const HANDSHAKE: [&str; 5] = [
        "sent: PASS oauth:abc123",
        "sent: NICK joxtabot",
        "sent: JOIN #joxtacy",
        "sent: CAP REQ :twitch.tv/membership",
        "sent: CAP REQ :twitch.tv/tags twitch.tv/commands",
    ];

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_from_url_rejects_unknown_scheme() {
        let settings = ConnectionSettings {
            channel: "joxtacy".into(),
            nick: "joxtabot".into(),
            token: "abc123".into(),
            url: "https://irc-ws.chat.twitch.tv".into(),
        };
        assert!(matches!(
            Connection::from_url(settings),
            Err(ClientError::UnsupportedScheme(_))
        ));
    }

    #[tokio::test]
    async fn test_handshake_order() {
        let Harness {
            connection,
            servers,
            log,
            ..
        } = harness(1);
        let chat = connection.handle();
        let task = tokio::spawn(connection.run());

        chat.wait_ready().await.unwrap();
        drop(servers);

        let result = task.await.unwrap();
        assert!(matches!(
            result,
            Err(ClientError::Transport(TransportError::PeerClosed))
        ));
        assert_eq!(entries(&log), HANDSHAKE);
    }

    #[tokio::test]
    async fn test_ping_answered_before_next_line() {
        let Harness {
            mut connection,
            servers,
            log,
            ..
        } = harness(1);
        connection.on_message(recorder(log.clone(), "listener"));
        let task = tokio::spawn(connection.run());

        servers[0]
            .send(frame(&[
                "PING :tmi.twitch.tv",
                ":a!a@a.tmi.twitch.tv PRIVMSG #joxtacy :hi",
            ]))
            .unwrap();
        drop(servers);
        task.await.unwrap().ok();

        let log = entries(&log);
        assert_eq!(&log[..5], HANDSHAKE);
        assert_eq!(
            &log[5..],
            [
                "sent: PONG :tmi.twitch.tv",
                "listener: PING",
                "listener: PRIVMSG",
            ]
        );
        assert_eq!(log.iter().filter(|l| l.starts_with("sent: PONG")).count(), 1);
    }

    #[tokio::test]
    async fn test_pong_echoes_ping_parameter() {
        let Harness {
            connection,
            servers,
            log,
            ..
        } = harness(1);
        let task = tokio::spawn(connection.run());

        servers[0].send(frame(&["PING :tmi.example"])).unwrap();
        servers[0].send(frame(&["PING"])).unwrap();
        drop(servers);
        task.await.unwrap().ok();

        let pongs: Vec<_> = entries(&log)
            .into_iter()
            .filter(|l| l.starts_with("sent: PONG"))
            .collect();
        assert_eq!(pongs, ["sent: PONG :tmi.example", "sent: PONG :tmi.twitch.tv"]);
    }

    #[tokio::test]
    async fn test_listeners_see_messages_in_order() {
        let Harness {
            mut connection,
            servers,
            log,
            ..
        } = harness(1);
        connection
            .on_message(recorder(log.clone(), "a"))
            .on_message(recorder(log.clone(), "b"));
        let task = tokio::spawn(connection.run());

        servers[0]
            .send(frame(&[
                ":tmi.twitch.tv 001 joxtabot :Welcome, GLHF!",
                ":joxtabot!joxtabot@joxtabot.tmi.twitch.tv JOIN #joxtacy",
            ]))
            .unwrap();
        servers[0]
            .send(frame(&[":a!a@a.tmi.twitch.tv PRIVMSG #joxtacy :hi"]))
            .unwrap();
        drop(servers);
        task.await.unwrap().ok();

        let dispatched: Vec<_> = entries(&log)
            .into_iter()
            .filter(|l| !l.starts_with("sent: "))
            .collect();
        assert_eq!(
            dispatched,
            ["a: JOIN", "b: JOIN", "a: PRIVMSG", "b: PRIVMSG"]
        );
    }

    #[tokio::test]
    async fn test_listener_reply_written_after_handshake() {
        let Harness {
            mut connection,
            servers,
            log,
            ..
        } = harness(1);
        connection.on_message(|message: &ParsedMessage, chat: &ChatHandle| {
            if message.text() == Some("catJAM") {
                chat.say("catJAM").unwrap();
            }
        });
        let chat = connection.handle();
        let task = tokio::spawn(connection.run());

        servers[0]
            .send(frame(&[":a!a@a.tmi.twitch.tv PRIVMSG #joxtacy :catJAM"]))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        chat.shutdown().unwrap();

        assert!(task.await.unwrap().is_ok());
        let log = entries(&log);
        assert_eq!(log.last().map(String::as_str), Some("sent: PRIVMSG #joxtacy :catJAM"));
    }

    #[tokio::test]
    async fn test_send_privmsg_waits_for_handshake() {
        let Harness {
            connection,
            servers,
            log,
            ..
        } = harness(1);
        let chat = connection.handle();

        let early = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send_privmsg("I am online, peeps! widepeepoHappy").await }
        });
        tokio::task::yield_now().await;
        assert!(!early.is_finished());
        assert_eq!(chat.state(), ConnectionState::Connecting);

        let task = tokio::spawn(connection.run());
        early.await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        chat.shutdown().unwrap();
        task.await.unwrap().unwrap();

        let log = entries(&log);
        assert_eq!(&log[..5], HANDSHAKE);
        assert_eq!(log[5], "sent: PRIVMSG #joxtacy :I am online, peeps! widepeepoHappy");
        drop(servers);
    }

    #[tokio::test]
    async fn test_reconnect_replays_handshake() {
        let Harness {
            mut connection,
            servers,
            log,
            closed,
            connects,
        } = harness(2);
        connection.on_message(recorder(log.clone(), "listener"));
        let chat = connection.handle();
        let mut events = chat.subscribe();
        let task = tokio::spawn(connection.run());

        servers[0].send(frame(&[":tmi.twitch.tv RECONNECT"])).unwrap();
        servers[1]
            .send(frame(&[":a!a@a.tmi.twitch.tv PRIVMSG #joxtacy :back"]))
            .unwrap();
        drop(servers);
        task.await.unwrap().ok();

        assert_eq!(*connects.lock().unwrap(), 2);
        assert!(*closed[0].lock().unwrap());

        let log = entries(&log);
        assert_eq!(&log[..5], HANDSHAKE);
        assert_eq!(log[5], "listener: RECONNECT");
        assert_eq!(&log[6..11], HANDSHAKE);
        assert_eq!(log[11], "listener: PRIVMSG");

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert!(seen.contains(&LifecycleEvent::ReconnectRequested));
        assert!(seen.contains(&LifecycleEvent::StateChanged(ConnectionState::Reconnecting)));
    }

    #[tokio::test]
    async fn test_failed_reconnect_closes() {
        let Harness {
            connection,
            servers,
            connects,
            ..
        } = harness(1);
        let chat = connection.handle();
        let task = tokio::spawn(connection.run());

        servers[0].send(frame(&[":tmi.twitch.tv RECONNECT"])).unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(ClientError::Connect(_))));
        assert_eq!(*connects.lock().unwrap(), 2);
        assert_eq!(chat.state(), ConnectionState::Closed);
        assert!(matches!(chat.send_privmsg("hello?").await, Err(ClientError::Closed)));
    }

    #[tokio::test]
    async fn test_connect_failure_is_reported() {
        let Harness { connection, .. } = harness(0);
        let chat = connection.handle();
        let mut events = chat.subscribe();

        let result = connection.run().await;
        assert!(matches!(result, Err(ClientError::Connect(_))));
        assert_eq!(chat.state(), ConnectionState::Closed);

        let mut saw_error = false;
        let mut saw_closed = false;
        while let Ok(event) = events.try_recv() {
            match event {
                LifecycleEvent::Error(_) => saw_error = true,
                LifecycleEvent::Closed { .. } => saw_closed = true,
                _ => {}
            }
        }
        assert!(saw_error && saw_closed);
    }

    #[tokio::test]
    async fn test_shutdown_closes_transport() {
        let Harness {
            connection,
            servers,
            closed,
            ..
        } = harness(1);
        let chat = connection.handle();
        let task = tokio::spawn(connection.run());

        chat.wait_ready().await.unwrap();
        chat.shutdown().unwrap();

        assert!(task.await.unwrap().is_ok());
        assert!(*closed[0].lock().unwrap());
        assert_eq!(chat.state(), ConnectionState::Closed);
        assert!(matches!(chat.say("too late"), Err(ClientError::Closed)));
        drop(servers);
    }
}
