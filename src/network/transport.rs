//! Transports - the byte pipes a [`Connection`](super::Connection) talks through.
//!
//! Twitch serves chat over WebSocket (`wss://irc-ws.chat.twitch.tv:443`) and
//! over plain IRC (`irc.chat.twitch.tv:6667`). Both are hidden behind
//! [`Transport`] so the run loop only ever sees batches of lines.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tmi_proto::{LineCodec, split_frame};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::codec::Framed;
use tracing::{debug, warn};

use crate::error::TransportError;

/// A connected line-oriented stream to the chat server.
#[async_trait]
pub trait Transport: Send {
    /// Write one line. The transport adds whatever terminator it needs.
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Read the lines carried by the next inbound frame.
    ///
    /// Returns `Ok(None)` once the server has closed the stream. Must be
    /// cancel-safe: it is polled inside `tokio::select!`.
    async fn next_lines(&mut self) -> Result<Option<Vec<String>>, TransportError>;

    /// Close the stream.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Opens fresh transports, for the first connect and after RECONNECT.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Transport>, TransportError>;
}

// ============================================================================
// WebSocket
// ============================================================================

/// Chat over WebSocket. One text frame may carry several CRLF-separated lines.
pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketTransport {
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (stream, response) = tokio_tungstenite::connect_async(url).await?;
        debug!(%url, status = %response.status(), "WebSocket connected");
        Ok(Self { stream })
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.stream.send(WsMessage::Text(line.to_owned())).await?;
        Ok(())
    }

    async fn next_lines(&mut self) -> Result<Option<Vec<String>>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    return Ok(Some(split_frame(&text).map(str::to_owned).collect()));
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(?frame, "WebSocket close frame received");
                    return Ok(None);
                }
                None => return Ok(None),
                Some(Ok(WsMessage::Binary(_))) => {
                    warn!("Ignoring binary WebSocket frame (chat is text-only)");
                }
                // tungstenite answers pings on the next read or write
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.stream.close(None).await?;
        Ok(())
    }
}

// ============================================================================
// Plain TCP
// ============================================================================

/// Chat over a plain TCP socket, framed with [`LineCodec`].
pub struct TcpTransport {
    framed: Framed<TcpStream, LineCodec>,
}

impl TcpTransport {
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        debug!(%addr, "TCP connected");
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        Self {
            framed: Framed::new(stream, LineCodec::new()),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.framed.send(line.to_owned()).await?;
        Ok(())
    }

    async fn next_lines(&mut self) -> Result<Option<Vec<String>>, TransportError> {
        match self.framed.next().await {
            Some(Ok(line)) => Ok(Some(vec![line])),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.framed.get_mut().shutdown().await?;
        Ok(())
    }
}

// ============================================================================
// Endpoint selection
// ============================================================================

/// Where to connect, decided by the URL scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `ws://` or `wss://`; the full URL is handed to tungstenite.
    WebSocket(String),
    /// `irc://host:port`; holds `host:port`.
    Tcp(String),
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, TransportError> {
        match url.split_once("://") {
            Some(("ws" | "wss", rest)) if !rest.is_empty() => {
                Ok(Endpoint::WebSocket(url.to_owned()))
            }
            Some(("irc", rest)) if !rest.trim_end_matches('/').is_empty() => {
                Ok(Endpoint::Tcp(rest.trim_end_matches('/').to_owned()))
            }
            _ => Err(TransportError::UnsupportedScheme(url.to_owned())),
        }
    }
}

/// [`Connector`] that opens a WebSocket or TCP transport for an [`Endpoint`].
#[derive(Debug, Clone)]
pub struct EndpointConnector {
    endpoint: Endpoint,
}

impl EndpointConnector {
    pub fn new(url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            endpoint: Endpoint::parse(url)?,
        })
    }
}

#[async_trait]
impl Connector for EndpointConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>, TransportError> {
        match &self.endpoint {
            Endpoint::WebSocket(url) => Ok(Box::new(WebSocketTransport::connect(url).await?)),
            Endpoint::Tcp(addr) => Ok(Box::new(TcpTransport::connect(addr).await?)),
        }
    }
}
