//! Fake Twitch chat server.
//!
//! Speaks plain IRC over TCP so the bot can be pointed at it with an
//! `irc://` URL.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// Lines the bot must send first, in this order.
pub const HANDSHAKE: [&str; 5] = [
    "PASS oauth:testtoken",
    "NICK joxtabot",
    "JOIN #joxtacy",
    "CAP REQ :twitch.tv/membership",
    "CAP REQ :twitch.tv/tags twitch.tv/commands",
];

/// Listening side of the fake server.
pub struct FakeTmi {
    listener: TcpListener,
}

impl FakeTmi {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn url(&self) -> anyhow::Result<String> {
        Ok(format!("irc://{}", self.listener.local_addr()?))
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<TmiPeer> {
        let (stream, _) = timeout(Duration::from_secs(10), self.listener.accept()).await??;
        let (read_half, write_half) = stream.into_split();
        Ok(TmiPeer {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }
}

/// One bot connection, seen from the server.
pub struct TmiPeer {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TmiPeer {
    /// Send a raw line, adding CRLF if missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send bytes exactly as given.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line, terminator stripped.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("bot closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Receive lines until one equals `expected`; returns everything read.
    pub async fn recv_until(&mut self, expected: &str) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            let line = self.recv().await?;
            let done = line == expected;
            lines.push(line);
            if done {
                return Ok(lines);
            }
        }
    }

    /// Read and check the login sequence, then welcome the bot.
    pub async fn expect_handshake(&mut self) -> anyhow::Result<()> {
        for expected in HANDSHAKE {
            let line = self.recv().await?;
            anyhow::ensure!(line == expected, "expected {expected:?}, got {line:?}");
        }
        self.send_raw(":tmi.twitch.tv 001 joxtabot :Welcome, GLHF!")
            .await?;
        self.send_raw(":tmi.twitch.tv CAP * ACK :twitch.tv/membership")
            .await?;
        self.send_raw(":joxtabot!joxtabot@joxtabot.tmi.twitch.tv JOIN #joxtacy")
            .await
    }
}
