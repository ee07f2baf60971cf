//! Line-based test client and an in-process server for integration tests.

#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sircd::protocol::Message;
use sircd::{server, ServerInfo, ServerState};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Bind an ephemeral port and run the accept loop in the background.
pub async fn start_server() -> (SocketAddr, Arc<ServerState>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(ServerState::new(ServerInfo::default()));

    tokio::spawn(server::serve(listener, Arc::clone(&state)));
    (addr, state)
}

pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Connect, register and swallow the welcome burst.
    pub async fn register(addr: SocketAddr, nick: &str) -> io::Result<Self> {
        let mut client = Self::connect(addr).await?;
        client.send(&format!("NICK {}", nick)).await?;
        client.send(&format!("USER {} 0 * :{} test", nick, nick)).await?;
        client.recv_until_code("376").await?;
        Ok(client)
    }

    /// Write raw bytes as-is.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await
    }

    pub async fn send(&mut self, line: &str) -> io::Result<()> {
        self.send_raw(format!("{}\r\n", line).as_bytes()).await
    }

    /// Next line without its terminator, or `None` once the server closed.
    pub async fn recv_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = timeout(RECV_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "no line from server"))??;

        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub async fn recv(&mut self) -> io::Result<Message> {
        let line = self
            .recv_line()
            .await?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "server closed"))?;
        line.parse::<Message>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub async fn recv_until_code(&mut self, code: &str) -> io::Result<Vec<Message>> {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = msg.command == code;
            messages.push(msg);
            if done {
                return Ok(messages);
            }
        }
    }

    /// True if nothing arrives within a short window.
    pub async fn is_quiet(&mut self) -> bool {
        let mut line = String::new();
        timeout(Duration::from_millis(200), self.reader.read_line(&mut line))
            .await
            .is_err()
    }

    /// Read until the server closes, returning what arrived on the way.
    pub async fn recv_to_close(&mut self) -> io::Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.recv_line().await? {
            lines.push(line);
        }
        Ok(lines)
    }
}

/// Poll until `check` holds; the registry is updated by other tasks.
pub async fn eventually<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
