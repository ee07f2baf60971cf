use std::collections::HashSet;
use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::warn;

use crate::protocol::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who a registered client is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub nick: String,
    pub username: String,
    pub hostname: String,
    pub realname: String,
}

impl Identity {
    /// `nick!username@hostname`, the prefix of every line this client originates.
    pub fn mask(&self) -> String {
        format!("{}!{}@{}", self.nick, self.username, self.hostname)
    }
}

/// Write-only handle to one session's outbound mailbox.
///
/// Delivery never blocks. A full mailbox means the peer cannot keep up; the
/// peer is then flagged for disconnection and its own session tears it down.
#[derive(Debug, Clone)]
pub struct ClientSink {
    tx: mpsc::Sender<Message>,
    kill: CancellationToken,
}

impl ClientSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let sink = Self {
            tx,
            kill: CancellationToken::new(),
        };
        (sink, rx)
    }

    /// Queue a line. Returns `false` if it was dropped.
    pub fn deliver(&self, msg: Message) -> bool {
        match self.tx.try_send(msg) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                if !self.kill.is_cancelled() {
                    warn!("Outbound queue full, dropping slow peer");
                    self.kill.cancel();
                }
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub fn is_killed(&self) -> bool {
        self.kill.is_cancelled()
    }

    /// Resolves once the peer has been flagged as too slow.
    pub fn killed(&self) -> WaitForCancellationFuture<'_> {
        self.kill.cancelled()
    }
}

/// A registered client as held by the registry.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub identity: Identity,
    pub sink: ClientSink,
    /// Normalized names of the channels this client is on.
    pub channels: HashSet<String>,
}

impl Client {
    pub fn new(id: ClientId, identity: Identity, sink: ClientSink) -> Self {
        Self {
            id,
            identity,
            sink,
            channels: HashSet::new(),
        }
    }

    pub fn nick(&self) -> &str {
        &self.identity.nick
    }

    pub fn mask(&self) -> String {
        self.identity.mask()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_joins_identity_parts() {
        let identity = Identity {
            nick: "alice".to_string(),
            username: "a".to_string(),
            hostname: "127.0.0.1".to_string(),
            realname: "Alice A".to_string(),
        };
        assert_eq!(identity.mask(), "alice!a@127.0.0.1");
    }

    #[test]
    fn full_mailbox_flags_the_peer() {
        let (sink, mut rx) = ClientSink::new(1);
        assert!(sink.deliver(Message::new("PING")));
        assert!(!sink.is_killed());

        assert!(!sink.deliver(Message::new("PING")));
        assert!(sink.is_killed());

        assert_eq!(rx.try_recv().unwrap().command, "PING");
    }

    #[test]
    fn closed_mailbox_is_skipped_silently() {
        let (sink, rx) = ClientSink::new(4);
        drop(rx);
        assert!(!sink.deliver(Message::new("PING")));
        assert!(!sink.is_killed());
    }
}
