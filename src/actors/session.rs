use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::SinkExt;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tokio_stream::StreamExt;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::commands::handlers::welcome::welcome_burst;
use crate::commands::{CommandProcessor, Dispatch};
use crate::protocol::{Command, Frame, LineCodec, Message, Reply};
use crate::security::validation::USERLEN;
use crate::security::{
    sanitize_realname, truncate_at_char_boundary, validate_nickname, validate_username,
};
use crate::state::{Client, ClientId, ClientSink, Identity, ServerState};

/// Handshake progress of one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Connecting,
    AwaitingNick,
    /// NICK accepted provisionally; the name is not reserved until USER.
    AwaitingUser { nick: String },
    Registered { id: ClientId, identity: Identity },
    Closed,
}

impl Phase {
    fn is_registered(&self) -> bool {
        matches!(self, Phase::Registered { .. })
    }

    /// Name used as the first parameter of numeric replies.
    fn reply_nick(&self) -> &str {
        match self {
            Phase::Registered { identity, .. } => &identity.nick,
            _ => "*",
        }
    }
}

fn quit_text(reason: &Option<String>) -> &str {
    reason.as_deref().unwrap_or("Client Quit")
}

/// Why a session ended. The text doubles as the QUIT reason peers see.
#[derive(Debug, Error)]
enum CloseReason {
    #[error("{}", quit_text(.0))]
    Quit(Option<String>),
    #[error("Nickname is already in use")]
    NickInUse,
    #[error("Registration timed out")]
    Timeout,
    #[error("Connection closed")]
    EndOfStream,
    #[error("{0}")]
    Io(io::Error),
    #[error("Write timed out")]
    WriteTimeout,
    #[error("SendQ exceeded")]
    SendQueueExceeded,
}

impl CloseReason {
    /// Whether the peer is told with an ERROR line before the socket closes.
    fn notifies_peer(&self) -> bool {
        matches!(
            self,
            CloseReason::Quit(_)
                | CloseReason::NickInUse
                | CloseReason::Timeout
                | CloseReason::SendQueueExceeded
        )
    }
}

/// One accepted connection: its handshake, then its command loop.
///
/// Direct replies are written to the stream by this task. Lines from other
/// sessions arrive through the mailbox behind `sink`.
pub struct Session<S> {
    addr: SocketAddr,
    stream: Framed<S, LineCodec>,
    server_state: Arc<ServerState>,
    processor: CommandProcessor,
    rx: mpsc::Receiver<Message>,
    sink: ClientSink,
    phase: Phase,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, addr: SocketAddr, server_state: Arc<ServerState>) -> Self {
        let (sink, rx) = ClientSink::new(server_state.info.send_queue);

        Self {
            addr,
            stream: Framed::new(stream, LineCodec::new()),
            processor: CommandProcessor::new(Arc::clone(&server_state)),
            server_state,
            rx,
            sink,
            phase: Phase::Connecting,
        }
    }

    pub async fn run(mut self) {
        info!(addr = %self.addr, "Session started");
        self.phase = Phase::AwaitingNick;

        let registration_deadline = sleep(self.server_state.info.registration_timeout);
        tokio::pin!(registration_deadline);

        let reason = loop {
            let step = tokio::select! {
                frame = self.stream.next() => match frame {
                    Some(Ok(Frame::Line(line))) => self.handle_line(line).await,
                    Some(Ok(Frame::TooLong)) => {
                        let nick = self.phase.reply_nick().to_string();
                        self.send_reply(Reply::InputTooLong { nick }).await
                    }
                    Some(Err(e)) => Err(CloseReason::Io(e)),
                    None => Err(CloseReason::EndOfStream),
                },

                Some(msg) = self.rx.recv() => self.send_all(vec![msg]).await,

                _ = self.sink.killed() => Err(CloseReason::SendQueueExceeded),

                _ = &mut registration_deadline, if !self.phase.is_registered() => {
                    Err(CloseReason::Timeout)
                }
            };

            if let Err(reason) = step {
                break reason;
            }
        };

        self.close(reason).await;
    }

    async fn handle_line(&mut self, line: String) -> Result<(), CloseReason> {
        debug!(addr = %self.addr, line = %line, "Received");

        if let Phase::Registered { identity, .. } = &self.phase {
            return match self.processor.process(identity, &line) {
                Dispatch::Reply(messages) => self.send_all(messages).await,
                Dispatch::Quit(reason) => Err(CloseReason::Quit(reason)),
            };
        }

        self.handshake(&line).await
    }

    async fn handshake(&mut self, line: &str) -> Result<(), CloseReason> {
        let msg = match Message::parse(line) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(addr = %self.addr, error = %e, "Ignoring unparsable line");
                return Ok(());
            }
        };

        let command = match Command::parse(&msg.command, msg.params) {
            Ok(command) => command,
            Err(e) => return self.send_reply(Reply::from_command_error("*", &e)).await,
        };

        match command {
            Command::Cap(params) => {
                debug!(addr = %self.addr, ?params, "Ignoring capability negotiation");
                Ok(())
            }
            Command::Nick(nick) => self.handle_nick(nick).await,
            Command::User { username, realname } => self.handle_user(username, realname).await,
            Command::Quit(reason) => Err(CloseReason::Quit(reason)),
            _ => {
                self.send_reply(Reply::NotRegistered {
                    nick: "*".to_string(),
                })
                .await
            }
        }
    }

    async fn handle_nick(&mut self, nick: String) -> Result<(), CloseReason> {
        if !validate_nickname(&nick) {
            return self
                .send_reply(Reply::ErroneousNickname {
                    nick: "*".to_string(),
                    attempted: nick,
                })
                .await;
        }

        if self.server_state.registry.contains_nick(&nick) {
            info!(addr = %self.addr, nick = %nick, "Nickname collision during handshake");
            self.send_fatal(Reply::NicknameInUse {
                nick: "*".to_string(),
                attempted: nick,
            })
            .await?;
            return Err(CloseReason::NickInUse);
        }

        self.phase = Phase::AwaitingUser { nick };
        Ok(())
    }

    async fn handle_user(&mut self, username: String, realname: String) -> Result<(), CloseReason> {
        let nick = match &self.phase {
            Phase::AwaitingUser { nick } => nick.clone(),
            _ => {
                return self
                    .send_reply(Reply::NotRegistered {
                        nick: "*".to_string(),
                    })
                    .await
            }
        };

        let username = truncate_at_char_boundary(&username, USERLEN).to_string();
        if !validate_username(&username) {
            return self
                .send_reply(Reply::NeedMoreParams {
                    nick: "*".to_string(),
                    command: "USER".to_string(),
                })
                .await;
        }

        let identity = Identity {
            nick,
            username,
            hostname: self.addr.ip().to_string(),
            realname: sanitize_realname(&realname),
        };

        let registry = &self.server_state.registry;
        let id = registry.allocate_id();
        let client = Client::new(id, identity.clone(), self.sink.clone());

        // The nickname may have been taken since NICK was accepted.
        if let Err(e) = registry.register_client(client) {
            self.send_fatal(Reply::from_registry_error("*", &e)).await?;
            return Err(CloseReason::NickInUse);
        }

        let burst = welcome_burst(&self.server_state, &identity);
        info!(addr = %self.addr, id = %id, mask = %identity.mask(), "Registration complete");
        self.phase = Phase::Registered { id, identity };

        self.send_all(burst).await
    }

    /// A reply the session survives; failures carry their ERROR line.
    async fn send_reply(&mut self, reply: Reply) -> Result<(), CloseReason> {
        let messages = reply.to_messages(&self.server_state.info.name);
        self.send_all(messages).await
    }

    /// The numeric alone. The closing ERROR line follows from `close`.
    async fn send_fatal(&mut self, reply: Reply) -> Result<(), CloseReason> {
        let msg = reply.to_message(&self.server_state.info.name);
        self.send_all(vec![msg]).await
    }

    /// Write and flush, giving up after the configured write timeout.
    async fn send_all(&mut self, messages: Vec<Message>) -> Result<(), CloseReason> {
        if messages.is_empty() {
            return Ok(());
        }

        let stream = &mut self.stream;
        let write = async move {
            for msg in messages {
                stream.feed(msg).await?;
            }
            stream.flush().await
        };

        match timeout(self.server_state.info.write_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(CloseReason::Io(e)),
            Err(_) => Err(CloseReason::WriteTimeout),
        }
    }

    /// Consumes the session, so cleanup runs once per connection.
    async fn close(mut self, reason: CloseReason) {
        match &reason {
            CloseReason::Io(e) => warn!(addr = %self.addr, error = %e, "Session I/O failure"),
            CloseReason::WriteTimeout => warn!(addr = %self.addr, "Session write timed out"),
            _ => {}
        }

        let phase = std::mem::replace(&mut self.phase, Phase::Closed);
        if let Phase::Registered { id, identity } = phase {
            self.server_state
                .registry
                .disconnect_client(&identity.nick, id, &reason.to_string());
        }

        if reason.notifies_peer() {
            let error = Message::new("ERROR").with_params(vec![format!(
                "Closing link: {} ({})",
                self.addr.ip(),
                reason
            )]);
            let _ = self.send_all(vec![error]).await;
        }

        let _ = timeout(self.server_state.info.write_timeout, self.stream.close()).await;
        info!(addr = %self.addr, reason = %reason, "Session closed");
    }
}
