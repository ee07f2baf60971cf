use std::sync::Arc;

use tracing::debug;

use crate::protocol::{Command, Message, Reply};
use crate::state::{Identity, ServerState};

pub mod handlers;

/// What a session does with one dispatched line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Lines for the sender, possibly none.
    Reply(Vec<Message>),
    /// The client asked to leave.
    Quit(Option<String>),
}

/// Routes post-registration lines to their handlers.
pub struct CommandProcessor {
    server_state: Arc<ServerState>,
}

impl CommandProcessor {
    pub fn new(server_state: Arc<ServerState>) -> Self {
        Self { server_state }
    }

    pub fn process(&self, identity: &Identity, line: &str) -> Dispatch {
        let msg = match Message::parse(line) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(nick = %identity.nick, error = %e, "Ignoring unparsable line");
                return Dispatch::Reply(Vec::new());
            }
        };

        let verb = msg.command.clone();
        let command = match Command::parse(&msg.command, msg.params) {
            Ok(command) => command,
            Err(e) => {
                let reply = Reply::from_command_error(&identity.nick, &e);
                return Dispatch::Reply(self.failure(reply));
            }
        };

        debug!(nick = %identity.nick, ?command, "Processing command");
        let state = &*self.server_state;

        let replies = match command {
            Command::Join(channels) => handlers::join::handle_join(state, identity, channels),
            Command::Part(channels, reason) => {
                handlers::part::handle_part(state, identity, channels, reason)
            }
            Command::Privmsg { target, text } => {
                handlers::privmsg::handle_privmsg(state, identity, target, text)
            }
            Command::Ping(token) => handlers::ping::handle_ping(state, token),
            Command::Cap(_) => Vec::new(),
            Command::Quit(reason) => return Dispatch::Quit(reason),
            Command::Nick(_) | Command::User { .. } => self.failure(Reply::AlreadyRegistered {
                nick: identity.nick.clone(),
            }),
            Command::Unknown(_) => self.failure(Reply::UnknownCommand {
                nick: identity.nick.clone(),
                command: verb,
            }),
        };

        Dispatch::Reply(replies)
    }

    fn failure(&self, reply: Reply) -> Vec<Message> {
        reply.to_messages(&self.server_state.info.name)
    }
}
