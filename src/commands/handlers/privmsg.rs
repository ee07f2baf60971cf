use tracing::trace;

use crate::protocol::{Message, Reply};
use crate::state::{Identity, ServerState};
use crate::utils::is_channel;

/// Relay to a channel (every member but the sender) or to one nickname.
/// Only failures produce a line for the sender.
pub fn handle_privmsg(
    server_state: &ServerState,
    identity: &Identity,
    target: String,
    text: String,
) -> Vec<Message> {
    let privmsg = Message::new("PRIVMSG")
        .with_prefix(identity.mask())
        .with_params(vec![target.clone(), text]);

    let result = if is_channel(&target) {
        server_state
            .registry
            .send_to_channel(&target, &identity.nick, &privmsg)
            .map(|delivered| {
                trace!(nick = %identity.nick, channel = %target, delivered, "Relayed");
            })
    } else {
        server_state.registry.send_to_client(&target, privmsg)
    };

    match result {
        Ok(()) => Vec::new(),
        Err(e) => {
            Reply::from_registry_error(&identity.nick, &e).to_messages(&server_state.info.name)
        }
    }
}
