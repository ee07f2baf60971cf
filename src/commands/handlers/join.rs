use tracing::debug;

use crate::protocol::{Message, Reply};
use crate::security::validate_channel_name;
use crate::state::{Identity, ServerState};

pub fn handle_join(
    server_state: &ServerState,
    identity: &Identity,
    channels: Vec<String>,
) -> Vec<Message> {
    let server_name = &server_state.info.name;
    let mut responses = Vec::new();

    for channel in channels {
        if !validate_channel_name(&channel) {
            debug!(nick = %identity.nick, channel = %channel, "Rejected JOIN to invalid name");
            let reply = Reply::NoSuchChannel {
                nick: identity.nick.clone(),
                channel,
            };
            responses.extend(reply.to_messages(server_name));
            continue;
        }

        match server_state.registry.join_channel(&channel, &identity.nick) {
            Ok(confirmation) => responses.push(confirmation),
            Err(e) => {
                let reply = Reply::from_registry_error(&identity.nick, &e);
                responses.extend(reply.to_messages(server_name));
            }
        }
    }

    responses
}
