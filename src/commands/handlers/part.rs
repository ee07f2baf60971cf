use crate::protocol::{Message, Reply};
use crate::state::{Identity, ServerState};

pub fn handle_part(
    server_state: &ServerState,
    identity: &Identity,
    channels: Vec<String>,
    reason: Option<String>,
) -> Vec<Message> {
    let server_name = &server_state.info.name;

    channels
        .into_iter()
        .flat_map(|channel| {
            match server_state
                .registry
                .leave_channel(&channel, &identity.nick, reason.as_deref())
            {
                Ok(part) => vec![part],
                Err(e) => {
                    let reply = Reply::from_registry_error(&identity.nick, &e);
                    reply.to_messages(server_name)
                }
            }
        })
        .collect()
}
