use crate::protocol::Message;
use crate::state::ServerState;

/// PONG goes straight back to the sender, never to a channel.
pub fn handle_ping(server_state: &ServerState, token: String) -> Vec<Message> {
    let server_name = &server_state.info.name;
    vec![Message::new("PONG")
        .with_prefix(server_name.clone())
        .with_params(vec![server_name.clone(), token])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ServerInfo;

    #[test]
    fn pong_echoes_the_token() {
        let state = ServerState::new(ServerInfo::default());
        let replies = handle_ping(&state, "LAG123".to_string());
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].to_wire(), ":irc.local PONG irc.local LAG123");

        let replies = handle_ping(&state, "two words".to_string());
        assert_eq!(replies[0].to_wire(), ":irc.local PONG irc.local :two words");
    }
}
