use tokio::sync::mpsc;

use crate::protocol::Message;
use crate::state::{Client, ClientSink, Identity, ServerInfo, ServerState};

pub fn setup_test_state() -> ServerState {
    ServerState::new(ServerInfo::default())
}

pub fn identity(nick: &str) -> Identity {
    Identity {
        nick: nick.to_string(),
        username: nick.to_string(),
        hostname: "127.0.0.1".to_string(),
        realname: format!("{} test", nick),
    }
}

pub fn register(state: &ServerState, nick: &str) -> (Identity, mpsc::Receiver<Message>) {
    let identity = identity(nick);
    let (sink, rx) = ClientSink::new(32);
    let client = Client::new(state.registry.allocate_id(), identity.clone(), sink);
    state.registry.register_client(client).unwrap();
    (identity, rx)
}

pub fn drain(rx: &mut mpsc::Receiver<Message>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        lines.push(msg.to_wire());
    }
    lines
}

pub fn wire(messages: &[Message]) -> Vec<String> {
    messages.iter().map(Message::to_wire).collect()
}
