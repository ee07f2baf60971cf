use std::collections::HashMap;

use super::ClientSink;
use crate::protocol::Message;

/// A named group. Members are keyed by normalized nickname.
///
/// Channels are only ever touched through the registry, which holds the
/// lock that keeps both sides of the membership relation in step.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    members: HashMap<String, ClientSink>,
}

impl Channel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            members: HashMap::new(),
        }
    }

    pub fn add_member(&mut self, key: String, sink: ClientSink) -> bool {
        if self.members.contains_key(&key) {
            return false;
        }

        self.members.insert(key, sink);
        true
    }

    pub fn remove_member(&mut self, key: &str) -> bool {
        self.members.remove(key).is_some()
    }

    pub fn is_member(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = (&String, &ClientSink)> {
        self.members.iter()
    }

    pub fn member_keys(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    /// Fan a line out to every member except `exclude`. Returns how many
    /// mailboxes accepted it; a failed peer is skipped, never retried.
    pub fn broadcast(&self, message: &Message, exclude: Option<&str>) -> usize {
        self.members
            .iter()
            .filter(|(key, _)| Some(key.as_str()) != exclude)
            .filter(|(_, sink)| sink.deliver(message.clone()))
            .count()
    }
}
