use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use tracing::{debug, info};

use super::{Channel, Client, ClientId};
use crate::error::RegistryError;
use crate::protocol::Message;
use crate::utils::{normalize_channel_name, normalize_nickname};

/// Shared index of live clients and channels.
///
/// Lock order: a client entry is always taken before any channel entry.
/// Nothing acquires a client entry while holding a channel entry, so
/// join, part and disconnect cannot deadlock against each other, and each
/// of them updates both sides of a membership before releasing either.
pub struct Registry {
    clients: DashMap<String, Client>,
    channels: DashMap<String, Channel>,
    next_client_id: AtomicU64,
    max_clients: AtomicUsize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
            channels: DashMap::new(),
            next_client_id: AtomicU64::new(1),
            max_clients: AtomicUsize::new(0),
        }
    }

    pub fn allocate_id(&self) -> ClientId {
        ClientId(self.next_client_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Check-and-insert in one step: of two racing registrations for the
    /// same nickname exactly one succeeds.
    pub fn register_client(&self, client: Client) -> Result<(), RegistryError> {
        let key = normalize_nickname(client.nick());
        match self.clients.entry(key) {
            Entry::Occupied(_) => return Err(RegistryError::NickInUse(client.identity.nick)),
            Entry::Vacant(entry) => {
                info!(nick = %client.identity.nick, id = %client.id, "Client registered");
                entry.insert(client);
            }
        }

        // Counting visits every shard, so only after the entry guard is gone.
        self.max_clients.fetch_max(self.clients.len(), Ordering::Relaxed);
        Ok(())
    }

    pub fn lookup_client(&self, nick: &str) -> Option<Client> {
        self.clients
            .get(&normalize_nickname(nick))
            .map(|client| client.value().clone())
    }

    pub fn contains_nick(&self, nick: &str) -> bool {
        self.clients.contains_key(&normalize_nickname(nick))
    }

    /// Drop an identity without telling anyone. Its memberships go with it.
    /// Returns `false` if the nickname was not registered.
    pub fn unregister_client(&self, nick: &str) -> bool {
        self.remove_client(nick, None, None).is_some()
    }

    /// Remove a client, leave all its channels and send each remaining peer
    /// one QUIT line.
    ///
    /// Only the entry registered under `id` is removed, so a repeated call,
    /// or one racing a newer client that took the same nickname, is a no-op.
    pub fn disconnect_client(&self, nick: &str, id: ClientId, reason: &str) -> bool {
        match self.remove_client(nick, Some(id), Some(reason)) {
            Some(client) => {
                info!(nick = %client.identity.nick, id = %id, reason, "Client disconnected");
                true
            }
            None => {
                debug!(nick, id = %id, "Disconnect of already removed client ignored");
                false
            }
        }
    }

    fn remove_client(
        &self,
        nick: &str,
        id: Option<ClientId>,
        reason: Option<&str>,
    ) -> Option<Client> {
        let entry = match self.clients.entry(normalize_nickname(nick)) {
            Entry::Occupied(entry) if id.map_or(true, |id| entry.get().id == id) => entry,
            _ => return None,
        };

        {
            let client = entry.get();
            let quit = reason.map(|reason| {
                Message::new("QUIT")
                    .with_prefix(client.mask())
                    .with_params(vec![reason.to_string()])
            });
            let mut notified = HashSet::new();

            for channel_key in &client.channels {
                let Entry::Occupied(mut channel) = self.channels.entry(channel_key.clone()) else {
                    continue;
                };
                channel.get_mut().remove_member(entry.key());

                if let Some(quit) = &quit {
                    for (member_key, sink) in channel.get().members() {
                        if notified.insert(member_key.clone()) {
                            sink.deliver(quit.clone());
                        }
                    }
                }

                if channel.get().is_empty() {
                    let removed = channel.remove();
                    info!(channel = %removed.name, "Channel removed");
                }
            }
        }

        let (_, client) = entry.remove_entry();
        Some(client)
    }

    /// Existing channel, or a new empty one inserted under `key`. Callers
    /// hold the returned guard until the first member is in.
    fn get_or_create_channel(&self, key: &str, name: &str) -> RefMut<'_, String, Channel> {
        self.channels.entry(key.to_string()).or_insert_with(|| {
            info!(channel = name, "Channel created");
            Channel::new(name.to_string())
        })
    }

    /// Add `nick` to a channel, creating it if needed, and announce the join
    /// to the members already present. Returns the JOIN line for the joiner.
    pub fn join_channel(&self, channel_name: &str, nick: &str) -> Result<Message, RegistryError> {
        let key = normalize_nickname(nick);
        let channel_key = normalize_channel_name(channel_name);

        let mut client = self
            .clients
            .get_mut(&key)
            .ok_or_else(|| RegistryError::NoSuchNick(nick.to_string()))?;

        if client.channels.contains(&channel_key) {
            return Err(RegistryError::AlreadyMember {
                nick: client.identity.nick.clone(),
                channel: channel_name.to_string(),
            });
        }

        let mut channel = self.get_or_create_channel(&channel_key, channel_name);
        let join = Message::new("JOIN")
            .with_prefix(client.mask())
            .with_params(vec![channel.name.clone()]);

        // Not a member yet, so this reaches everyone else.
        channel.broadcast(&join, None);
        channel.add_member(key, client.sink.clone());
        client.channels.insert(channel_key);

        debug!(nick, channel = %channel.name, members = channel.member_count(), "Joined channel");
        Ok(join)
    }

    /// Announce the part to the other members, then drop the membership.
    /// The channel goes away with its last member. Returns the PART line.
    pub fn leave_channel(
        &self,
        channel_name: &str,
        nick: &str,
        reason: Option<&str>,
    ) -> Result<Message, RegistryError> {
        let key = normalize_nickname(nick);
        let channel_key = normalize_channel_name(channel_name);

        let mut client = self
            .clients
            .get_mut(&key)
            .ok_or_else(|| RegistryError::NoSuchNick(nick.to_string()))?;

        if !client.channels.contains(&channel_key) {
            return Err(if self.channels.contains_key(&channel_key) {
                RegistryError::NotOnChannel {
                    nick: client.identity.nick.clone(),
                    channel: channel_name.to_string(),
                }
            } else {
                RegistryError::NoSuchChannel(channel_name.to_string())
            });
        }

        let mut channel = match self.channels.entry(channel_key.clone()) {
            Entry::Occupied(channel) => channel,
            Entry::Vacant(_) => return Err(RegistryError::NoSuchChannel(channel_name.to_string())),
        };
        client.channels.remove(&channel_key);

        let mut params = vec![channel.get().name.clone()];
        params.extend(reason.map(str::to_string));
        let part = Message::new("PART")
            .with_prefix(client.mask())
            .with_params(params);

        channel.get_mut().remove_member(&key);
        channel.get().broadcast(&part, None);

        if channel.get().is_empty() {
            let removed = channel.remove();
            info!(channel = %removed.name, "Channel removed");
        }

        Ok(part)
    }

    /// Deliver to every member but the sender, who must be on the channel.
    pub fn send_to_channel(
        &self,
        channel_name: &str,
        sender: &str,
        message: &Message,
    ) -> Result<usize, RegistryError> {
        let sender_key = normalize_nickname(sender);
        let channel = self
            .channels
            .get(&normalize_channel_name(channel_name))
            .ok_or_else(|| RegistryError::NoSuchChannel(channel_name.to_string()))?;

        if !channel.is_member(&sender_key) {
            return Err(RegistryError::CannotSendToChannel(channel_name.to_string()));
        }

        Ok(channel.broadcast(message, Some(&sender_key)))
    }

    pub fn send_to_client(&self, nick: &str, message: Message) -> Result<(), RegistryError> {
        let client = self
            .clients
            .get(&normalize_nickname(nick))
            .ok_or_else(|| RegistryError::NoSuchNick(nick.to_string()))?;

        client.sink.deliver(message);
        Ok(())
    }

    pub fn is_member(&self, channel_name: &str, nick: &str) -> bool {
        self.channels
            .get(&normalize_channel_name(channel_name))
            .map(|channel| channel.is_member(&normalize_nickname(nick)))
            .unwrap_or(false)
    }

    /// Normalized member nicknames, or `None` if the channel does not exist.
    pub fn channel_members(&self, channel_name: &str) -> Option<Vec<String>> {
        self.channels
            .get(&normalize_channel_name(channel_name))
            .map(|channel| channel.member_keys())
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn nicknames(&self) -> Vec<String> {
        self.clients.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients.load(Ordering::Relaxed)
    }
}
