use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::utils::config::ServerConfig;

pub mod channel;
pub mod client;
pub mod registry;

pub use self::channel::Channel;
pub use self::client::{Client, ClientId, ClientSink, Identity};
pub use self::registry::Registry;

/// Static facts about this server, fixed at startup.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub network: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub motd: Vec<String>,
    pub registration_timeout: Duration,
    pub write_timeout: Duration,
    pub send_queue: usize,
}

impl ServerInfo {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            name: config.server.name.clone(),
            network: config.server.network.clone(),
            version: format!("sircd-{}", env!("CARGO_PKG_VERSION")),
            created_at: Utc::now(),
            motd: config.server.motd.clone(),
            registration_timeout: config.limits.registration_timeout(),
            write_timeout: config.limits.write_timeout(),
            send_queue: config.limits.send_queue,
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

/// Everything the sessions share.
pub struct ServerState {
    pub registry: Registry,
    pub info: ServerInfo,
}

impl ServerState {
    pub fn new(info: ServerInfo) -> Self {
        Self {
            registry: Registry::new(),
            info,
        }
    }
}
