//! A small line-oriented chat server speaking a subset of IRC.

pub mod actors;
pub mod commands;
pub mod error;
pub mod protocol;
pub mod security;
pub mod server;
pub mod state;
pub mod utils;

pub use crate::error::{RegistryError, ServerError};
pub use crate::state::{ServerInfo, ServerState};
pub use crate::utils::config::ServerConfig;
