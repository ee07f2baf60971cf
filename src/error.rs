//! Error handling for the sircd server

use thiserror::Error;

/// Startup failures. These terminate the process before any listener is opened.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Network/listener error
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Log sink could not be opened
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Outcome of a rejected registry operation.
///
/// Every variant is recoverable and is reported to the requesting client only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("nickname {0} is already in use")]
    NickInUse(String),

    #[error("{nick} is already on {channel}")]
    AlreadyMember { nick: String, channel: String },

    #[error("{nick} is not on {channel}")]
    NotOnChannel { nick: String, channel: String },

    #[error("no such channel {0}")]
    NoSuchChannel(String),

    #[error("no such nick {0}")]
    NoSuchNick(String),

    #[error("cannot send to channel {0}")]
    CannotSendToChannel(String),
}
