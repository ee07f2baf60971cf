use super::Message;
use crate::error::RegistryError;
use crate::protocol::CommandError;

/// Server-originated numeric replies.
///
/// `nick` is always the recipient's nickname, or `*` before registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    // Welcome burst
    Welcome { nick: String, network: String, mask: String },
    YourHost { nick: String, servername: String, version: String },
    Created { nick: String, date: String },
    LuserClient { nick: String, users: usize },
    LuserUnknown { nick: String, unknown: usize },
    LuserChannels { nick: String, channels: usize },
    LuserMe { nick: String, clients: usize },
    LocalUsers { nick: String, current: usize, max: usize },
    GlobalUsers { nick: String, current: usize, max: usize },
    MotdStart { nick: String, server: String },
    Motd { nick: String, line: String },
    EndOfMotd { nick: String },

    // Errors
    NoSuchNick { nick: String, target: String },
    NoSuchChannel { nick: String, channel: String },
    CannotSendToChan { nick: String, channel: String },
    NoOrigin { nick: String },
    NoRecipient { nick: String, command: String },
    NoTextToSend { nick: String },
    InputTooLong { nick: String },
    UnknownCommand { nick: String, command: String },
    NoNicknameGiven { nick: String },
    ErroneousNickname { nick: String, attempted: String },
    NicknameInUse { nick: String, attempted: String },
    NotOnChannel { nick: String, channel: String },
    UserOnChannel { nick: String, target: String, channel: String },
    NotRegistered { nick: String },
    AlreadyRegistered { nick: String },
    NeedMoreParams { nick: String, command: String },
}

impl Reply {
    pub fn code(&self) -> &'static str {
        match self {
            Reply::Welcome { .. } => "001",
            Reply::YourHost { .. } => "002",
            Reply::Created { .. } => "003",
            Reply::LuserClient { .. } => "251",
            Reply::LuserUnknown { .. } => "253",
            Reply::LuserChannels { .. } => "254",
            Reply::LuserMe { .. } => "255",
            Reply::LocalUsers { .. } => "265",
            Reply::GlobalUsers { .. } => "266",
            Reply::MotdStart { .. } => "375",
            Reply::Motd { .. } => "372",
            Reply::EndOfMotd { .. } => "376",
            Reply::NoSuchNick { .. } => "401",
            Reply::NoSuchChannel { .. } => "403",
            Reply::CannotSendToChan { .. } => "404",
            Reply::NoOrigin { .. } => "409",
            Reply::NoRecipient { .. } => "411",
            Reply::NoTextToSend { .. } => "412",
            Reply::InputTooLong { .. } => "417",
            Reply::UnknownCommand { .. } => "421",
            Reply::NoNicknameGiven { .. } => "431",
            Reply::ErroneousNickname { .. } => "432",
            Reply::NicknameInUse { .. } => "433",
            Reply::NotOnChannel { .. } => "442",
            Reply::UserOnChannel { .. } => "443",
            Reply::NotRegistered { .. } => "451",
            Reply::AlreadyRegistered { .. } => "462",
            Reply::NeedMoreParams { .. } => "461",
        }
    }

    pub fn to_message(&self, server_name: &str) -> Message {
        let params = match self {
            Reply::Welcome { nick, network, mask } => vec![
                nick.clone(),
                format!("Welcome to the {} IRC Network, {}", network, mask),
            ],
            Reply::YourHost { nick, servername, version } => vec![
                nick.clone(),
                format!("Your host is {}, running version {}", servername, version),
            ],
            Reply::Created { nick, date } => {
                vec![nick.clone(), format!("This server was created {}", date)]
            }
            Reply::LuserClient { nick, users } => vec![
                nick.clone(),
                format!("There are {} users and 0 invisible on 1 servers", users),
            ],
            Reply::LuserUnknown { nick, unknown } => vec![
                nick.clone(),
                unknown.to_string(),
                "unknown connection(s)".to_string(),
            ],
            Reply::LuserChannels { nick, channels } => vec![
                nick.clone(),
                channels.to_string(),
                "channels formed".to_string(),
            ],
            Reply::LuserMe { nick, clients } => vec![
                nick.clone(),
                format!("I have {} clients and 0 servers", clients),
            ],
            Reply::LocalUsers { nick, current, max } => vec![
                nick.clone(),
                current.to_string(),
                max.to_string(),
                format!("Current local users {}, max {}", current, max),
            ],
            Reply::GlobalUsers { nick, current, max } => vec![
                nick.clone(),
                current.to_string(),
                max.to_string(),
                format!("Current global users {}, max {}", current, max),
            ],
            Reply::MotdStart { nick, server } => vec![
                nick.clone(),
                format!("- {} Message of the day -", server),
            ],
            Reply::Motd { nick, line } => vec![nick.clone(), format!("- {}", line)],
            Reply::EndOfMotd { nick } => vec![nick.clone(), "End of /MOTD command".to_string()],
            Reply::NoSuchNick { nick, target } => vec![
                nick.clone(),
                target.clone(),
                "No such nick/channel".to_string(),
            ],
            Reply::NoSuchChannel { nick, channel } => vec![
                nick.clone(),
                channel.clone(),
                "No such channel".to_string(),
            ],
            Reply::CannotSendToChan { nick, channel } => vec![
                nick.clone(),
                channel.clone(),
                "Cannot send to channel".to_string(),
            ],
            Reply::NoOrigin { nick } => vec![nick.clone(), "No origin specified".to_string()],
            Reply::NoRecipient { nick, command } => vec![
                nick.clone(),
                format!("No recipient given ({})", command),
            ],
            Reply::NoTextToSend { nick } => vec![nick.clone(), "No text to send".to_string()],
            Reply::InputTooLong { nick } => {
                vec![nick.clone(), "Input line was too long".to_string()]
            }
            Reply::UnknownCommand { nick, command } => vec![
                nick.clone(),
                command.clone(),
                "Unknown command".to_string(),
            ],
            Reply::NoNicknameGiven { nick } => {
                vec![nick.clone(), "No nickname given".to_string()]
            }
            Reply::ErroneousNickname { nick, attempted } => vec![
                nick.clone(),
                attempted.clone(),
                "Erroneous nickname".to_string(),
            ],
            Reply::NicknameInUse { nick, attempted } => vec![
                nick.clone(),
                attempted.clone(),
                "Nickname is already in use".to_string(),
            ],
            Reply::NotOnChannel { nick, channel } => vec![
                nick.clone(),
                channel.clone(),
                "You're not on that channel".to_string(),
            ],
            Reply::UserOnChannel { nick, target, channel } => vec![
                nick.clone(),
                target.clone(),
                channel.clone(),
                "is already on channel".to_string(),
            ],
            Reply::NotRegistered { nick } => {
                vec![nick.clone(), "You have not registered".to_string()]
            }
            Reply::AlreadyRegistered { nick } => {
                vec![nick.clone(), "You may not reregister".to_string()]
            }
            Reply::NeedMoreParams { nick, command } => vec![
                nick.clone(),
                command.clone(),
                "Not enough parameters".to_string(),
            ],
        };

        Message::new(self.code())
            .with_prefix(server_name)
            .with_params(params)
    }

    /// Plain-text description of a failure reply, `None` for informational ones.
    pub fn error_text(&self) -> Option<String> {
        let text = match self {
            Reply::NoSuchNick { target, .. } => format!("No such nick {}", target),
            Reply::NoSuchChannel { channel, .. } => format!("Channel {} not found", channel),
            Reply::CannotSendToChan { channel, .. } => {
                format!("You are not in channel {}", channel)
            }
            Reply::NoOrigin { .. } => "No origin specified".to_string(),
            Reply::NoRecipient { command, .. } => format!("No recipient given ({})", command),
            Reply::NoTextToSend { .. } => "No text to send".to_string(),
            Reply::InputTooLong { .. } => "Input line was too long".to_string(),
            Reply::UnknownCommand { command, .. } => format!("Unknown command {}", command),
            Reply::NoNicknameGiven { .. } => "No nickname given".to_string(),
            Reply::ErroneousNickname { attempted, .. } => {
                format!("Erroneous nickname {}", attempted)
            }
            Reply::NicknameInUse { attempted, .. } => {
                format!("Nickname {} is already in use", attempted)
            }
            Reply::NotOnChannel { channel, .. } => format!("You are not in channel {}", channel),
            Reply::UserOnChannel { channel, .. } => {
                format!("You are already in channel {}", channel)
            }
            Reply::NotRegistered { .. } => "You have not registered".to_string(),
            Reply::AlreadyRegistered { .. } => "You may not reregister".to_string(),
            Reply::NeedMoreParams { command, .. } => {
                format!("Not enough parameters for {}", command)
            }
            _ => return None,
        };
        Some(text)
    }

    /// The numeric, followed by `:<server> ERROR :<text>` when it reports a
    /// failure the session recovers from.
    pub fn to_messages(&self, server_name: &str) -> Vec<Message> {
        let mut messages = vec![self.to_message(server_name)];
        if let Some(text) = self.error_text() {
            messages.push(
                Message::new("ERROR")
                    .with_prefix(server_name)
                    .with_params(vec![text]),
            );
        }
        messages
    }

    /// Maps a rejected registry operation to the reply its requester sees.
    pub fn from_registry_error(nick: &str, error: &RegistryError) -> Self {
        let nick = nick.to_string();
        match error {
            RegistryError::NickInUse(attempted) => Reply::NicknameInUse {
                nick,
                attempted: attempted.clone(),
            },
            RegistryError::AlreadyMember { nick: target, channel } => Reply::UserOnChannel {
                nick,
                target: target.clone(),
                channel: channel.clone(),
            },
            RegistryError::NotOnChannel { channel, .. } => Reply::NotOnChannel {
                nick,
                channel: channel.clone(),
            },
            RegistryError::NoSuchChannel(channel) => Reply::NoSuchChannel {
                nick,
                channel: channel.clone(),
            },
            RegistryError::NoSuchNick(target) => Reply::NoSuchNick {
                nick,
                target: target.clone(),
            },
            RegistryError::CannotSendToChannel(channel) => Reply::CannotSendToChan {
                nick,
                channel: channel.clone(),
            },
        }
    }

    pub fn from_command_error(nick: &str, error: &CommandError) -> Self {
        let nick = nick.to_string();
        match error {
            CommandError::NoNicknameGiven => Reply::NoNicknameGiven { nick },
            CommandError::NeedMoreParams(command) => Reply::NeedMoreParams {
                nick,
                command: command.clone(),
            },
            CommandError::NoRecipient(command) => Reply::NoRecipient {
                nick,
                command: command.clone(),
            },
            CommandError::NoTextToSend => Reply::NoTextToSend { nick },
            CommandError::NoOrigin => Reply::NoOrigin { nick },
        }
    }
}
