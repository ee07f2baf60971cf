use thiserror::Error;

/// A recognised client command.
///
/// Verbs are matched against their canonical uppercase spelling only;
/// `join` is an unknown command, not `JOIN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Connection registration
    Cap(Vec<String>),
    Nick(String),
    User { username: String, realname: String },
    Quit(Option<String>),
    Ping(String),

    // Channel operations
    Join(Vec<String>),
    Part(Vec<String>, Option<String>), // channels, message

    // Messaging
    Privmsg { target: String, text: String },

    Unknown(String),
}

/// A known verb arrived without the parameters it needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("no nickname given")]
    NoNicknameGiven,
    #[error("{0}: not enough parameters")]
    NeedMoreParams(String),
    #[error("no recipient given ({0})")]
    NoRecipient(String),
    #[error("no text to send")]
    NoTextToSend,
    #[error("no origin specified")]
    NoOrigin,
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl Command {
    pub fn parse(command: &str, params: Vec<String>) -> Result<Self, CommandError> {
        match command {
            "CAP" => Ok(Command::Cap(params)),
            "NICK" => match params.into_iter().next() {
                Some(nick) if !nick.is_empty() => Ok(Command::Nick(nick)),
                _ => Err(CommandError::NoNicknameGiven),
            },
            "USER" => {
                // USER <username> <unused> <unused> <realname...>
                // The realname is normally one trailing parameter but a
                // bare multi-word tail is accepted too.
                if params.len() < 4 || params[0].is_empty() {
                    return Err(CommandError::NeedMoreParams(command.to_string()));
                }
                Ok(Command::User {
                    username: params[0].clone(),
                    realname: params[3..].join(" "),
                })
            }
            "QUIT" => Ok(Command::Quit(params.into_iter().next())),
            "PING" => match params.into_iter().next() {
                Some(token) if !token.is_empty() => Ok(Command::Ping(token)),
                _ => Err(CommandError::NoOrigin),
            },
            "JOIN" | "PART" => {
                let channels = params.first().map(|list| split_list(list)).unwrap_or_default();
                if channels.is_empty() {
                    return Err(CommandError::NeedMoreParams(command.to_string()));
                }
                if command == "JOIN" {
                    Ok(Command::Join(channels))
                } else {
                    Ok(Command::Part(channels, params.get(1).cloned()))
                }
            }
            "PRIVMSG" => {
                let mut params = params.into_iter();
                let target = match params.next() {
                    Some(target) if !target.is_empty() => target,
                    _ => return Err(CommandError::NoRecipient(command.to_string())),
                };
                match params.next() {
                    Some(text) if !text.is_empty() => Ok(Command::Privmsg { target, text }),
                    _ => Err(CommandError::NoTextToSend),
                }
            }
            _ => Ok(Command::Unknown(command.to_string())),
        }
    }
}
