//! Wire representation of a single protocol line.
//!
//! Shape: `[:prefix SPACE] command [SPACE params] [SPACE :trailing]`, without
//! the CR-LF terminator (the codec owns framing).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A parsed (or to-be-sent) protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Sender identity: the server name or `nick!user@host`.
    pub prefix: Option<String>,
    /// The verb or three-digit numeric.
    pub command: String,
    /// Middle parameters followed by the optional trailing one.
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty message")]
    Empty,
    #[error("prefix present but missing command")]
    MissingCommand,
}

impl Message {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            params: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }

    /// Parse one line. A trailing `\r\n` or `\n`, if still attached, is ignored.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim_end_matches(['\r', '\n']).trim_start_matches(' ');

        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        let (prefix, rest) = match input.strip_prefix(':') {
            Some(stripped) => match stripped.find(' ') {
                Some(idx) => (
                    Some(stripped[..idx].to_owned()),
                    stripped[idx + 1..].trim_start_matches(' '),
                ),
                None => return Err(ParseError::MissingCommand),
            },
            None => (None, input),
        };

        let (command, mut remaining) = match rest.find(' ') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };

        if command.is_empty() {
            return Err(ParseError::MissingCommand);
        }

        let mut params = Vec::new();
        loop {
            remaining = remaining.trim_start_matches(' ');
            if remaining.is_empty() {
                break;
            }
            if let Some(trailing) = remaining.strip_prefix(':') {
                // Everything to end of line, spaces included.
                params.push(trailing.to_owned());
                break;
            }
            match remaining.find(' ') {
                Some(idx) => {
                    params.push(remaining[..idx].to_owned());
                    remaining = &remaining[idx + 1..];
                }
                None => {
                    params.push(remaining.to_owned());
                    break;
                }
            }
        }

        Ok(Message {
            prefix,
            command: command.to_owned(),
            params,
        })
    }

    /// Serialize to wire format, without the terminator.
    pub fn to_wire(&self) -> String {
        let mut out = String::new();

        if let Some(ref prefix) = self.prefix {
            out.push(':');
            out.push_str(prefix);
            out.push(' ');
        }

        out.push_str(&self.command);

        if let Some((last, middle)) = self.params.split_last() {
            for param in middle {
                out.push(' ');
                out.push_str(param);
            }
            out.push(' ');
            if last.is_empty() || last.contains(' ') || last.starts_with(':') {
                out.push(':');
            }
            out.push_str(last);
        }

        out
    }
}

impl FromStr for Message {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::parse(s)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_command() {
        let msg = Message::parse("QUIT").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "QUIT");
        assert!(msg.params.is_empty());
    }

    #[test]
    fn parse_trailing_keeps_spaces() {
        let msg = Message::parse("PRIVMSG #lobby :hello there  friends").unwrap();
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#lobby", "hello there  friends"]);
    }

    #[test]
    fn parse_strips_prefix() {
        let msg = Message::parse(":alice!a@host JOIN #lobby").unwrap();
        assert_eq!(msg.prefix.as_deref(), Some("alice!a@host"));
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.params, vec!["#lobby"]);
    }

    #[test]
    fn parse_collapses_repeated_spaces() {
        let msg = Message::parse("USER  a   0 *  :Alice A").unwrap();
        assert_eq!(msg.params, vec!["a", "0", "*", "Alice A"]);
    }

    #[test]
    fn parse_empty_trailing() {
        let msg = Message::parse("PRIVMSG bob :").unwrap();
        assert_eq!(msg.params, vec!["bob", ""]);
    }

    #[test]
    fn parse_rejects_empty_and_bare_prefix() {
        assert_eq!(Message::parse(""), Err(ParseError::Empty));
        assert_eq!(Message::parse("   "), Err(ParseError::Empty));
        assert_eq!(Message::parse(":server"), Err(ParseError::MissingCommand));
    }

    #[test]
    fn wire_adds_colon_only_when_needed() {
        let join = Message::new("JOIN")
            .with_prefix("alice!a@127.0.0.1")
            .with_params(vec!["#lobby".to_string()]);
        assert_eq!(join.to_wire(), ":alice!a@127.0.0.1 JOIN #lobby");

        let privmsg = Message::new("PRIVMSG")
            .with_prefix("alice!a@127.0.0.1")
            .with_params(vec!["#lobby".to_string(), "hi there".to_string()]);
        assert_eq!(privmsg.to_string(), ":alice!a@127.0.0.1 PRIVMSG #lobby :hi there");

        let blank = Message::new("372").with_params(vec!["alice".to_string(), String::new()]);
        assert_eq!(blank.to_wire(), "372 alice :");
    }
}
