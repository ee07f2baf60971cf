use once_cell::sync::Lazy;
use regex::Regex;

pub const NICKLEN: usize = 30;
pub const CHANNELLEN: usize = 50;
pub const USERLEN: usize = 18;

static NICKNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z\[\]\\`_^{|}][a-zA-Z0-9\[\]\\`_^{|}-]{0,29}$").unwrap()
});

static CHANNEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[#&][^\x00\x07\x0a\x0d ,:]{1,49}$").unwrap()
});

static VALID_USER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\x00\x0a\x0d @]+$").unwrap()
});

pub fn validate_nickname(nick: &str) -> bool {
    if nick.is_empty() || nick.len() > NICKLEN {
        return false;
    }

    NICKNAME_REGEX.is_match(nick)
}

pub fn validate_channel_name(name: &str) -> bool {
    if name.is_empty() || name.len() > CHANNELLEN {
        return false;
    }

    CHANNEL_REGEX.is_match(name)
}

pub fn validate_username(username: &str) -> bool {
    if username.is_empty() || username.len() > USERLEN {
        return false;
    }

    VALID_USER_REGEX.is_match(username)
}

/// Longest prefix of `input` that fits in `max_bytes` without splitting a char.
pub fn truncate_at_char_boundary(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }
    let mut end = max_bytes;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    &input[..end]
}

/// Control characters other than space are stripped; the result may be empty.
pub fn sanitize_realname(realname: &str) -> String {
    realname
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
