pub mod validation;

pub use self::validation::{
    sanitize_realname, truncate_at_char_boundary, validate_channel_name, validate_nickname,
    validate_username,
};
