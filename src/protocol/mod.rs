pub mod codec;
pub mod commands;
pub mod message;
pub mod replies;

pub use self::codec::{Frame, LineCodec, MAX_LINE_LENGTH};
pub use self::commands::{Command, CommandError};
pub use self::message::{Message, ParseError};
pub use self::replies::Reply;
