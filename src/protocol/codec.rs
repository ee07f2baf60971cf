use std::cmp;
use std::io;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

use super::Message;

/// Longest accepted line, terminator included.
pub const MAX_LINE_LENGTH: usize = 512;

/// One unit produced by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete line with its terminator stripped.
    Line(String),
    /// A line exceeded `MAX_LINE_LENGTH`; its bytes are dropped.
    TooLong,
}

/// Splits a byte stream into protocol lines.
///
/// Lines end in CR-LF; a bare LF is tolerated. The decoder never buffers
/// more than one maximum-length line: once a line overflows it reports
/// `Frame::TooLong` and skips input until the next LF.
pub struct LineCodec {
    max_length: usize,
    next_index: usize,
    discarding: bool,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
            discarding: false,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_carriage_return(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl Decoder for LineCodec {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            // A line feed at index max_length - 1 still fits.
            let read_to = cmp::min(self.max_length, buf.len());
            let newline = buf[self.next_index..read_to]
                .iter()
                .position(|&b| b == b'\n')
                .map(|offset| offset + self.next_index);

            match (self.discarding, newline) {
                (true, Some(idx)) => {
                    buf.advance(idx + 1);
                    self.discarding = false;
                    self.next_index = 0;
                }
                (true, None) => {
                    buf.advance(read_to);
                    self.next_index = 0;
                    if buf.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(idx)) => {
                    self.next_index = 0;
                    let line = buf.split_to(idx + 1);
                    let line = strip_carriage_return(&line[..idx]);
                    let line = String::from_utf8_lossy(line).into_owned();
                    trace!("Received: {}", line);
                    return Ok(Some(Frame::Line(line)));
                }
                (false, None) if buf.len() >= self.max_length => {
                    self.discarding = true;
                    return Ok(Some(Frame::TooLong));
                }
                (false, None) => {
                    self.next_index = read_to;
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }
        if !buf.is_empty() && !self.discarding {
            debug!("Dropping {} unterminated bytes at end of stream", buf.len());
        }
        buf.clear();
        self.next_index = 0;
        self.discarding = false;
        Ok(None)
    }
}

impl Encoder<Message> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, msg: Message, buf: &mut BytesMut) -> Result<(), Self::Error> {
        let wire = msg.to_wire();
        trace!("Sending: {}", wire);
        buf.reserve(wire.len() + 2);
        buf.put_slice(wire.as_bytes());
        buf.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> Option<Frame> {
        Some(Frame::Line(s.to_string()))
    }

    #[test]
    fn decode_line_split_across_reads() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("JOIN #t");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"est\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), line("JOIN #test"));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_several_lines_in_one_read() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("NICK alice\r\nUSER a 0 * :Alice A\r\nJOIN");

        assert_eq!(codec.decode(&mut buf).unwrap(), line("NICK alice"));
        assert_eq!(codec.decode(&mut buf).unwrap(), line("USER a 0 * :Alice A"));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(&buf[..], b"JOIN");
    }

    #[test]
    fn decode_tolerates_bare_line_feed() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING a\nPING b\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), line("PING a"));
        assert_eq!(codec.decode(&mut buf).unwrap(), line("PING b"));
    }

    #[test]
    fn decode_carriage_return_split_from_line_feed() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING x\r");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), line("PING x"));
    }

    #[test]
    fn decode_accepts_line_at_limit() {
        let mut codec = LineCodec::new();
        let body = "A".repeat(MAX_LINE_LENGTH - 2);
        let mut buf = BytesMut::from(format!("{}\r\n", body).as_str());
        assert_eq!(codec.decode(&mut buf).unwrap(), line(&body));
    }

    #[test]
    fn decode_reports_oversized_line_then_recovers() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(vec![b'A'; MAX_LINE_LENGTH + 100].as_slice());

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Frame::TooLong));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"AAAA\r\nPING ok\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), line("PING ok"));
    }

    #[test]
    fn decode_eof_drops_unterminated_fragment() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING a\r\nPART");
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), line("PING a"));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        let msg = Message::new("PONG")
            .with_prefix("irc.local")
            .with_params(vec!["irc.local".to_string(), "token".to_string()]);
        codec.encode(msg, &mut buf).unwrap();
        assert_eq!(&buf[..], b":irc.local PONG irc.local token\r\n");
    }
}
