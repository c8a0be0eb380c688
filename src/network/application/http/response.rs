//! Incremental response-head parser.
//!
//! The parser looks at one freshly received buffer at a time and keeps no
//! state between calls. A head that is split across two segments is
//! reported as [`Head::Incomplete`] for the first one; the bytes of that
//! segment are not carried into the next attempt.

use heapless::String;

use crate::network::buffer::NetBuffer;

use super::error::Error;

/// Longest `Content-Type` value kept; longer values are cut.
pub const MAX_CONTENT_TYPE_LEN: usize = 64;

const STATUS_PREFIX: &[u8] = b"HTTP/1.1 ";
const CONTENT: &[u8] = b"Content-";
const TYPE: &[u8] = b"Type:";
const LENGTH: &[u8] = b"Length:";

/// The interpreted fields of a response head.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseHead {
    /// Status code; always 200 for a head that parsed.
    pub status: u16,
    /// `Content-Type` value, if present.
    pub content_type: Option<String<MAX_CONTENT_TYPE_LEN>>,
    /// `Content-Length` value; 0 when absent.
    pub content_length: usize,
}

/// Outcome of [`parse_head`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// The blank line was found; the buffer now starts at the body.
    Complete(ResponseHead),
    /// The buffer ended before the blank line.
    Incomplete,
}

/// Parse the status line and headers at the start of `buf`.
///
/// On [`Head::Complete`] the buffer's logical start is moved past the blank
/// line, leaving only the body bytes that arrived in the same segment.
/// On [`Head::Incomplete`] and on error the buffer is untouched.
///
/// # Errors
///
/// * [`Error::MissingStatusLine`] - the buffer does not begin with `HTTP/1.1 `
/// * [`Error::BadStatus`] - the status code is anything but 200
///
/// # Examples
///
/// ```rust
/// use embnet::network::buffer::NetBuffer;
/// use embnet::network::application::http::response::{parse_head, Head};
///
/// let mut buf = NetBuffer::from_slice(
///     b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhel",
/// ).unwrap();
/// let Head::Complete(head) = parse_head(&mut buf).unwrap() else { panic!() };
/// assert_eq!(head.content_length, 5);
/// assert_eq!(head.content_type.as_deref(), Some("text/plain"));
/// assert_eq!(buf.as_slice(), b"hel");
/// ```
pub fn parse_head(buf: &mut NetBuffer) -> Result<Head, Error> {
    let bytes = buf.as_slice();

    if !bytes.starts_with(STATUS_PREFIX) {
        return Err(Error::MissingStatusLine);
    }
    let status = leading_number(&bytes[STATUS_PREFIX.len()..]);
    let status = u16::try_from(status).unwrap_or(u16::MAX);
    if status != 200 {
        return Err(Error::BadStatus(status));
    }

    let mut head = ResponseHead {
        status,
        ..ResponseHead::default()
    };

    let Some(mut cur) = next_line(bytes, STATUS_PREFIX.len()) else {
        return Ok(Head::Incomplete);
    };
    while cur < bytes.len() {
        let line = &bytes[cur..];
        if starts_with_ignore_case(line, CONTENT) {
            let field = &line[CONTENT.len()..];
            if starts_with_ignore_case(field, TYPE) {
                head.content_type = Some(header_text(&field[TYPE.len()..]));
            } else if starts_with_ignore_case(field, LENGTH) {
                head.content_length = leading_number(&field[LENGTH.len()..]);
            }
        } else if line.starts_with(b"\r\n") {
            buf.advance(cur + 2);
            return Ok(Head::Complete(head));
        }

        match next_line(bytes, cur) {
            Some(next) => cur = next,
            None => break,
        }
    }

    Ok(Head::Incomplete)
}

/// Index just past the next `\n` at or after `from`.
fn next_line(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| from + i + 1)
}

fn starts_with_ignore_case(bytes: &[u8], prefix: &[u8]) -> bool {
    bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Decimal value of the digits after optional blanks, like C `atoi` but
/// unsigned and saturating.
fn leading_number(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .skip_while(|&&b| b == b' ' || b == b'\t')
        .take_while(|b| b.is_ascii_digit())
        .fold(0usize, |acc, &b| {
            acc.saturating_mul(10).saturating_add(usize::from(b - b'0'))
        })
}

/// Header value up to the end of its line, trimmed and cut to capacity.
fn header_text(bytes: &[u8]) -> String<MAX_CONTENT_TYPE_LEN> {
    let end = bytes
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(bytes.len());
    let value = bytes[..end].trim_ascii();
    let value = &value[..value.len().min(MAX_CONTENT_TYPE_LEN)];
    let text = match core::str::from_utf8(value) {
        Ok(text) => text,
        // Cut inside a multi-byte character, or not UTF-8 at all.
        Err(e) => core::str::from_utf8(&value[..e.valid_up_to()]).unwrap_or_default(),
    };

    let mut out = String::new();
    // `text` is at most MAX_CONTENT_TYPE_LEN bytes.
    let _ = out.push_str(text);
    out
}
