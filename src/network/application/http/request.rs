//! GET request serialization.

use crate::network::buffer::NetBuffer;

use super::error::Error;

/// Bytes of fixed text around the path, host and agent.
const TEMPLATE_LEN: usize = b"GET ".len()
    + b" HTTP/1.1\r\n".len()
    + b"Host: ".len()
    + b"\r\n".len()
    + b"Connection: keep-alive\r\n".len()
    + b"User-Agent: ".len()
    + b"\r\n\r\n".len();

/// The part of `host` that goes into the `Host` header: everything before
/// the first `/`.
pub fn host_header(host: &str) -> &str {
    match host.find('/') {
        Some(i) => &host[..i],
        None => host,
    }
}

/// Exact length of the request [`build_get`] writes.
pub fn required_len(path: &str, host: &str, user_agent: &str) -> usize {
    TEMPLATE_LEN + path.len() + host_header(host).len() + user_agent.len()
}

/// Write a GET request for `path` on `host` into `buf`, replacing its
/// contents.
///
/// Fails with [`Error::RequestTooLarge`] before writing anything when the
/// request is longer than `buf` can hold.
///
/// # Examples
///
/// ```rust
/// use embnet::network::buffer::NetBuffer;
/// use embnet::network::application::http::request::build_get;
///
/// let mut buf = NetBuffer::new();
/// build_get(&mut buf, "/index.html", "example.com", "embnet").unwrap();
/// assert!(buf.as_slice().starts_with(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n"));
/// assert!(buf.as_slice().ends_with(b"User-Agent: embnet\r\n\r\n"));
/// ```
pub fn build_get(
    buf: &mut NetBuffer,
    path: &str,
    host: &str,
    user_agent: &str,
) -> Result<(), Error> {
    buf.clear();
    if required_len(path, host, user_agent) > buf.remaining_capacity() {
        return Err(Error::RequestTooLarge);
    }

    // Request line
    buf.extend_from_slice(b"GET ")
        .map_err(|_| Error::RequestTooLarge)?;
    buf.extend_from_slice(path.as_bytes())
        .map_err(|_| Error::RequestTooLarge)?;
    buf.extend_from_slice(b" HTTP/1.1\r\n")
        .map_err(|_| Error::RequestTooLarge)?;

    // Headers
    buf.extend_from_slice(b"Host: ")
        .map_err(|_| Error::RequestTooLarge)?;
    buf.extend_from_slice(host_header(host).as_bytes())
        .map_err(|_| Error::RequestTooLarge)?;
    buf.extend_from_slice(b"\r\nConnection: keep-alive\r\nUser-Agent: ")
        .map_err(|_| Error::RequestTooLarge)?;
    buf.extend_from_slice(user_agent.as_bytes())
        .map_err(|_| Error::RequestTooLarge)?;
    buf.extend_from_slice(b"\r\n\r\n")
        .map_err(|_| Error::RequestTooLarge)?;

    Ok(())
}
