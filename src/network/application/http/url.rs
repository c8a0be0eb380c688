//! URL normalization.
//!
//! Accepts `[http://]host[:port][/path]`. The scheme prefix is optional and
//! the path defaults to `/`.

use super::error::Error;

const SCHEME: &str = "http://";

/// The parts of a URL the client needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    /// Authority as written, `host[:port]`; sent in the `Host` header.
    pub authority: &'a str,
    /// Host name handed to the resolver.
    pub host: &'a str,
    /// Explicit port, if the URL names one.
    pub port: Option<u16>,
    /// Request path, starting with `/`.
    pub path: &'a str,
}

/// Split a URL into authority, host, port and path.
///
/// # Examples
///
/// ```rust
/// use embnet::network::application::http::url::split;
///
/// let t = split("http://example.com:8080/fw.bin").unwrap();
/// assert_eq!(t.authority, "example.com:8080");
/// assert_eq!(t.host, "example.com");
/// assert_eq!(t.port, Some(8080));
/// assert_eq!(t.path, "/fw.bin");
///
/// assert_eq!(split("example.com").unwrap().path, "/");
/// ```
pub fn split(url: &str) -> Result<Target<'_>, Error> {
    let rest = match url.get(..SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => &url[SCHEME.len()..],
        _ => url,
    };

    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };

    if authority.is_empty() || authority.contains(char::is_whitespace) {
        return Err(Error::InvalidUrl);
    }

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => {
            // Other schemes end up here as "scheme:" with an empty port.
            let port = port.parse::<u16>().map_err(|_| Error::InvalidUrl)?;
            (host, Some(port))
        }
        None => (authority, None),
    };
    if host.is_empty() {
        return Err(Error::InvalidUrl);
    }

    Ok(Target {
        authority,
        host,
        port,
        path,
    })
}
