//! Errors reported by the HTTP client.

use crate::network::error::Error as NetError;

/// Terminal failure of an HTTP fetch.
///
/// Every variant ends the current request. The engine never retries; a
/// caller that wants a retry starts over with a fresh session.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// No socket or network buffer was available.
    ResourceExhausted,
    /// A resolver or TCP operation failed; the collaborator's error is kept.
    Transport(NetError),
    /// The URL has no host or does not fit the session.
    InvalidUrl,
    /// The GET request does not fit in a network buffer.
    RequestTooLarge,
    /// The response does not start with an `HTTP/1.1 ` status line.
    MissingStatusLine,
    /// The server answered with a status other than 200.
    BadStatus(u16),
    /// The body is larger than the destination buffer.
    Truncated,
    /// The output stream refused a write.
    StreamWrite,
    /// A configuration blob could not be parsed.
    Config,
}

/// Coarse classification of an [`Error`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// Pool or socket allocation failed.
    ResourceExhausted,
    /// Resolve, connect, send, receive or close failed.
    TransportFailure,
    /// The response head is malformed or not a 200.
    ProtocolParseError,
    /// The body could not be handed to its consumer.
    DeliveryError,
    /// The caller passed an unusable URL or configuration.
    Usage,
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ResourceExhausted | Error::RequestTooLarge => ErrorKind::ResourceExhausted,
            Error::Transport(NetError::NotEnoughResources) => ErrorKind::ResourceExhausted,
            Error::Transport(_) => ErrorKind::TransportFailure,
            Error::MissingStatusLine | Error::BadStatus(_) => ErrorKind::ProtocolParseError,
            Error::Truncated | Error::StreamWrite => ErrorKind::DeliveryError,
            Error::InvalidUrl | Error::Config => ErrorKind::Usage,
        }
    }
}

impl From<NetError> for Error {
    fn from(err: NetError) -> Self {
        Error::Transport(err)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ResourceExhausted => f.write_str("no socket or buffer available"),
            Error::Transport(e) => write!(f, "transport failure: {e}"),
            Error::InvalidUrl => f.write_str("invalid url"),
            Error::RequestTooLarge => f.write_str("request does not fit in a network buffer"),
            Error::MissingStatusLine => f.write_str("missing HTTP/1.1 status line"),
            Error::BadStatus(code) => write!(f, "unexpected status {code}"),
            Error::Truncated => f.write_str("body truncated to destination capacity"),
            Error::StreamWrite => f.write_str("output stream write failed"),
            Error::Config => f.write_str("invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ResourceExhausted => defmt::write!(f, "ResourceExhausted"),
            Error::Transport(e) => defmt::write!(f, "Transport({})", e),
            Error::InvalidUrl => defmt::write!(f, "InvalidUrl"),
            Error::RequestTooLarge => defmt::write!(f, "RequestTooLarge"),
            Error::MissingStatusLine => defmt::write!(f, "MissingStatusLine"),
            Error::BadStatus(code) => defmt::write!(f, "BadStatus({})", code),
            Error::Truncated => defmt::write!(f, "Truncated"),
            Error::StreamWrite => defmt::write!(f, "StreamWrite"),
            Error::Config => defmt::write!(f, "Config"),
        }
    }
}
