//! Transport-level errors

/// Failure reported by a network collaborator (resolver, TCP stack, pool).
///
/// Protocol engines carry these unchanged inside their own error types, so
/// the caller can still tell a refused connect from a timeout.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The socket is not open.
    NotOpen,
    /// Sending failed.
    WriteError,
    /// Receiving failed.
    ReadError,
    /// The peer refused the connection.
    ConnectionRefused,
    /// A socket timeout expired.
    Timeout,
    /// The peer closed the connection.
    ConnectionClosed,
    /// The address is not usable.
    InvalidAddress,
    /// The resolver could not find the host.
    ResolveFailed,
    /// A socket or buffer could not be allocated.
    NotEnoughResources,
}

impl Error {
    /// Short name of the error.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::NotOpen => "not open",
            Error::WriteError => "write error",
            Error::ReadError => "read error",
            Error::ConnectionRefused => "connection refused",
            Error::Timeout => "timeout",
            Error::ConnectionClosed => "connection closed",
            Error::InvalidAddress => "invalid address",
            Error::ResolveFailed => "resolve failed",
            Error::NotEnoughResources => "not enough resources",
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
