//! Output stream collaborator.
//!
//! A stream is a bounded byte FIFO owned by some consumer (a file, a USB
//! endpoint, a decoder). Producers check [`OutStream::free_size`] before
//! writing and register a [`Notify`] so the consumer can wake them once space
//! is available again.

use super::pt::Notify;

/// Error reported by a stream write.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StreamError {
    /// The consumer side is gone.
    Disconnected,
    /// The stream accepted fewer bytes than requested.
    Overflow,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StreamError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            StreamError::Disconnected => defmt::write!(f, "Disconnected"),
            StreamError::Overflow => defmt::write!(f, "Overflow"),
        }
    }
}

/// Producer side of a bounded output stream.
pub trait OutStream {
    /// Bytes that can be written right now without overflowing.
    fn free_size(&self) -> usize;

    /// Write bytes into the stream, returning how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, StreamError>;

    /// Connect the producer side and register the wake-up to post whenever
    /// the consumer frees space.
    fn connect_tx(&mut self, on_writable: Notify);
}

impl<S: OutStream + ?Sized> OutStream for &mut S {
    fn free_size(&self) -> usize {
        (**self).free_size()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, StreamError> {
        (**self).write(bytes)
    }

    fn connect_tx(&mut self, on_writable: Notify) {
        (**self).connect_tx(on_writable)
    }
}
