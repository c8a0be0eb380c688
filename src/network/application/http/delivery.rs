//! Body delivery strategies.
//!
//! The client hands every body chunk to a [`Delivery`]. Two strategies are
//! provided: [`StreamSink`] writes into a flow-controlled [`OutStream`],
//! [`BufferSink`] copies into a fixed destination slice.

use core::task::Poll;

use crate::system::pt::{Event, Pt};
use crate::system::stream::OutStream;

use super::error::Error;

/// Posted by a stream to a waiting [`StreamSink`] when it has free space.
pub const STREAM_WRITABLE: Event = Event::user(1);

/// Resumption point of a sink waiting for [`STREAM_WRITABLE`].
const WAIT_WRITABLE: u16 = 1;

/// Consumer of response body bytes.
///
/// Both hooks are suspendable calls with their own resumption slot, reset by
/// the client before every new entry.
pub trait Delivery {
    /// Called once after the head parsed with a non-zero length, before the
    /// first chunk. Does nothing unless overridden.
    fn poll_connect(&mut self, pt: &mut Pt, evt: Event) -> Poll<Result<(), Error>> {
        let _ = (pt, evt);
        Poll::Ready(Ok(()))
    }

    /// Deliver `chunk`, which starts `offset` bytes into the body.
    fn poll_recv(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        offset: usize,
        chunk: &[u8],
    ) -> Poll<Result<(), Error>>;
}

impl<D: Delivery + ?Sized> Delivery for &mut D {
    fn poll_connect(&mut self, pt: &mut Pt, evt: Event) -> Poll<Result<(), Error>> {
        (**self).poll_connect(pt, evt)
    }

    fn poll_recv(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        offset: usize,
        chunk: &[u8],
    ) -> Poll<Result<(), Error>> {
        (**self).poll_recv(pt, evt, offset, chunk)
    }
}

/// Writes the body into an output stream.
///
/// Each chunk is written whole: the sink suspends until the stream reports
/// at least `chunk.len()` free bytes and never splits a chunk across a
/// suspension. A chunk larger than the stream itself therefore never fits;
/// size the stream to at least one network buffer.
#[derive(Debug)]
pub struct StreamSink<S: OutStream> {
    stream: S,
}

impl<S: OutStream> StreamSink<S> {
    /// Wrap a stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// The wrapped stream.
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Give the stream back.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: OutStream> Delivery for StreamSink<S> {
    fn poll_connect(&mut self, pt: &mut Pt, _evt: Event) -> Poll<Result<(), Error>> {
        self.stream.connect_tx(pt.notify(STREAM_WRITABLE));
        Poll::Ready(Ok(()))
    }

    fn poll_recv(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        _offset: usize,
        chunk: &[u8],
    ) -> Poll<Result<(), Error>> {
        if pt.state() == WAIT_WRITABLE && evt != STREAM_WRITABLE {
            return Poll::Pending;
        }
        if self.stream.free_size() < chunk.len() {
            pt.set_state(WAIT_WRITABLE);
            return Poll::Pending;
        }
        pt.reset();

        match self.stream.write(chunk) {
            Ok(n) if n == chunk.len() => Poll::Ready(Ok(())),
            Ok(_) | Err(_) => Poll::Ready(Err(Error::StreamWrite)),
        }
    }
}

/// Copies the body into a fixed destination.
///
/// A chunk that would run past the end is cut to the bytes that fit and
/// the delivery fails with [`Error::Truncated`].
///
/// # Examples
///
/// ```rust
/// use core::task::Poll;
/// use embnet::network::application::http::{BufferSink, Delivery, Error};
/// use embnet::system::pt::{Event, Pt, TaskId};
///
/// let mut dest = [0u8; 4];
/// let mut sink = BufferSink::new(&mut dest);
/// let mut pt = Pt::new(TaskId(0));
/// assert_eq!(sink.poll_recv(&mut pt, Event::NONE, 0, b"ab"), Poll::Ready(Ok(())));
/// assert_eq!(
///     sink.poll_recv(&mut pt, Event::NONE, 2, b"cde"),
///     Poll::Ready(Err(Error::Truncated))
/// );
/// assert_eq!(&dest, b"abcd");
/// ```
#[derive(Debug)]
pub struct BufferSink<'a> {
    dest: &'a mut [u8],
}

impl<'a> BufferSink<'a> {
    /// Deliver into `dest`; its length is the capacity.
    pub fn new(dest: &'a mut [u8]) -> Self {
        Self { dest }
    }

    /// Destination capacity.
    pub fn capacity(&self) -> usize {
        self.dest.len()
    }

    /// The destination as written so far.
    pub fn as_slice(&self) -> &[u8] {
        self.dest
    }
}

impl Delivery for BufferSink<'_> {
    fn poll_recv(
        &mut self,
        _pt: &mut Pt,
        _evt: Event,
        offset: usize,
        chunk: &[u8],
    ) -> Poll<Result<(), Error>> {
        let room = self.dest.len().saturating_sub(offset);
        if chunk.len() <= room {
            self.dest[offset..offset + chunk.len()].copy_from_slice(chunk);
            Poll::Ready(Ok(()))
        } else {
            if room > 0 {
                self.dest[offset..].copy_from_slice(&chunk[..room]);
            }
            Poll::Ready(Err(Error::Truncated))
        }
    }
}
