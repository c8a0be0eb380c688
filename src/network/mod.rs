//! A non-blocking network abstraction layer for embedded systems
//!
//! The traits here describe the collaborators a protocol engine drives: a
//! name resolver, a TCP socket layer and the shared buffer pool. Every
//! operation that can take time is a suspendable call: it receives the
//! caller's resumption slot and the current event and returns
//! [`Poll`](core::task::Poll). See [`crate::system::pt`] for the contract.
//!
//! A device stack usually implements all of them on one type, which then
//! satisfies [`NetStack`] automatically.

#![deny(unsafe_code)]

use core::net::{Ipv4Addr, SocketAddrV4};
use core::task::Poll;

use crate::system::pt::{Event, Pt};

/// Common error types for network operations
pub mod error;

/// Pooled, owned network buffers
pub mod buffer;

/// Application-layer protocol engines
pub mod application;

pub use buffer::{BufferPool, FixedPool, NetBuffer};
pub use error::Error;

/// Re-exports of common traits
pub mod prelude {
    pub use super::buffer::BufferPool;
    pub use super::{NetStack, Resolve, Tcp};
}

/// Per-socket timeouts in milliseconds; 0 disables a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SocketTimeouts {
    /// Receive timeout.
    pub rx_ms: u32,
    /// Send timeout.
    pub tx_ms: u32,
}

/// Host name resolution.
pub trait Resolve {
    /// Resolve `host` to an IPv4 address.
    fn poll_resolve(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        host: &str,
    ) -> Poll<Result<Ipv4Addr, Error>>;
}

/// A non-blocking TCP socket layer.
///
/// Timeouts surface as [`Error::Timeout`] from the suspendable calls.
pub trait Tcp {
    /// Socket handle.
    type Socket;

    /// Allocate a socket, `None` when the stack has none left.
    fn socket(&mut self) -> Option<Self::Socket>;

    /// Configure receive and send timeouts.
    fn set_timeouts(&mut self, socket: &mut Self::Socket, timeouts: SocketTimeouts);

    /// Current timeouts.
    fn timeouts(&self, socket: &Self::Socket) -> SocketTimeouts;

    /// Connect to `remote`.
    fn poll_connect(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        socket: &mut Self::Socket,
        remote: SocketAddrV4,
    ) -> Poll<Result<(), Error>>;

    /// Send the contents of `buf`.
    ///
    /// The stack takes the buffer out of `buf` once it accepts ownership of
    /// it, and returns it to the pool itself. Whatever is still in `buf`
    /// when the call completes belongs to the caller.
    fn poll_send(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        socket: &mut Self::Socket,
        buf: &mut Option<NetBuffer>,
    ) -> Poll<Result<(), Error>>;

    /// Receive the next segment as an owned buffer.
    fn poll_recv(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        socket: &mut Self::Socket,
    ) -> Poll<Result<NetBuffer, Error>>;

    /// Gracefully close the connection.
    fn poll_close(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        socket: &mut Self::Socket,
    ) -> Poll<Result<(), Error>>;

    /// Free the socket. Never fails; safe after a graceful close.
    fn free(&mut self, socket: Self::Socket);
}

/// A complete stack: resolver, TCP and buffer pool.
pub trait NetStack: Resolve + Tcp + BufferPool {}

impl<T: Resolve + Tcp + BufferPool> NetStack for T {}
