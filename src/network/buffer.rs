//! Pooled network buffers.
//!
//! A [`NetBuffer`] is an owned, fixed-capacity byte region with a logical
//! window `[start, len)`. Ownership moves explicitly: the pool owns a buffer
//! until it is acquired, the acquirer owns it until it releases it or hands
//! it to the transport, and the transport hands received buffers back out
//! as owned values. Moving the value is the ownership transfer, so a buffer
//! can never be released twice.

use heapless::Vec;

/// TCP maximum segment size the buffers are sized for.
pub const TCP_MSS: usize = 1460;

/// Capacity of every pooled buffer.
pub const NET_BUFFER_SIZE: usize = TCP_MSS;

/// An owned network buffer.
///
/// # Examples
///
/// ```rust
/// use embnet::network::buffer::NetBuffer;
///
/// let mut buf = NetBuffer::new();
/// buf.extend_from_slice(b"HTTP/1.1 200 OK").unwrap();
/// buf.advance(9);
/// assert_eq!(buf.as_slice(), b"200 OK");
/// assert_eq!(buf.len(), 6);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct NetBuffer {
    data: Vec<u8, NET_BUFFER_SIZE>,
    start: usize,
}

impl NetBuffer {
    /// An empty buffer.
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            start: 0,
        }
    }

    /// A buffer holding a copy of `bytes`, or `None` if they do not fit.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let mut buf = Self::new();
        buf.extend_from_slice(bytes).ok()?;
        Some(buf)
    }

    /// Total bytes the buffer can hold.
    pub const fn capacity(&self) -> usize {
        NET_BUFFER_SIZE
    }

    /// Bytes that can still be appended.
    pub fn remaining_capacity(&self) -> usize {
        NET_BUFFER_SIZE - self.data.len()
    }

    /// The usable bytes, from the logical start to the end of data.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.start..]
    }

    /// Usable length.
    pub fn len(&self) -> usize {
        self.data.len() - self.start
    }

    /// `true` when no usable bytes remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append bytes after the current data.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), ()> {
        self.data.extend_from_slice(bytes)
    }

    /// Move the logical start forward by `n` bytes, clamped to the data end.
    pub fn advance(&mut self, n: usize) {
        self.start = (self.start + n).min(self.data.len());
    }

    /// Drop all data and reset the logical start.
    pub fn clear(&mut self) {
        self.data.clear();
        self.start = 0;
    }
}

impl Default for NetBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of network buffers shared by every session on a device.
///
/// Acquisition fails when the pool is exhausted or the request is larger
/// than a buffer; callers report that as an error instead of retrying.
pub trait BufferPool {
    /// Take a cleared buffer able to hold at least `min_size` bytes.
    fn acquire(&mut self, min_size: usize) -> Option<NetBuffer>;

    /// Give a buffer back.
    fn release(&mut self, buf: NetBuffer);
}

/// A pool of `N` preallocated buffers.
///
/// # Examples
///
/// ```rust
/// use embnet::network::buffer::{BufferPool, FixedPool};
///
/// let mut pool: FixedPool<2> = FixedPool::new();
/// let a = pool.acquire(64).unwrap();
/// let b = pool.acquire(64).unwrap();
/// assert!(pool.acquire(64).is_none());
/// pool.release(a);
/// pool.release(b);
/// assert_eq!(pool.available(), 2);
/// ```
#[derive(Debug)]
pub struct FixedPool<const N: usize> {
    free: Vec<NetBuffer, N>,
    acquired: usize,
    released: usize,
}

impl<const N: usize> FixedPool<N> {
    /// Create a pool with all `N` buffers free.
    pub fn new() -> Self {
        let mut free = Vec::new();
        while free.push(NetBuffer::new()).is_ok() {}
        Self {
            free,
            acquired: 0,
            released: 0,
        }
    }

    /// Buffers currently free.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Buffers currently held outside the pool.
    pub fn outstanding(&self) -> usize {
        N - self.free.len()
    }

    /// Successful acquisitions since creation.
    pub fn acquired(&self) -> usize {
        self.acquired
    }

    /// Releases since creation.
    pub fn released(&self) -> usize {
        self.released
    }
}

impl<const N: usize> Default for FixedPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> BufferPool for FixedPool<N> {
    fn acquire(&mut self, min_size: usize) -> Option<NetBuffer> {
        if min_size > NET_BUFFER_SIZE {
            return None;
        }
        let mut buf = self.free.pop()?;
        buf.clear();
        self.acquired += 1;
        Some(buf)
    }

    fn release(&mut self, buf: NetBuffer) {
        // A buffer from outside this pool would overfill it; drop it instead.
        if self.free.push(buf).is_ok() {
            self.released += 1;
        }
    }
}
