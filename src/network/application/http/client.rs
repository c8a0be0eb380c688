//! HTTP GET client protothread.
//!
//! [`Session::advance`] runs one resumable step of a fetch:
//!
//! ```text
//! normalize URL -> resolve -> socket + connect -> build + send GET
//!      -> receive loop { parse head | on_connect | on_recv }
//!      -> graceful close -> teardown
//! ```
//!
//! Every suspendable call site has its own resumption slot in the session,
//! reset right before each new entry. A failed connect skips the graceful
//! close: there is no established connection to close, only a socket to
//! free. Whatever fails first is the error reported; a failing close never
//! overrides it. Teardown releases any held buffer and frees the socket on
//! every exit path.
//!
//! # Examples
//!
//! ```rust,no_run
//! use core::task::Poll;
//! use embnet::network::NetStack;
//! use embnet::network::application::http::{BufferSink, Config, Error, Session};
//! use embnet::system::pt::{Event, TaskId};
//!
//! fn fetch<N: NetStack>(
//!     net: &mut N,
//!     next_event: impl Fn() -> Event,
//!     dest: &mut [u8],
//! ) -> Result<usize, Error> {
//!     let mut session: Session<'_, N::Socket> = Session::new(TaskId(1), Config::default());
//!     let mut sink = BufferSink::new(dest);
//!     let mut evt = Event::NONE;
//!     loop {
//!         match session.advance(net, evt, "http://example.com/fw.bin", &mut sink) {
//!             Poll::Pending => evt = next_event(),
//!             Poll::Ready(res) => return res.map(|()| session.delivered()),
//!         }
//!     }
//! }
//! ```

use core::net::SocketAddrV4;
use core::task::Poll;

use heapless::String;

use crate::network::buffer::{BufferPool, NET_BUFFER_SIZE, NetBuffer};
use crate::network::{Error as NetError, NetStack, SocketTimeouts};
use crate::system::pt::{Event, Pt, TaskId};

use super::config::Config;
use super::delivery::Delivery;
use super::error::Error;
use super::request;
use super::response::{self, Head, ResponseHead};
use super::url;

/// Longest `host[:port]` a session can hold.
pub const MAX_HOST_LEN: usize = 128;
/// Longest request path a session can hold.
pub const MAX_PATH_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Resolve,
    Connect,
    Send,
    Receive,
    OnConnect,
    OnRecv,
    Close,
    Teardown,
    Done,
}

/// Resumption slots, one per suspendable call site.
#[derive(Debug, Clone, Copy)]
struct Frames {
    resolve: Pt,
    connect: Pt,
    send: Pt,
    recv: Pt,
    on_connect: Pt,
    on_recv: Pt,
    close: Pt,
}

impl Frames {
    const fn new(task: TaskId) -> Self {
        Self {
            resolve: Pt::new(task),
            connect: Pt::new(task),
            send: Pt::new(task),
            recv: Pt::new(task),
            on_connect: Pt::new(task),
            on_recv: Pt::new(task),
            close: Pt::new(task),
        }
    }
}

/// State of one in-flight GET.
///
/// Create it before the first [`advance`](Session::advance) and keep it
/// until `advance` returns `Poll::Ready`. The session holds at most one
/// network buffer at a time and none once the fetch is over.
///
/// `S` is the socket type of the [`NetStack`] driving the session.
#[derive(Debug)]
pub struct Session<'c, S> {
    config: Config<'c>,
    phase: Phase,
    frames: Frames,
    authority: String<MAX_HOST_LEN>,
    host: String<MAX_HOST_LEN>,
    path: String<MAX_PATH_LEN>,
    port: u16,
    remote: Option<SocketAddrV4>,
    socket: Option<S>,
    buf: Option<NetBuffer>,
    head: ResponseHead,
    delivered: usize,
    body_crc: u32,
    error: Option<Error>,
}

impl<'c, S> Session<'c, S> {
    /// A fresh session for `task`.
    pub fn new(task: TaskId, config: Config<'c>) -> Self {
        Self {
            config,
            phase: Phase::Start,
            frames: Frames::new(task),
            authority: String::new(),
            host: String::new(),
            path: String::new(),
            port: config.port,
            remote: None,
            socket: None,
            buf: None,
            head: ResponseHead::default(),
            delivered: 0,
            body_crc: 0,
            error: None,
        }
    }

    /// Prepare a finished session for another fetch.
    ///
    /// Does nothing while a fetch is in flight and returns `false` then.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.phase, Phase::Start | Phase::Done) {
            return false;
        }
        let task = self.frames.resolve.task();
        *self = Self::new(task, self.config);
        true
    }

    /// `true` once `advance` has returned a terminal result.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Host name being fetched from.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Destination port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolved destination, once known.
    pub fn remote(&self) -> Option<SocketAddrV4> {
        self.remote
    }

    /// Response status, 0 until the head parsed.
    pub fn status(&self) -> u16 {
        self.head.status
    }

    /// Response `Content-Type`, once the head parsed.
    pub fn content_type(&self) -> Option<&str> {
        self.head.content_type.as_deref()
    }

    /// Response `Content-Length`; 0 until the head parsed, and 0 after for
    /// a response without a body.
    pub fn content_length(&self) -> usize {
        self.head.content_length
    }

    /// Body bytes delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// CRC-32 of the body bytes delivered so far.
    pub fn body_crc32(&self) -> u32 {
        self.body_crc
    }

    /// `true` while the session owns a network buffer.
    pub fn holds_buffer(&self) -> bool {
        self.buf.is_some()
    }

    /// Run one step of the fetch of `url`, delivering the body to `output`.
    ///
    /// Returns `Poll::Pending` when a collaborator suspended; call again
    /// with the next event for this task, passing the same `url` and
    /// `output`. `Poll::Ready(Ok(()))` means the whole body was delivered
    /// (or there was none); `Poll::Ready(Err(_))` is terminal. Either way the
    /// socket is freed and no buffer is held by then.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidUrl`] - the URL has no usable host, path or port
    /// * [`Error::ResourceExhausted`] - no socket or no buffer for the request
    /// * [`Error::RequestTooLarge`] - the request is longer than a network buffer
    /// * [`Error::Transport`] - resolve, connect, send, receive or close failed
    /// * [`Error::MissingStatusLine`], [`Error::BadStatus`] - unusable response head
    /// * [`Error::Truncated`], [`Error::StreamWrite`] - `output` rejected the body
    pub fn advance<N, D>(
        &mut self,
        net: &mut N,
        evt: Event,
        url: &str,
        output: &mut D,
    ) -> Poll<Result<(), Error>>
    where
        N: NetStack<Socket = S>,
        D: Delivery + ?Sized,
    {
        loop {
            match self.phase {
                Phase::Start => {
                    if let Err(e) = self.target(url) {
                        self.phase = Phase::Done;
                        self.error = Some(e);
                        return Poll::Ready(Err(e));
                    }
                    debug!("httpc: -> DNS {}", self.host.as_str());
                    self.frames.resolve.reset();
                    self.phase = Phase::Resolve;
                }

                Phase::Resolve => {
                    let resolved = net.poll_resolve(&mut self.frames.resolve, evt, &self.host);
                    match resolved {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Err(e)) => {
                            warn!("httpc: DNS failed");
                            self.teardown_with(e.into());
                        }
                        Poll::Ready(Ok(ip)) => {
                            debug!("httpc: <- DNS {}", ip.octets());
                            self.remote = Some(SocketAddrV4::new(ip, self.port));

                            let Some(mut socket) = net.socket() else {
                                warn!("httpc: no socket");
                                self.phase = Phase::Done;
                                self.error = Some(Error::ResourceExhausted);
                                return Poll::Ready(Err(Error::ResourceExhausted));
                            };
                            let timeout = self.config.socket_timeout_ms;
                            net.set_timeouts(
                                &mut socket,
                                SocketTimeouts {
                                    rx_ms: timeout,
                                    tx_ms: timeout,
                                },
                            );
                            self.socket = Some(socket);
                            self.frames.connect.reset();
                            self.phase = Phase::Connect;
                        }
                    }
                }

                Phase::Connect => {
                    let (Some(socket), Some(remote)) = (self.socket.as_mut(), self.remote) else {
                        self.teardown_with(Error::Transport(NetError::NotOpen));
                        continue;
                    };
                    match net.poll_connect(&mut self.frames.connect, evt, socket, remote) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Err(e)) => {
                            warn!("httpc: connect failed");
                            // Never connected: free the socket, no graceful close.
                            self.teardown_with(e.into());
                        }
                        Poll::Ready(Ok(())) => self.prepare_request(net),
                    }
                }

                Phase::Send => {
                    let Some(socket) = self.socket.as_mut() else {
                        self.teardown_with(Error::Transport(NetError::NotOpen));
                        continue;
                    };
                    match net.poll_send(&mut self.frames.send, evt, socket, &mut self.buf) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Err(e)) => {
                            warn!("httpc: send request failed");
                            self.close_with(Some(e.into()));
                        }
                        Poll::Ready(Ok(())) => {
                            // The stack owns the request now; reclaim it if
                            // it left it behind.
                            if let Some(buf) = self.buf.take() {
                                net.release(buf);
                            }
                            let timeouts = SocketTimeouts {
                                tx_ms: 0,
                                ..net.timeouts(socket)
                            };
                            net.set_timeouts(socket, timeouts);
                            debug!("httpc: -> GET {}", self.path.as_str());

                            self.head = ResponseHead::default();
                            self.delivered = 0;
                            self.body_crc = 0;
                            self.receive_next();
                        }
                    }
                }

                Phase::Receive => {
                    let Some(socket) = self.socket.as_mut() else {
                        self.teardown_with(Error::Transport(NetError::NotOpen));
                        continue;
                    };
                    match net.poll_recv(&mut self.frames.recv, evt, socket) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Err(e)) => {
                            warn!("httpc: receive failed");
                            self.close_with(Some(e.into()));
                        }
                        Poll::Ready(Ok(buf)) => self.on_segment(net, buf),
                    }
                }

                Phase::OnConnect => match output.poll_connect(&mut self.frames.on_connect, evt) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(Err(e)) => {
                        warn!("httpc: body consumer refused connect");
                        self.close_with(Some(e));
                    }
                    Poll::Ready(Ok(())) => {
                        debug!("httpc: body start, {} bytes", self.head.content_length);
                        self.deliver_or_receive(net);
                    }
                },

                Phase::OnRecv => {
                    let Some(buf) = self.buf.as_ref() else {
                        self.receive_next();
                        continue;
                    };
                    let remaining = self.head.content_length - self.delivered;
                    let chunk = &buf.as_slice()[..buf.len().min(remaining)];
                    match output.poll_recv(&mut self.frames.on_recv, evt, self.delivered, chunk) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Err(e)) => {
                            warn!("httpc: body consumer failed at {}", self.delivered);
                            self.close_with(Some(e));
                        }
                        Poll::Ready(Ok(())) => {
                            let mut crc = crc32fast::Hasher::new_with_initial(self.body_crc);
                            crc.update(chunk);
                            self.body_crc = crc.finalize();
                            self.delivered += chunk.len();

                            if self.delivered >= self.head.content_length {
                                trace!("httpc: body complete");
                                self.close_with(None);
                            } else {
                                if let Some(buf) = self.buf.take() {
                                    net.release(buf);
                                }
                                self.receive_next();
                            }
                        }
                    }
                }

                Phase::Close => {
                    let Some(socket) = self.socket.as_mut() else {
                        self.phase = Phase::Teardown;
                        continue;
                    };
                    match net.poll_close(&mut self.frames.close, evt, socket) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Err(e)) => {
                            warn!("httpc: close failed");
                            self.error.get_or_insert(e.into());
                            self.phase = Phase::Teardown;
                        }
                        Poll::Ready(Ok(())) => self.phase = Phase::Teardown,
                    }
                }

                Phase::Teardown => {
                    if let Some(buf) = self.buf.take() {
                        net.release(buf);
                    }
                    if let Some(socket) = self.socket.take() {
                        net.free(socket);
                    }
                    self.phase = Phase::Done;
                }

                Phase::Done => {
                    return Poll::Ready(match self.error {
                        Some(e) => Err(e),
                        None => Ok(()),
                    });
                }
            }
        }
    }

    /// Normalize `raw` into the session's host, path and port.
    fn target(&mut self, raw: &str) -> Result<(), Error> {
        let target = url::split(raw)?;
        self.authority = String::try_from(target.authority).map_err(|_| Error::InvalidUrl)?;
        self.host = String::try_from(target.host).map_err(|_| Error::InvalidUrl)?;
        self.path = String::try_from(target.path).map_err(|_| Error::InvalidUrl)?;
        self.port = target.port.unwrap_or(self.config.port);
        Ok(())
    }

    /// Acquire a buffer, write the GET into it and start sending.
    fn prepare_request<P: BufferPool>(&mut self, pool: &mut P) {
        let ua = self.config.user_agent;
        let len = request::required_len(&self.path, &self.authority, ua);
        if len > NET_BUFFER_SIZE {
            warn!("httpc: request of {} bytes does not fit a buffer", len);
            self.close_with(Some(Error::RequestTooLarge));
            return;
        }
        let Some(mut buf) = pool.acquire(len) else {
            warn!("httpc: no buffer for request");
            self.close_with(Some(Error::ResourceExhausted));
            return;
        };

        let built = request::build_get(&mut buf, &self.path, &self.authority, ua);
        self.buf = Some(buf);
        if let Err(e) = built {
            warn!("httpc: request does not fit");
            self.close_with(Some(e));
            return;
        }

        self.frames.send.reset();
        self.phase = Phase::Send;
    }

    /// Handle a freshly received segment.
    fn on_segment<P: BufferPool>(&mut self, pool: &mut P, mut buf: NetBuffer) {
        if self.head.content_length == 0 {
            trace!("httpc: <- head, {} bytes", buf.len());
            match response::parse_head(&mut buf) {
                Ok(Head::Incomplete) => {
                    // No carry-over: the next segment is parsed on its own.
                    pool.release(buf);
                    self.receive_next();
                    return;
                }
                Err(e) => {
                    warn!("httpc: bad response head");
                    self.buf = Some(buf);
                    self.close_with(Some(e));
                    return;
                }
                Ok(Head::Complete(head)) => {
                    self.head = head;
                    self.buf = Some(buf);
                    if self.head.content_length == 0 {
                        trace!("httpc: no body");
                        self.close_with(None);
                        return;
                    }
                    self.frames.on_connect.reset();
                    self.phase = Phase::OnConnect;
                    return;
                }
            }
        }

        self.buf = Some(buf);
        self.deliver_or_receive(pool);
    }

    /// Hand the held segment to the body consumer, or fetch the next one if
    /// it carries no payload.
    fn deliver_or_receive<P: BufferPool>(&mut self, pool: &mut P) {
        match self.buf.take() {
            Some(buf) if !buf.is_empty() => {
                self.buf = Some(buf);
                self.frames.on_recv.reset();
                self.phase = Phase::OnRecv;
            }
            Some(buf) => {
                pool.release(buf);
                self.receive_next();
            }
            None => self.receive_next(),
        }
    }

    fn receive_next(&mut self) {
        self.frames.recv.reset();
        self.phase = Phase::Receive;
    }

    /// Start the graceful close, keeping the first error.
    fn close_with(&mut self, err: Option<Error>) {
        if let Some(e) = err {
            self.error.get_or_insert(e);
        }
        self.frames.close.reset();
        self.phase = Phase::Close;
    }

    /// Skip straight to teardown, keeping the first error.
    fn teardown_with(&mut self, err: Error) {
        self.error.get_or_insert(err);
        self.phase = Phase::Teardown;
    }
}
