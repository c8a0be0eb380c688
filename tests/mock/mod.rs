//! Scripted network stack for driving the HTTP client in tests.
//!
//! Every suspendable call can be made to suspend a number of times before
//! it completes, either a fixed count or a count drawn from a seeded RNG.
//! A suspended call only resumes on the event it waits for. Completed calls
//! leave their slot in a finished state, so a call site that is entered
//! again without a reset panics.

#![allow(dead_code)]

use core::net::{Ipv4Addr, SocketAddrV4};
use core::task::Poll;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embnet::network::application::http::{Delivery, Error, Session};
use embnet::network::buffer::{BufferPool, FixedPool, NetBuffer};
use embnet::network::error::Error as NetError;
use embnet::network::{Resolve, SocketTimeouts, Tcp};
use embnet::system::pt::{Event, Notify, Pt};
use embnet::system::stream::{OutStream, StreamError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Slot state of a call that already completed.
const FINISHED: u16 = u16::MAX;

/// Event that never resumes anything.
pub const SPURIOUS: Event = Event::user(0x40);

/// Address every non-literal host resolves to.
pub const RESOLVED: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Resolve(String),
    Socket,
    Connect(SocketAddrV4),
    Send(Vec<u8>),
    Recv,
    Close,
    Free,
}

#[derive(Debug)]
pub struct MockSocket {
    pub id: u32,
    pub timeouts: SocketTimeouts,
}

/// Injected failures, each reported after the call's suspensions.
#[derive(Debug, Default, Clone)]
pub struct Faults {
    pub resolve: Option<NetError>,
    pub no_socket: bool,
    pub connect: Option<NetError>,
    pub no_request_buffer: bool,
    pub send: Option<NetError>,
    /// Fail the n-th receive, counting from 0.
    pub recv: Option<(usize, NetError)>,
    pub close: Option<NetError>,
}

pub struct MockNet {
    pub pool: FixedPool<4>,
    pub trace: Vec<Call>,
    pub faults: Faults,
    pub freed: Vec<MockSocket>,
    /// Number of suspensions per call when no RNG is set.
    pub suspensions: u16,
    segments: VecDeque<Vec<u8>>,
    waiting: Option<Event>,
    next_socket: u32,
    recvs: usize,
    rng: Option<StdRng>,
}

impl MockNet {
    pub fn new(segments: &[&[u8]]) -> Self {
        Self {
            pool: FixedPool::new(),
            trace: Vec::new(),
            faults: Faults::default(),
            freed: Vec::new(),
            suspensions: 0,
            segments: segments.iter().map(|s| s.to_vec()).collect(),
            waiting: None,
            next_socket: 1,
            recvs: 0,
            rng: None,
        }
    }

    /// Random suspensions and spurious events from `seed`.
    pub fn with_seed(segments: &[&[u8]], seed: u64) -> Self {
        let mut net = Self::new(segments);
        net.rng = Some(StdRng::seed_from_u64(seed));
        net
    }

    /// The event to feed the client next.
    pub fn next_event(&mut self) -> Event {
        if let Some(rng) = self.rng.as_mut() {
            if rng.gen_bool(0.2) {
                return SPURIOUS;
            }
        }
        self.waiting.take().unwrap_or(Event::NONE)
    }

    pub fn calls(&self, call: &Call) -> usize {
        self.trace.iter().filter(|c| *c == call).count()
    }

    pub fn closed(&self) -> bool {
        self.trace.contains(&Call::Close)
    }

    /// Every buffer went back to the pool and every socket was freed.
    pub fn assert_balanced(&self) {
        assert_eq!(self.pool.outstanding(), 0, "buffers leaked");
        assert_eq!(self.pool.acquired(), self.pool.released());
        assert_eq!(
            self.calls(&Call::Socket),
            self.freed.len(),
            "sockets leaked"
        );
    }

    pub fn requests(&self) -> Vec<&[u8]> {
        self.trace
            .iter()
            .filter_map(|c| match c {
                Call::Send(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
            .collect()
    }

    fn suspensions(&mut self) -> u16 {
        match self.rng.as_mut() {
            Some(rng) => rng.gen_range(0..3),
            None => self.suspensions,
        }
    }

    /// `true` when the call may complete now.
    fn step(&mut self, pt: &mut Pt, evt: Event, wake: Event) -> bool {
        match pt.state() {
            FINISHED => panic!("completed call entered again without a reset"),
            0 => {
                let n = self.suspensions();
                if n == 0 {
                    pt.set_state(FINISHED);
                    return true;
                }
                pt.set_state(n);
                self.waiting = Some(wake);
                false
            }
            n => {
                if evt != wake {
                    return false;
                }
                if n == 1 {
                    pt.set_state(FINISHED);
                    true
                } else {
                    pt.set_state(n - 1);
                    self.waiting = Some(wake);
                    false
                }
            }
        }
    }
}

impl BufferPool for MockNet {
    fn acquire(&mut self, min_size: usize) -> Option<NetBuffer> {
        if self.faults.no_request_buffer {
            return None;
        }
        self.pool.acquire(min_size)
    }

    fn release(&mut self, buf: NetBuffer) {
        self.pool.release(buf);
    }
}

impl Resolve for MockNet {
    fn poll_resolve(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        host: &str,
    ) -> Poll<Result<Ipv4Addr, NetError>> {
        if pt.state() == 0 {
            self.trace.push(Call::Resolve(host.to_string()));
        }
        if !self.step(pt, evt, Event::DNS) {
            return Poll::Pending;
        }
        if let Some(e) = self.faults.resolve {
            return Poll::Ready(Err(e));
        }
        Poll::Ready(Ok(host.parse().unwrap_or(RESOLVED)))
    }
}

impl Tcp for MockNet {
    type Socket = MockSocket;

    fn socket(&mut self) -> Option<MockSocket> {
        if self.faults.no_socket {
            return None;
        }
        self.trace.push(Call::Socket);
        let id = self.next_socket;
        self.next_socket += 1;
        Some(MockSocket {
            id,
            timeouts: SocketTimeouts::default(),
        })
    }

    fn set_timeouts(&mut self, socket: &mut MockSocket, timeouts: SocketTimeouts) {
        socket.timeouts = timeouts;
    }

    fn timeouts(&self, socket: &MockSocket) -> SocketTimeouts {
        socket.timeouts
    }

    fn poll_connect(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        _socket: &mut MockSocket,
        remote: SocketAddrV4,
    ) -> Poll<Result<(), NetError>> {
        if pt.state() == 0 {
            self.trace.push(Call::Connect(remote));
        }
        if !self.step(pt, evt, Event::TX) {
            return Poll::Pending;
        }
        match self.faults.connect {
            Some(e) => Poll::Ready(Err(e)),
            None => Poll::Ready(Ok(())),
        }
    }

    fn poll_send(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        _socket: &mut MockSocket,
        buf: &mut Option<NetBuffer>,
    ) -> Poll<Result<(), NetError>> {
        if !self.step(pt, evt, Event::TX) {
            return Poll::Pending;
        }
        if let Some(e) = self.faults.send {
            // A refused send leaves the buffer with the caller.
            return Poll::Ready(Err(e));
        }
        let Some(request) = buf.take() else {
            return Poll::Ready(Err(NetError::WriteError));
        };
        self.trace.push(Call::Send(request.as_slice().to_vec()));
        self.pool.release(request);
        Poll::Ready(Ok(()))
    }

    fn poll_recv(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        _socket: &mut MockSocket,
    ) -> Poll<Result<NetBuffer, NetError>> {
        if !self.step(pt, evt, Event::RX) {
            return Poll::Pending;
        }
        self.trace.push(Call::Recv);
        let n = self.recvs;
        self.recvs += 1;
        if let Some((at, e)) = self.faults.recv {
            if at == n {
                return Poll::Ready(Err(e));
            }
        }

        let Some(segment) = self.segments.pop_front() else {
            return Poll::Ready(Err(NetError::ConnectionClosed));
        };
        let Some(mut buf) = self.pool.acquire(segment.len()) else {
            return Poll::Ready(Err(NetError::NotEnoughResources));
        };
        buf.extend_from_slice(&segment)
            .expect("segment larger than a network buffer");
        Poll::Ready(Ok(buf))
    }

    fn poll_close(
        &mut self,
        pt: &mut Pt,
        evt: Event,
        _socket: &mut MockSocket,
    ) -> Poll<Result<(), NetError>> {
        if pt.state() == 0 {
            self.trace.push(Call::Close);
        }
        if !self.step(pt, evt, Event::RX) {
            return Poll::Pending;
        }
        match self.faults.close {
            Some(e) => Poll::Ready(Err(e)),
            None => Poll::Ready(Ok(())),
        }
    }

    fn free(&mut self, socket: MockSocket) {
        self.trace.push(Call::Free);
        self.freed.push(socket);
    }
}

/// Run a fetch to completion, feeding the events the stack asks for.
pub fn drive<D: Delivery>(
    session: &mut Session<'_, MockSocket>,
    net: &mut MockNet,
    url: &str,
    output: &mut D,
) -> Result<(), Error> {
    let mut evt = Event::NONE;
    for _ in 0..10_000 {
        match session.advance(net, evt, url, output) {
            Poll::Ready(res) => return res,
            Poll::Pending => evt = net.next_event(),
        }
    }
    panic!("fetch never finished");
}

/// Body consumer that records what the client asked of it.
///
/// With `suspend` set, each hook suspends once per entry and resumes on the
/// next event, keeping the same finished-slot check as [`MockNet`].
#[derive(Debug, Default)]
pub struct Recorder {
    pub connects: usize,
    pub chunks: Vec<(usize, Vec<u8>)>,
    pub fail_at: Option<usize>,
    pub fail_connect: bool,
    pub suspend: bool,
    pub suspended: usize,
}

impl Recorder {
    pub fn suspending() -> Self {
        Self {
            suspend: true,
            ..Self::default()
        }
    }

    pub fn body(&self) -> Vec<u8> {
        self.chunks.iter().flat_map(|(_, c)| c.iter().copied()).collect()
    }

    /// `true` when the hook may complete now.
    fn step(&mut self, pt: &mut Pt) -> bool {
        match pt.state() {
            FINISHED => panic!("completed delivery hook entered again without a reset"),
            0 if self.suspend => {
                self.suspended += 1;
                pt.set_state(1);
                false
            }
            _ => {
                pt.set_state(FINISHED);
                true
            }
        }
    }
}

impl Delivery for Recorder {
    fn poll_connect(&mut self, pt: &mut Pt, _evt: Event) -> Poll<Result<(), Error>> {
        if !self.step(pt) {
            return Poll::Pending;
        }
        self.connects += 1;
        if self.fail_connect {
            return Poll::Ready(Err(Error::StreamWrite));
        }
        Poll::Ready(Ok(()))
    }

    fn poll_recv(
        &mut self,
        pt: &mut Pt,
        _evt: Event,
        offset: usize,
        chunk: &[u8],
    ) -> Poll<Result<(), Error>> {
        if !self.step(pt) {
            return Poll::Pending;
        }
        if self.fail_at == Some(self.chunks.len()) {
            return Poll::Ready(Err(Error::StreamWrite));
        }
        self.chunks.push((offset, chunk.to_vec()));
        Poll::Ready(Ok(()))
    }
}

#[derive(Debug, Default)]
pub struct StreamState {
    pub data: Vec<u8>,
    pub capacity: usize,
    pub written: Vec<u8>,
    pub notify: Option<Notify>,
    pub disconnected: bool,
}

/// Shared-handle output stream; the test drains it while the sink owns a
/// clone.
#[derive(Debug, Clone, Default)]
pub struct MockStream(pub Rc<RefCell<StreamState>>);

impl MockStream {
    pub fn new(capacity: usize) -> Self {
        Self(Rc::new(RefCell::new(StreamState {
            capacity,
            ..StreamState::default()
        })))
    }

    /// Consume everything buffered and return the writable notification.
    pub fn drain(&self) -> Option<Notify> {
        let mut s = self.0.borrow_mut();
        let data = core::mem::take(&mut s.data);
        s.written.extend_from_slice(&data);
        s.notify
    }

    pub fn output(&self) -> Vec<u8> {
        let s = self.0.borrow();
        let mut out = s.written.clone();
        out.extend_from_slice(&s.data);
        out
    }
}

impl OutStream for MockStream {
    fn free_size(&self) -> usize {
        let s = self.0.borrow();
        s.capacity - s.data.len()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, StreamError> {
        let mut s = self.0.borrow_mut();
        if s.disconnected {
            return Err(StreamError::Disconnected);
        }
        let n = bytes.len().min(s.capacity - s.data.len());
        s.data.extend_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn connect_tx(&mut self, on_writable: Notify) {
        self.0.borrow_mut().notify = Some(on_writable);
    }
}
