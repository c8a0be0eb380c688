//! Protothread vocabulary for cooperative, stackless tasks.
//!
//! A protothread is a resumable procedure that keeps its resumption point in
//! an explicit [`Pt`] slot instead of on a call stack. Every suspendable call
//! in this crate follows the same tri-state contract, expressed with
//! [`core::task::Poll`]:
//!
//! - `Poll::Pending`: not finished, propagate upward unchanged and call again
//!   with the next relevant [`Event`]. No work is redone on re-entry.
//! - `Poll::Ready(Err(_))`: terminal failure.
//! - `Poll::Ready(Ok(_))`: done, continue synchronously.
//!
//! The reactor that delivers events and resumes tasks is not part of this
//! crate. [`EventQueue`] is a bounded mailbox a reactor can drain, and
//! [`Notify`] is the token collaborators use to post into it.
//!
//! # Examples
//!
//! ```rust
//! use core::task::Poll;
//! use embnet::system::pt::{Event, Pt, TaskId};
//!
//! const KICK: Event = Event::user(1);
//!
//! // Waits for one KICK event, then finishes.
//! fn wait_kick(pt: &mut Pt, evt: Event) -> Poll<()> {
//!     if pt.state() == 0 {
//!         pt.set_state(1);
//!         return Poll::Pending;
//!     }
//!     if evt != KICK {
//!         return Poll::Pending;
//!     }
//!     Poll::Ready(())
//! }
//!
//! let mut pt = Pt::new(TaskId(7));
//! assert!(wait_kick(&mut pt, Event::NONE).is_pending());
//! assert!(wait_kick(&mut pt, Event::TIMER).is_pending());
//! assert!(wait_kick(&mut pt, KICK).is_ready());
//! ```

use heapless::Deque;

/// An event delivered to a task by the reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event(pub u32);

impl Event {
    /// No event; used for the first invocation of a task.
    pub const NONE: Event = Event(0);
    /// A timer owned by the task expired.
    pub const TIMER: Event = Event(1);
    /// Data arrived on a socket.
    pub const RX: Event = Event(2);
    /// A socket finished sending or connecting.
    pub const TX: Event = Event(3);
    /// A name resolution completed.
    pub const DNS: Event = Event(4);
    /// First value free for application-local events.
    pub const USER_LOCAL: u32 = 0x100;

    /// Build an application-local event, `USER_LOCAL + offset`.
    pub const fn user(offset: u32) -> Event {
        Event(Self::USER_LOCAL + offset)
    }
}

/// Identifies the task a protothread belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TaskId(pub u16);

/// One resumption-state slot.
///
/// A slot belongs to exactly one call site. Callers must [`reset`](Pt::reset)
/// it immediately before each new logical entry into the callee; a stale
/// state resumes the callee at the wrong point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pt {
    state: u16,
    task: TaskId,
}

impl Pt {
    /// Create a slot at its initial state.
    pub const fn new(task: TaskId) -> Self {
        Self { state: 0, task }
    }

    /// Return the slot to its initial state.
    pub fn reset(&mut self) {
        self.state = 0;
    }

    /// Current resumption point, 0 when freshly entered.
    pub fn state(&self) -> u16 {
        self.state
    }

    /// Record the point to resume at.
    pub fn set_state(&mut self, state: u16) {
        self.state = state;
    }

    /// The task this slot belongs to.
    pub fn task(&self) -> TaskId {
        self.task
    }

    /// A token that posts `event` back to this slot's task.
    pub fn notify(&self, event: Event) -> Notify {
        Notify {
            task: self.task,
            event,
        }
    }
}

/// "Post `event` to `task`", handed to collaborators that wake tasks later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notify {
    /// Task to resume.
    pub task: TaskId,
    /// Event to deliver.
    pub event: Event,
}

/// Bounded FIFO of pending `(task, event)` deliveries.
///
/// Posting never blocks; when the queue is full the post is refused and the
/// caller decides whether to drop or retry.
#[derive(Debug)]
pub struct EventQueue<const N: usize> {
    pending: Deque<Notify, N>,
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Queue a delivery. Returns it back when the queue is full.
    pub fn post(&mut self, notify: Notify) -> Result<(), Notify> {
        self.pending.push_back(notify)
    }

    /// Queue a delivery unless an identical one is already waiting.
    pub fn post_pending(&mut self, notify: Notify) -> Result<(), Notify> {
        if self.pending.iter().any(|n| *n == notify) {
            return Ok(());
        }
        self.post(notify)
    }

    /// Take the oldest delivery.
    pub fn pop(&mut self) -> Option<Notify> {
        self.pending.pop_front()
    }

    /// Number of queued deliveries.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
