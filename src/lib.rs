//! # embnet - cooperative networking for embedded devices
//!
//! A `no_std` HTTP client that runs as a protothread: a resumable step
//! function driven by events instead of threads or an async executor.
//! Everything it needs from the device (name resolution, TCP sockets, a
//! buffer pool, output streams) is described by traits, so the same client
//! runs on any stack that can implement them.
//!
//! ## Features
//!
//! ### Network
//! - **HTTP client**: `GET` a resource and stream its body out while it
//!   arrives, see [`network::application::http`]
//! - **Buffers**: owned, pooled, MSS-sized network buffers
//!
//! ### System
//! - **Protothreads**: resumption slots, task ids and events
//! - **Streams**: flow-controlled byte sinks with writable notifications
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! embnet = "0.1.0"
//! ```
//!
//! ### Fetching into a buffer
//!
//! ```rust,no_run
//! use core::task::Poll;
//! use embnet::network::NetStack;
//! use embnet::network::application::http::{BufferSink, Config, Session};
//! use embnet::system::pt::{EventQueue, TaskId, Event};
//!
//! fn run<N: NetStack>(net: &mut N, events: &mut EventQueue<8>) {
//!     let mut dest = [0u8; 512];
//!     let mut sink = BufferSink::new(&mut dest);
//!     let mut session = Session::new(TaskId(1), Config::default());
//!     let mut evt = Event::NONE;
//!     loop {
//!         if let Poll::Ready(res) = session.advance(net, evt, "example.com/status", &mut sink) {
//!             let _ = res;
//!             break;
//!         }
//!         // The stack posts the event that resumes the task.
//!         evt = events.pop().map_or(Event::NONE, |n| n.event);
//!     }
//! }
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Hosted targets, for tests and simulation
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

// This must go first so the logging macros are visible everywhere.
#[macro_use]
mod fmt;

/// Network abstraction layer and protocol engines.
///
/// Contains the traits a device stack implements and the HTTP client built
/// on top of them.
pub mod network;

/// System primitives for cooperative tasks.
pub mod system;
