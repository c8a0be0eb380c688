//! HTTP/1.1 GET client for cooperative embedded systems.
//!
//! The client fetches one resource per [`Session`] over plain TCP and hands
//! the body to a [`Delivery`] while it arrives. It never blocks: every step
//! that waits on the network or on the consumer suspends and is resumed by
//! the next event posted to the owning task.
//!
//! # Features
//!
//! - `GET` only, `HTTP/1.1` responses with status 200
//! - Optional `http://` scheme and `:port` in the URL
//! - `Content-Length` framed bodies, clamped to the announced length
//! - Delivery into a flow-controlled stream ([`StreamSink`]) or a fixed
//!   slice ([`BufferSink`])
//! - One pooled network buffer held at a time
//!
//! # Usage
//!
//! ```rust,no_run
//! use core::task::Poll;
//! use embnet::network::NetStack;
//! use embnet::network::application::http::{BufferSink, Config, Session};
//! use embnet::system::pt::{Event, TaskId};
//!
//! fn step<N: NetStack>(
//!     net: &mut N,
//!     session: &mut Session<'_, N::Socket>,
//!     evt: Event,
//!     sink: &mut BufferSink<'_>,
//! ) -> bool {
//!     match session.advance(net, evt, "http://192.168.1.10:8000/config.json", sink) {
//!         Poll::Pending => false,
//!         Poll::Ready(Ok(())) => true,
//!         Poll::Ready(Err(_e)) => true,
//!     }
//! }
//!
//! let config = Config::from_json(br#"{"socket_timeout_ms": 2000}"#).unwrap();
//! assert_eq!(config.port, 80);
//! ```

/// The fetch protothread.
pub mod client;

/// Client configuration.
pub mod config;

/// Body delivery strategies.
pub mod delivery;

/// Client error types.
pub mod error;

/// Request serialization.
pub mod request;

/// Response head parsing.
pub mod response;

/// URL normalization.
pub mod url;

pub use client::{MAX_HOST_LEN, MAX_PATH_LEN, Session};
pub use config::Config;
pub use delivery::{BufferSink, Delivery, STREAM_WRITABLE, StreamSink};
pub use error::{Error, ErrorKind};
pub use response::{Head, MAX_CONTENT_TYPE_LEN, ResponseHead};
