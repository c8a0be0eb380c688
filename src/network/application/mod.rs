//! # Application Layer Network Protocols
//!
//! Protocol engines built on the suspendable collaborator traits of
//! [`network`](crate::network). Each engine is a protothread: it is advanced
//! one step per event, keeps its resumption state in a caller-owned session
//! and never allocates.
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1 GET client delivering the body to a stream or a
//!   fixed buffer
//!
//! ## Design Principles
//!
//! - **Stack Agnostic**: work with any type implementing [`NetStack`](crate::network::NetStack)
//! - **No-std Compatible**: no heap, fixed-size buffers from a shared pool
//! - **Explicit Ownership**: every pooled buffer has exactly one owner at a time
//! - **Error Handling**: terminal errors, no hidden retries

/// HTTP client protocol engine.
///
/// Fetches a resource with a single GET and delivers its body incrementally
/// to a pluggable consumer.
pub mod http;
