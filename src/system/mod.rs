//! Cooperative execution primitives for embedded devices.
//!
//! Firmware built on this crate runs every long-lived operation as a
//! protothread: a stackless, resumable procedure driven by events from a
//! single-threaded reactor. This module holds the small vocabulary those
//! procedures share.
//!
//! # Available Utilities
//!
//! - **[`pt`]**: resumption slots, events, and a bounded event queue
//! - **[`stream`]**: the output stream a protothread writes into
//!
//! # Design Principles
//!
//! - **Stackless**: resumption state lives in explicit slots, never on a stack
//! - **Zero-Allocation**: fixed-size queues from `heapless`
//! - **Single-Threaded**: no locks; exclusive access is expressed with `&mut`

/// Protothread resumption slots and event delivery.
pub mod pt;

/// Output stream collaborator trait.
pub mod stream;
