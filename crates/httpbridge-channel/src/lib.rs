//! Dictionary message channel abstraction.
//!
//! Provides the interface the bridge protocol needs from its message channel:
//! - A single exclusive outbound dictionary slot (acquire, send, release)
//! - One callback registrant at a time
//! - Cooperative delivery of inbound dictionaries and failure notices
//!
//! This is the lowest layer of httpbridge. [`LoopbackChannel`] is an
//! in-memory implementation with a companion-side API for tests and tools.

pub mod config;
pub mod error;
pub mod loopback;
pub mod traits;

pub use config::{ChannelConfig, DEFAULT_INBOUND_CAPACITY, DEFAULT_OUTBOUND_CAPACITY};
pub use error::{ChannelError, Result};
pub use loopback::LoopbackChannel;
pub use traits::{AppChannel, ChannelEvent};
