//! Request/response bridge between an application and its companion process.
//!
//! An application asks its companion to perform HTTP GETs, keep a small
//! key/value cookie store, report the time zone or report the current
//! location. Every request and response is a typed key/value dictionary sent
//! over one message channel.
//!
//! # Crate Structure
//!
//! - [`dict`]: typed dictionary container and its wire codec
//! - [`channel`]: single-slot message channel abstraction and an in-memory loopback
//! - [`proto`]: reserved keys, request encoding, response dispatch and the [`Bridge`] facade

/// Re-export dictionary types.
pub mod dict {
    pub use httpbridge_dict::*;
}

/// Re-export channel types.
pub mod channel {
    pub use httpbridge_channel::*;
}

/// Re-export protocol types.
pub mod proto {
    pub use httpbridge_proto::*;
}

pub use httpbridge_proto::{Bridge, BridgeError, Callbacks, Result};
