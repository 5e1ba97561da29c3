//! Request encoding and response dispatch for the httpbridge protocol.
//!
//! An application talks to its companion process through a single typed
//! dictionary channel. Requests (HTTP GET, cookie storage, time, location)
//! are written under reserved keys; responses are told apart by which
//! reserved keys are present and routed to registered callbacks.
//!
//! [`Bridge`] owns the channel, the application id and the callback
//! registry. Everything else is reachable as free functions for callers that
//! manage those pieces themselves.

pub mod bridge;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod keys;
pub mod registry;
pub mod response;

pub use bridge::Bridge;
pub use dispatch::{dispatch_event, dispatch_received};
pub use encoder::Outbound;
pub use error::{
    result_code, BridgeError, Result, DICT_CODE_SHIFT, INVALID_BRIDGE_RESPONSE_CODE,
    TRANSPORT_STATUS_OFFSET,
};
pub use registry::{CallbackRegistry, Callbacks};
pub use response::{
    bits_from_float, classify, float_from_bits, DropReason, Location, Response, ResponseKind,
    TimeInfo,
};
