use httpbridge_dict::{DictWriter, Dictionary};

use crate::error::{ChannelError, Result};

/// A notification queued by the channel for its registrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// An inbound dictionary arrived.
    Received(Dictionary),
    /// A previously sent dictionary was not delivered.
    SendFailed { reason: ChannelError },
    /// An inbound dictionary was discarded before it could be read.
    Dropped { reason: ChannelError },
}

/// A single-slot dictionary message channel.
///
/// Only one outbound dictionary can be open at a time: `out_get` acquires it,
/// `out_send` hands it to the transport, and `out_release` frees the slot for
/// the next request. Inbound traffic is only observed by the single callback
/// registrant, which drains notifications with `poll_event`.
pub trait AppChannel {
    /// Acquire the outbound slot and return its empty dictionary writer.
    ///
    /// Fails with [`ChannelError::Busy`] while the slot is held.
    fn out_get(&mut self) -> Result<&mut DictWriter>;

    /// Writer of the currently held outbound slot, if any.
    fn out_writer(&mut self) -> Option<&mut DictWriter>;

    /// Transmit the held outbound dictionary. The slot stays held until
    /// `out_release`.
    fn out_send(&mut self) -> Result<()>;

    /// Release the outbound slot.
    ///
    /// Fails with [`ChannelError::AlreadyReleased`] if nothing is held.
    fn out_release(&mut self) -> Result<()>;

    /// Claim the callback slot.
    fn register_callbacks(&mut self) -> Result<()>;

    /// Give up the callback slot.
    fn deregister_callbacks(&mut self) -> Result<()>;

    /// Whether the callback slot is claimed.
    fn is_registered(&self) -> bool;

    /// Next queued notification for the registrant.
    fn poll_event(&mut self) -> Option<ChannelEvent>;
}
