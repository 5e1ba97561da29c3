use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use httpbridge_dict::{decode_dict, encode_dict, encode_tuples, DictWriter, Dictionary};
use tracing::{debug, trace};

use crate::config::ChannelConfig;
use crate::error::{ChannelError, Result};
use crate::traits::{AppChannel, ChannelEvent};

enum Slot {
    Free,
    Open(DictWriter),
    InFlight,
}

/// In-memory message channel.
///
/// The application side uses the [`AppChannel`] methods. The companion side
/// reads what was sent with [`take_sent`](Self::take_sent) and answers with
/// [`deliver`](Self::deliver). Both directions pass through the wire codec,
/// so capacity limits and encoding behave as on a real link.
pub struct LoopbackChannel {
    config: ChannelConfig,
    slot: Slot,
    connected: bool,
    registered: bool,
    pending_send_failure: Option<ChannelError>,
    sent: VecDeque<Bytes>,
    events: VecDeque<ChannelEvent>,
}

impl LoopbackChannel {
    /// Create a connected channel with default buffer sizes.
    pub fn new() -> Self {
        Self::with_config(ChannelConfig::default())
    }

    /// Create a connected channel with explicit buffer sizes.
    pub fn with_config(config: ChannelConfig) -> Self {
        Self {
            config,
            slot: Slot::Free,
            connected: true,
            registered: false,
            pending_send_failure: None,
            sent: VecDeque::new(),
            events: VecDeque::new(),
        }
    }

    /// Current buffer configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Simulate link loss or recovery. Sends fail with `NotConnected` while
    /// disconnected.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether the outbound slot is currently held.
    pub fn is_slot_held(&self) -> bool {
        !matches!(self.slot, Slot::Free)
    }

    /// Make the next send succeed locally but report `reason` asynchronously.
    pub fn fail_next_send(&mut self, reason: ChannelError) {
        self.pending_send_failure = Some(reason);
    }

    /// Number of transmitted dictionaries not yet taken by the companion.
    pub fn sent_len(&self) -> usize {
        self.sent.len()
    }

    /// Companion side: take the oldest transmitted dictionary as wire bytes.
    pub fn take_sent_wire(&mut self) -> Option<Bytes> {
        self.sent.pop_front()
    }

    /// Companion side: take and decode the oldest transmitted dictionary.
    pub fn take_sent(&mut self) -> Option<httpbridge_dict::Result<Dictionary>> {
        self.take_sent_wire().map(|wire| decode_dict(&wire))
    }

    /// Companion side: deliver a dictionary to the registrant.
    ///
    /// Dictionaries larger than the inbound capacity are replaced by a
    /// `Dropped { BufferOverflow }` notice. Without a registrant the
    /// dictionary is discarded and `CallbackNotRegistered` is returned.
    pub fn deliver(&mut self, dict: &Dictionary) -> Result<()> {
        if !self.registered {
            debug!(tuples = dict.len(), "discarding inbound dictionary: no registrant");
            return Err(ChannelError::CallbackNotRegistered);
        }

        let mut wire = BytesMut::new();
        encode_dict(dict, &mut wire).map_err(|_| ChannelError::InvalidArgs)?;

        if wire.len() > self.config.inbound_capacity {
            debug!(
                size = wire.len(),
                max = self.config.inbound_capacity,
                "inbound dictionary dropped"
            );
            self.events.push_back(ChannelEvent::Dropped {
                reason: ChannelError::BufferOverflow,
            });
            return Ok(());
        }

        let received = decode_dict(&wire).map_err(|_| ChannelError::InvalidArgs)?;
        trace!(size = wire.len(), "inbound dictionary queued");
        self.events.push_back(ChannelEvent::Received(received));
        Ok(())
    }

    /// Companion side: report an inbound dictionary dropped for `reason`.
    pub fn drop_inbound(&mut self, reason: ChannelError) {
        if self.registered {
            self.events.push_back(ChannelEvent::Dropped { reason });
        }
    }
}

impl Default for LoopbackChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl AppChannel for LoopbackChannel {
    fn out_get(&mut self) -> Result<&mut DictWriter> {
        if !matches!(self.slot, Slot::Free) {
            return Err(ChannelError::Busy);
        }
        self.slot = Slot::Open(DictWriter::new(self.config.outbound_capacity));
        match &mut self.slot {
            Slot::Open(writer) => Ok(writer),
            _ => Err(ChannelError::Busy),
        }
    }

    fn out_writer(&mut self) -> Option<&mut DictWriter> {
        match &mut self.slot {
            Slot::Open(writer) => Some(writer),
            _ => None,
        }
    }

    fn out_send(&mut self) -> Result<()> {
        let writer = match &self.slot {
            Slot::Open(writer) => writer,
            Slot::InFlight => return Err(ChannelError::Busy),
            Slot::Free => return Err(ChannelError::InvalidArgs),
        };
        if !self.connected {
            return Err(ChannelError::NotConnected);
        }

        let mut wire = BytesMut::with_capacity(writer.size());
        encode_tuples(writer.tuples(), &mut wire).map_err(|_| ChannelError::InvalidArgs)?;
        if wire.len() > self.config.outbound_capacity {
            return Err(ChannelError::BufferOverflow);
        }
        self.slot = Slot::InFlight;

        match self.pending_send_failure.take() {
            Some(reason) => {
                debug!(%reason, "outbound dictionary lost");
                if self.registered {
                    self.events.push_back(ChannelEvent::SendFailed { reason });
                }
            }
            None => {
                trace!(size = wire.len(), "outbound dictionary sent");
                self.sent.push_back(wire.freeze());
            }
        }
        Ok(())
    }

    fn out_release(&mut self) -> Result<()> {
        if matches!(self.slot, Slot::Free) {
            return Err(ChannelError::AlreadyReleased);
        }
        self.slot = Slot::Free;
        Ok(())
    }

    fn register_callbacks(&mut self) -> Result<()> {
        if self.registered {
            return Err(ChannelError::CallbackAlreadyRegistered);
        }
        self.registered = true;
        Ok(())
    }

    fn deregister_callbacks(&mut self) -> Result<()> {
        if !self.registered {
            return Err(ChannelError::CallbackNotRegistered);
        }
        self.registered = false;
        self.events.clear();
        Ok(())
    }

    fn is_registered(&self) -> bool {
        self.registered
    }

    fn poll_event(&mut self) -> Option<ChannelEvent> {
        self.events.pop_front()
    }
}
