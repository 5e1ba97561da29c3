use httpbridge_channel::{AppChannel, ChannelEvent};
use httpbridge_dict::{Dictionary, Value};
use tracing::{debug, trace};

use crate::dispatch::{dispatch_event, dispatch_received};
use crate::encoder::{self, Outbound};
use crate::error::Result;
use crate::registry::{CallbackRegistry, Callbacks};
use crate::response::{DropReason, ResponseKind};

/// A channel, its application id and the handlers bound to it.
///
/// Requests are encoded straight onto the channel; responses are picked up
/// by [`process_events`](Self::process_events), which runs handlers on the
/// caller's thread.
pub struct Bridge<Ch: AppChannel, C> {
    channel: Ch,
    registry: CallbackRegistry<C>,
    app_id: u32,
}

impl<Ch: AppChannel, C> Bridge<Ch, C> {
    /// Create a bridge with application id `0`.
    pub fn new(channel: Ch) -> Self {
        Self::with_app_id(channel, 0)
    }

    pub fn with_app_id(channel: Ch, app_id: u32) -> Self {
        Self {
            channel,
            registry: CallbackRegistry::new(),
            app_id,
        }
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }

    /// Set the id written on requests and required on responses.
    pub fn set_app_id(&mut self, app_id: u32) {
        self.app_id = app_id;
    }

    /// Replace all handlers and the context; see [`CallbackRegistry::register`].
    pub fn register_callbacks(&mut self, callbacks: Callbacks<C>, context: C) -> bool {
        self.registry.register(&mut self.channel, callbacks, context)
    }

    pub fn is_bound(&self) -> bool {
        self.registry.is_bound()
    }

    pub fn channel(&self) -> &Ch {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut Ch {
        &mut self.channel
    }

    pub fn context(&self) -> Option<&C> {
        self.registry.context()
    }

    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.registry.context_mut()
    }

    pub fn into_channel(self) -> Ch {
        self.channel
    }

    /// Drain every queued channel notification. Returns how many were handled.
    ///
    /// Nothing is delivered until callbacks are bound.
    pub fn process_events(&mut self) -> usize {
        if !self.registry.is_bound() {
            return 0;
        }
        let mut handled = 0;
        let mut dropped = 0;
        while let Some(event) = self.channel.poll_event() {
            if let Err(reason) = dispatch_event(&mut self.registry, self.app_id, event) {
                trace!(%reason, "event fired no callback");
                dropped += 1;
            }
            handled += 1;
        }
        if handled > 0 {
            debug!(handled, dropped, "channel events processed");
        }
        handled
    }

    /// Route a single notification.
    pub fn handle_event(
        &mut self,
        event: ChannelEvent,
    ) -> std::result::Result<ResponseKind, DropReason> {
        dispatch_event(&mut self.registry, self.app_id, event)
    }

    /// Dispatch a dictionary as if it had just been received.
    pub fn dispatch(&mut self, dict: &Dictionary) -> std::result::Result<ResponseKind, DropReason> {
        dispatch_received(&mut self.registry, self.app_id, dict)
    }

    /// Start an HTTP GET; write extra fields on the result, then `send` it.
    pub fn http_get(&mut self, url: &str, request_id: i32) -> Result<Outbound<'_, Ch>> {
        encoder::http_get(&mut self.channel, self.app_id, url, request_id)
    }

    pub fn time_request(&mut self) -> Result<()> {
        encoder::time_request(&mut self.channel)
    }

    pub fn location_request(&mut self) -> Result<()> {
        encoder::location_request(&mut self.channel)
    }

    pub fn cookie_set_start(&mut self, request_id: i32) -> Result<Outbound<'_, Ch>> {
        encoder::cookie_set_start(&mut self.channel, self.app_id, request_id)
    }

    pub fn cookie_set(&mut self, request_id: i32, key: u32, value: impl Into<Value>) -> Result<()> {
        encoder::cookie_set(&mut self.channel, self.app_id, request_id, key, value)
    }

    pub fn cookie_get(&mut self, request_id: i32, key: u32) -> Result<()> {
        encoder::cookie_get(&mut self.channel, self.app_id, request_id, key)
    }

    pub fn cookie_get_multiple(&mut self, request_id: i32, keys: &[u32]) -> Result<()> {
        encoder::cookie_get_multiple(&mut self.channel, self.app_id, request_id, keys)
    }

    pub fn cookie_delete(&mut self, request_id: i32, key: u32) -> Result<()> {
        encoder::cookie_delete(&mut self.channel, self.app_id, request_id, key)
    }

    pub fn cookie_delete_multiple(&mut self, request_id: i32, keys: &[u32]) -> Result<()> {
        encoder::cookie_delete_multiple(&mut self.channel, self.app_id, request_id, keys)
    }

    pub fn cookie_fsync(&mut self) -> Result<()> {
        encoder::cookie_fsync(&mut self.channel, self.app_id)
    }
}

impl<Ch: AppChannel + std::fmt::Debug, C> std::fmt::Debug for Bridge<Ch, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("channel", &self.channel)
            .field("registry", &self.registry)
            .field("app_id", &self.app_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use httpbridge_channel::LoopbackChannel;

    use super::*;

    #[test]
    fn events_wait_for_binding() {
        let mut channel = LoopbackChannel::new();
        channel.register_callbacks().unwrap();
        channel.drop_inbound(httpbridge_channel::ChannelError::BufferOverflow);

        let mut bridge: Bridge<_, u32> = Bridge::with_app_id(channel, 1);
        assert_eq!(bridge.process_events(), 0);
    }

    #[test]
    fn set_app_id_changes_outbound_identity() {
        let mut bridge: Bridge<_, ()> = Bridge::new(LoopbackChannel::new());
        assert_eq!(bridge.app_id(), 0);
        bridge.set_app_id(0xBEEF);
        bridge.cookie_fsync().unwrap();

        let sent = bridge.channel_mut().take_sent().unwrap().unwrap();
        let app_id = sent.find(crate::keys::APP_ID).unwrap().value.as_u32();
        assert_eq!(app_id, Some(0xBEEF));
    }

    #[test]
    fn process_events_drains_queue() {
        let mut bridge = Bridge::with_app_id(LoopbackChannel::new(), 3);
        assert!(bridge.register_callbacks(
            Callbacks::new().on_failure(|_, status, seen: &mut Vec<i32>| seen.push(status)),
            Vec::new(),
        ));
        bridge.channel_mut().fail_next_send(httpbridge_channel::ChannelError::SendRejected);
        bridge.time_request().unwrap();

        assert_eq!(bridge.process_events(), 1);
        assert_eq!(bridge.process_events(), 0);
        assert_eq!(bridge.context(), Some(&vec![1004]));
    }

    #[test]
    fn dropped_dictionaries_still_count_as_handled() {
        use httpbridge_dict::Tuple;

        let mut bridge = Bridge::with_app_id(LoopbackChannel::new(), 3);
        assert!(bridge.register_callbacks(
            Callbacks::new()
                .on_failure(|_, status, seen: &mut Vec<i32>| seen.push(status))
                .on_cookie_set(|id, _, seen: &mut Vec<i32>| seen.push(id)),
            Vec::new(),
        ));
        let unaddressed = Dictionary::from(vec![Tuple::new(crate::keys::COOKIE_STORE, 9i32)]);
        let foreign = Dictionary::from(vec![Tuple::new(1, 1u8), Tuple::new(crate::keys::APP_ID, 3i32)]);
        bridge.channel_mut().deliver(&unaddressed).unwrap();
        bridge.channel_mut().deliver(&foreign).unwrap();

        assert_eq!(bridge.process_events(), 2);
        assert_eq!(bridge.context(), Some(&Vec::new()));
    }
}
