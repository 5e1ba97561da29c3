//! Response handlers and the channel binding.

use httpbridge_channel::AppChannel;
use httpbridge_dict::{Dictionary, Tuple};
use tracing::{debug, warn};

use crate::response::{Location, TimeInfo};

pub type FailureHandler<C> = Box<dyn FnMut(i32, i32, &mut C)>;
pub type SuccessHandler<C> = Box<dyn FnMut(i32, i32, &Dictionary, &mut C)>;
pub type ReconnectHandler<C> = Box<dyn FnMut(&mut C)>;
pub type CookieGetHandler<C> = Box<dyn FnMut(i32, &Tuple, &mut C)>;
pub type CookieBatchGetHandler<C> = Box<dyn FnMut(i32, &Dictionary, &mut C)>;
pub type CookieSetHandler<C> = Box<dyn FnMut(i32, bool, &mut C)>;
pub type CookieFsyncHandler<C> = Box<dyn FnMut(bool, &mut C)>;
pub type CookieDeleteHandler<C> = Box<dyn FnMut(i32, bool, &mut C)>;
pub type TimeHandler<C> = Box<dyn FnMut(&TimeInfo<'_>, &mut C)>;
pub type LocationHandler<C> = Box<dyn FnMut(&Location, &mut C)>;

/// One optional handler per response kind.
///
/// Every handler receives the context passed to
/// [`CallbackRegistry::register`]. Absent handlers are skipped.
pub struct Callbacks<C> {
    pub failure: Option<FailureHandler<C>>,
    pub success: Option<SuccessHandler<C>>,
    pub reconnect: Option<ReconnectHandler<C>>,
    pub cookie_get: Option<CookieGetHandler<C>>,
    pub cookie_batch_get: Option<CookieBatchGetHandler<C>>,
    pub cookie_set: Option<CookieSetHandler<C>>,
    pub cookie_fsync: Option<CookieFsyncHandler<C>>,
    pub cookie_delete: Option<CookieDeleteHandler<C>>,
    pub time: Option<TimeHandler<C>>,
    pub location: Option<LocationHandler<C>>,
}

impl<C> Default for Callbacks<C> {
    fn default() -> Self {
        Self {
            failure: None,
            success: None,
            reconnect: None,
            cookie_get: None,
            cookie_batch_get: None,
            cookie_set: None,
            cookie_fsync: None,
            cookie_delete: None,
            time: None,
            location: None,
        }
    }
}

impl<C> std::fmt::Debug for Callbacks<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("failure", &self.failure.is_some())
            .field("success", &self.success.is_some())
            .field("reconnect", &self.reconnect.is_some())
            .field("cookie_get", &self.cookie_get.is_some())
            .field("cookie_batch_get", &self.cookie_batch_get.is_some())
            .field("cookie_set", &self.cookie_set.is_some())
            .field("cookie_fsync", &self.cookie_fsync.is_some())
            .field("cookie_delete", &self.cookie_delete.is_some())
            .field("time", &self.time.is_some())
            .field("location", &self.location.is_some())
            .finish()
    }
}

impl<C> Callbacks<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_failure(mut self, f: impl FnMut(i32, i32, &mut C) + 'static) -> Self {
        self.failure = Some(Box::new(f));
        self
    }

    pub fn on_success(mut self, f: impl FnMut(i32, i32, &Dictionary, &mut C) + 'static) -> Self {
        self.success = Some(Box::new(f));
        self
    }

    pub fn on_reconnect(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.reconnect = Some(Box::new(f));
        self
    }

    pub fn on_cookie_get(mut self, f: impl FnMut(i32, &Tuple, &mut C) + 'static) -> Self {
        self.cookie_get = Some(Box::new(f));
        self
    }

    pub fn on_cookie_batch_get(
        mut self,
        f: impl FnMut(i32, &Dictionary, &mut C) + 'static,
    ) -> Self {
        self.cookie_batch_get = Some(Box::new(f));
        self
    }

    pub fn on_cookie_set(mut self, f: impl FnMut(i32, bool, &mut C) + 'static) -> Self {
        self.cookie_set = Some(Box::new(f));
        self
    }

    pub fn on_cookie_fsync(mut self, f: impl FnMut(bool, &mut C) + 'static) -> Self {
        self.cookie_fsync = Some(Box::new(f));
        self
    }

    pub fn on_cookie_delete(mut self, f: impl FnMut(i32, bool, &mut C) + 'static) -> Self {
        self.cookie_delete = Some(Box::new(f));
        self
    }

    pub fn on_time(mut self, f: impl FnMut(&TimeInfo<'_>, &mut C) + 'static) -> Self {
        self.time = Some(Box::new(f));
        self
    }

    pub fn on_location(mut self, f: impl FnMut(&Location, &mut C) + 'static) -> Self {
        self.location = Some(Box::new(f));
        self
    }
}

/// Registered handlers, their shared context and the channel binding state.
pub struct CallbackRegistry<C> {
    callbacks: Callbacks<C>,
    context: Option<C>,
    bound: bool,
}

impl<C> Default for CallbackRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for CallbackRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.callbacks)
            .field("has_context", &self.context.is_some())
            .field("bound", &self.bound)
            .finish()
    }
}

impl<C> CallbackRegistry<C> {
    pub fn new() -> Self {
        Self {
            callbacks: Callbacks::default(),
            context: None,
            bound: false,
        }
    }

    /// Replace the handler set and context, then (re)bind to the channel.
    ///
    /// An existing binding is dropped first so the channel never sees a
    /// duplicate registration. Returns whether a binding is active afterwards.
    pub fn register<Ch: AppChannel>(
        &mut self,
        channel: &mut Ch,
        callbacks: Callbacks<C>,
        context: C,
    ) -> bool {
        self.callbacks = callbacks;
        self.context = Some(context);

        if self.bound {
            match channel.deregister_callbacks() {
                Ok(()) => {
                    self.bound = false;
                    debug!("callbacks unbound");
                }
                Err(err) => warn!(code = err.code(), error = %err, "failed to unbind callbacks"),
            }
        }
        if !self.bound {
            match channel.register_callbacks() {
                Ok(()) => {
                    self.bound = true;
                    debug!("callbacks bound");
                }
                Err(err) => warn!(code = err.code(), error = %err, "failed to bind callbacks"),
            }
        }
        self.bound
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn callbacks(&self) -> &Callbacks<C> {
        &self.callbacks
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.context.as_mut()
    }

    pub(crate) fn failure(&mut self, request_id: i32, status: i32) -> bool {
        invoke(&mut self.callbacks.failure, &mut self.context, |handler, context| {
            handler(request_id, status, context)
        })
    }

    pub(crate) fn success(&mut self, request_id: i32, status: i32, dict: &Dictionary) -> bool {
        invoke(&mut self.callbacks.success, &mut self.context, |handler, context| {
            handler(request_id, status, dict, context)
        })
    }

    pub(crate) fn reconnect(&mut self) -> bool {
        invoke(&mut self.callbacks.reconnect, &mut self.context, |handler, context| {
            handler(context)
        })
    }

    pub(crate) fn cookie_get(&mut self, request_id: i32, tuple: &Tuple) -> bool {
        invoke(&mut self.callbacks.cookie_get, &mut self.context, |handler, context| {
            handler(request_id, tuple, context)
        })
    }

    pub(crate) fn cookie_batch_get(&mut self, request_id: i32, dict: &Dictionary) -> bool {
        invoke(&mut self.callbacks.cookie_batch_get, &mut self.context, |handler, context| {
            handler(request_id, dict, context)
        })
    }

    pub(crate) fn cookie_set(&mut self, request_id: i32, success: bool) -> bool {
        invoke(&mut self.callbacks.cookie_set, &mut self.context, |handler, context| {
            handler(request_id, success, context)
        })
    }

    pub(crate) fn cookie_fsync(&mut self, success: bool) -> bool {
        invoke(&mut self.callbacks.cookie_fsync, &mut self.context, |handler, context| {
            handler(success, context)
        })
    }

    pub(crate) fn cookie_delete(&mut self, request_id: i32, success: bool) -> bool {
        invoke(&mut self.callbacks.cookie_delete, &mut self.context, |handler, context| {
            handler(request_id, success, context)
        })
    }

    pub(crate) fn time(&mut self, info: &TimeInfo<'_>) -> bool {
        invoke(&mut self.callbacks.time, &mut self.context, |handler, context| {
            handler(info, context)
        })
    }

    pub(crate) fn location(&mut self, location: &Location) -> bool {
        invoke(&mut self.callbacks.location, &mut self.context, |handler, context| {
            handler(location, context)
        })
    }
}

/// Run the handler in `slot` with the shared context, if both are present.
fn invoke<H: ?Sized, C>(
    slot: &mut Option<Box<H>>,
    context: &mut Option<C>,
    call: impl FnOnce(&mut H, &mut C),
) -> bool {
    match (slot.as_deref_mut(), context.as_mut()) {
        (Some(handler), Some(context)) => {
            call(handler, context);
            true
        }
        _ => false,
    }
}
