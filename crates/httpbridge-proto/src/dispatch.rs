//! Routing of classified responses and channel notifications to callbacks.

use httpbridge_channel::ChannelEvent;
use httpbridge_dict::Dictionary;
use tracing::{debug, trace};

use crate::error::TRANSPORT_STATUS_OFFSET;
use crate::keys;
use crate::registry::CallbackRegistry;
use crate::response::{classify, DropReason, Response, ResponseKind};

/// Classify one inbound dictionary and invoke the matching handler.
///
/// Returns the kind that was dispatched, or why the dictionary was dropped.
/// A missing handler is not an error: the kind is still reported.
pub fn dispatch_received<C>(
    registry: &mut CallbackRegistry<C>,
    app_id: u32,
    dict: &Dictionary,
) -> Result<ResponseKind, DropReason> {
    let response = match classify(dict, app_id) {
        Ok(response) => response,
        Err(reason) => {
            debug!(%reason, "inbound dictionary dropped");
            return Err(reason);
        }
    };
    let kind = response.kind();
    debug!(kind = kind.as_str(), "inbound response");

    match response {
        Response::Reconnect => {
            registry.reconnect();
        }
        Response::Time(info) => {
            registry.time(&info);
        }
        Response::Location(location) => {
            registry.location(&location);
        }
        Response::HttpFailure { request_id, status } => {
            registry.failure(request_id, status);
        }
        Response::HttpSuccess {
            request_id,
            status,
            dict,
        } => {
            registry.success(request_id, status, dict);
        }
        Response::CookieSet {
            request_id,
            success,
        } => {
            registry.cookie_set(request_id, success);
        }
        Response::CookieLoad { request_id, dict } => {
            registry.cookie_batch_get(request_id, dict);
            for tuple in dict.iter().filter(|t| !keys::is_reserved(t.key)) {
                trace!(request_id, key = tuple.key, "cookie value");
                if !registry.cookie_get(request_id, tuple) {
                    break;
                }
            }
        }
        Response::CookieFsync { success } => {
            registry.cookie_fsync(success);
        }
        Response::CookieDelete {
            request_id,
            success,
        } => {
            registry.cookie_delete(request_id, success);
        }
    }
    Ok(kind)
}

/// Route one channel notification.
///
/// Send failures and dropped inbound dictionaries report
/// `failure(0, 1000 + reason)`.
pub fn dispatch_event<C>(
    registry: &mut CallbackRegistry<C>,
    app_id: u32,
    event: ChannelEvent,
) -> Result<ResponseKind, DropReason> {
    match event {
        ChannelEvent::Received(dict) => dispatch_received(registry, app_id, &dict),
        ChannelEvent::SendFailed { reason } | ChannelEvent::Dropped { reason } => {
            let status = TRANSPORT_STATUS_OFFSET + reason.code();
            debug!(code = reason.code(), status, "channel failure");
            registry.failure(0, status);
            Ok(ResponseKind::HttpFailure)
        }
    }
}
