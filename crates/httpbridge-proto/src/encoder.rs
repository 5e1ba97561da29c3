//! Outbound request encoding.
//!
//! Every request acquires the channel's outbound slot, writes its fields
//! under reserved keys and sends. The slot is released on every path:
//! after a send (whatever its outcome), after a failed write, and when an
//! unsent [`Outbound`] is dropped.

use httpbridge_channel::{AppChannel, ChannelError};
use httpbridge_dict::Value;
use tracing::{debug, trace, warn};

use crate::error::{BridgeError, Result};
use crate::keys;

/// Placeholder written for keys whose presence is the whole payload.
const PRESENCE_FLAG: u8 = 1;

/// An open outbound dictionary.
///
/// Holds the channel's outbound slot until [`send`](Self::send) is called or
/// the value is dropped.
pub struct Outbound<'a, Ch: AppChannel> {
    channel: &'a mut Ch,
    open: bool,
}

impl<'a, Ch: AppChannel> Outbound<'a, Ch> {
    /// Acquire the outbound slot.
    pub fn acquire(channel: &'a mut Ch) -> Result<Self> {
        channel.out_get()?;
        Ok(Self {
            channel,
            open: true,
        })
    }

    /// Write one key/value pair.
    ///
    /// A failed write releases the slot; later writes and `send` then fail
    /// with `AlreadyReleased` and nothing is transmitted.
    pub fn write(&mut self, key: u32, value: impl Into<Value>) -> Result<()> {
        if !self.open {
            return Err(ChannelError::AlreadyReleased.into());
        }
        let writer = self
            .channel
            .out_writer()
            .ok_or(BridgeError::Channel(ChannelError::AlreadyReleased))?;

        if let Err(err) = writer.write(key, value) {
            warn!(key, error = %err, "dictionary write failed; releasing outbound slot");
            self.release();
            return Err(err.into());
        }
        Ok(())
    }

    /// Transmit the dictionary and release the slot.
    pub fn send(mut self) -> Result<()> {
        if !self.open {
            return Err(ChannelError::AlreadyReleased.into());
        }
        let result = self.channel.out_send();
        self.release();
        result.map_err(Into::into)
    }

    /// Whether the slot is still held by this request.
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn release(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(err) = self.channel.out_release() {
            trace!(error = %err, "outbound slot release ignored");
        }
    }
}

impl<Ch: AppChannel> Drop for Outbound<'_, Ch> {
    fn drop(&mut self) {
        self.release();
    }
}

fn app_id_value(app_id: u32) -> Value {
    Value::Int32(app_id as i32)
}

/// Start an HTTP GET request.
///
/// Writes the URL, request id and application id. Extra fields may be
/// written on the returned request before it is sent.
pub fn http_get<'a, Ch: AppChannel>(
    channel: &'a mut Ch,
    app_id: u32,
    url: &str,
    request_id: i32,
) -> Result<Outbound<'a, Ch>> {
    let mut out = Outbound::acquire(channel)?;
    out.write(keys::URL, url)?;
    out.write(keys::REQUEST_ID, request_id)?;
    out.write(keys::APP_ID, app_id_value(app_id))?;
    debug!(request_id, url, "http get encoded");
    Ok(out)
}

/// Ask the companion for the current time and time zone.
pub fn time_request<Ch: AppChannel>(channel: &mut Ch) -> Result<()> {
    send_flag(channel, keys::TIME)?;
    debug!("time request sent");
    Ok(())
}

/// Ask the companion for the current location.
pub fn location_request<Ch: AppChannel>(channel: &mut Ch) -> Result<()> {
    send_flag(channel, keys::LOCATION)?;
    debug!("location request sent");
    Ok(())
}

fn send_flag<Ch: AppChannel>(channel: &mut Ch, key: u32) -> Result<()> {
    let mut out = Outbound::acquire(channel)?;
    out.write(key, PRESENCE_FLAG)?;
    out.send()
}

/// Start a cookie store request.
///
/// Cookie key/value pairs are written on the returned request; sending it
/// ends the request.
pub fn cookie_set_start<'a, Ch: AppChannel>(
    channel: &'a mut Ch,
    app_id: u32,
    request_id: i32,
) -> Result<Outbound<'a, Ch>> {
    let mut out = Outbound::acquire(channel)?;
    out.write(keys::COOKIE_STORE, request_id)?;
    out.write(keys::APP_ID, app_id_value(app_id))?;
    Ok(out)
}

/// Finish a cookie store request started with [`cookie_set_start`].
pub fn cookie_set_end<Ch: AppChannel>(request: Outbound<'_, Ch>) -> Result<()> {
    request.send()
}

/// Store a single cookie.
pub fn cookie_set<Ch: AppChannel>(
    channel: &mut Ch,
    app_id: u32,
    request_id: i32,
    key: u32,
    value: impl Into<Value>,
) -> Result<()> {
    let mut out = cookie_set_start(channel, app_id, request_id)?;
    out.write(key, value)?;
    cookie_set_end(out)?;
    debug!(request_id, key, "cookie store sent");
    Ok(())
}

/// Request the values of several cookies in one dictionary.
pub fn cookie_get_multiple<Ch: AppChannel>(
    channel: &mut Ch,
    app_id: u32,
    request_id: i32,
    cookie_keys: &[u32],
) -> Result<()> {
    send_key_list(channel, keys::COOKIE_LOAD, app_id, request_id, cookie_keys)?;
    debug!(request_id, count = cookie_keys.len(), "cookie load sent");
    Ok(())
}

/// Request the value of one cookie.
pub fn cookie_get<Ch: AppChannel>(
    channel: &mut Ch,
    app_id: u32,
    request_id: i32,
    key: u32,
) -> Result<()> {
    cookie_get_multiple(channel, app_id, request_id, &[key])
}

/// Delete several cookies in one dictionary.
pub fn cookie_delete_multiple<Ch: AppChannel>(
    channel: &mut Ch,
    app_id: u32,
    request_id: i32,
    cookie_keys: &[u32],
) -> Result<()> {
    send_key_list(channel, keys::COOKIE_DELETE, app_id, request_id, cookie_keys)?;
    debug!(request_id, count = cookie_keys.len(), "cookie delete sent");
    Ok(())
}

/// Delete one cookie.
pub fn cookie_delete<Ch: AppChannel>(
    channel: &mut Ch,
    app_id: u32,
    request_id: i32,
    key: u32,
) -> Result<()> {
    cookie_delete_multiple(channel, app_id, request_id, &[key])
}

fn send_key_list<Ch: AppChannel>(
    channel: &mut Ch,
    marker: u32,
    app_id: u32,
    request_id: i32,
    cookie_keys: &[u32],
) -> Result<()> {
    let mut out = Outbound::acquire(channel)?;
    out.write(marker, request_id)?;
    out.write(keys::APP_ID, app_id_value(app_id))?;
    for &key in cookie_keys {
        out.write(key, PRESENCE_FLAG)?;
    }
    out.send()
}

/// Ask the companion to persist all pending cookie writes.
pub fn cookie_fsync<Ch: AppChannel>(channel: &mut Ch, app_id: u32) -> Result<()> {
    let mut out = Outbound::acquire(channel)?;
    out.write(keys::APP_ID, app_id_value(app_id))?;
    out.send()?;
    debug!("cookie fsync sent");
    Ok(())
}
