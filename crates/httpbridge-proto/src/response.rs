//! Classification of inbound dictionaries.
//!
//! A response is identified by which reserved keys it carries. Probes run in
//! a fixed order and the first match wins, so ambiguous dictionaries always
//! classify the same way.

use httpbridge_dict::{Dictionary, Tuple};

use crate::error::{BridgeError, TRANSPORT_STATUS_OFFSET};
use crate::keys;

/// Reinterpret a 32-bit pattern as an IEEE-754 single.
pub fn float_from_bits(bits: u32) -> f32 {
    f32::from_bits(bits)
}

/// Bit pattern of an IEEE-754 single.
pub fn bits_from_float(value: f32) -> u32 {
    value.to_bits()
}

/// Time zone information reported by the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInfo<'a> {
    /// Companion clock, seconds since the unix epoch.
    pub unix_time: u32,
    /// Offset from UTC in seconds.
    pub utc_offset: i32,
    pub is_dst: bool,
    pub tz_name: &'a str,
}

/// Position reported by the companion. Missing coordinates are 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub accuracy: f32,
    pub latitude: f32,
    pub longitude: f32,
    pub altitude: f32,
}

/// A classified inbound dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum Response<'a> {
    Reconnect,
    Time(TimeInfo<'a>),
    Location(Location),
    HttpFailure {
        request_id: i32,
        status: i32,
    },
    HttpSuccess {
        request_id: i32,
        status: i32,
        dict: &'a Dictionary,
    },
    CookieSet {
        request_id: i32,
        success: bool,
    },
    CookieLoad {
        request_id: i32,
        dict: &'a Dictionary,
    },
    CookieFsync {
        success: bool,
    },
    CookieDelete {
        request_id: i32,
        success: bool,
    },
}

/// Discriminant of a [`Response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Reconnect,
    Time,
    Location,
    HttpFailure,
    HttpSuccess,
    CookieSet,
    CookieLoad,
    CookieFsync,
    CookieDelete,
}

impl ResponseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseKind::Reconnect => "reconnect",
            ResponseKind::Time => "time",
            ResponseKind::Location => "location",
            ResponseKind::HttpFailure => "http_failure",
            ResponseKind::HttpSuccess => "http_success",
            ResponseKind::CookieSet => "cookie_set",
            ResponseKind::CookieLoad => "cookie_load",
            ResponseKind::CookieFsync => "cookie_fsync",
            ResponseKind::CookieDelete => "cookie_delete",
        }
    }
}

impl std::fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Response<'_> {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::Reconnect => ResponseKind::Reconnect,
            Response::Time(_) => ResponseKind::Time,
            Response::Location(_) => ResponseKind::Location,
            Response::HttpFailure { .. } => ResponseKind::HttpFailure,
            Response::HttpSuccess { .. } => ResponseKind::HttpSuccess,
            Response::CookieSet { .. } => ResponseKind::CookieSet,
            Response::CookieLoad { .. } => ResponseKind::CookieLoad,
            Response::CookieFsync { .. } => ResponseKind::CookieFsync,
            Response::CookieDelete { .. } => ResponseKind::CookieDelete,
        }
    }
}

/// Why an inbound dictionary produced no callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// A time response lacked one of its fields.
    IncompleteTime,
    /// The dictionary carried no application id.
    MissingAppId,
    /// The dictionary was addressed to another application.
    AppIdMismatch { expected: u32, actual: u32 },
    /// No known response marker was present.
    Unrecognized,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::IncompleteTime => "incomplete_time",
            DropReason::MissingAppId => "missing_app_id",
            DropReason::AppIdMismatch { .. } => "app_id_mismatch",
            DropReason::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::AppIdMismatch { expected, actual } => {
                write!(f, "app id mismatch (expected {expected:#x}, got {actual:#x})")
            }
            other => f.write_str(other.as_str()),
        }
    }
}

/// Classify an inbound dictionary addressed to `app_id`.
pub fn classify(dict: &Dictionary, app_id: u32) -> Result<Response<'_>, DropReason> {
    if dict.find(keys::CONNECT).is_some_and(flag_set) {
        return Ok(Response::Reconnect);
    }

    if let Some(time) = dict.find(keys::TIME) {
        return classify_time(dict, time).map(Response::Time);
    }

    if let Some(accuracy) = dict.find(keys::LOCATION) {
        return Ok(Response::Location(classify_location(dict, accuracy)));
    }

    let actual = dict
        .find(keys::APP_ID)
        .and_then(|t| t.value.as_u32())
        .ok_or(DropReason::MissingAppId)?;
    if actual != app_id {
        return Err(DropReason::AppIdMismatch {
            expected: app_id,
            actual,
        });
    }

    if let Some(marker) = dict.find(keys::URL) {
        return Ok(classify_http(dict, marker));
    }

    if let Some(marker) = dict.find(keys::COOKIE_STORE) {
        return Ok(Response::CookieSet {
            request_id: request_id_of(marker),
            success: true,
        });
    }

    if let Some(marker) = dict.find(keys::COOKIE_LOAD) {
        return Ok(Response::CookieLoad {
            request_id: request_id_of(marker),
            dict,
        });
    }

    if let Some(marker) = dict.find(keys::COOKIE_FSYNC) {
        return Ok(Response::CookieFsync {
            success: success_flag(dict, marker),
        });
    }

    if let Some(marker) = dict.find(keys::COOKIE_DELETE) {
        return Ok(Response::CookieDelete {
            request_id: request_id_of(marker),
            success: true,
        });
    }

    Err(DropReason::Unrecognized)
}

fn classify_time<'a>(dict: &'a Dictionary, time: &Tuple) -> Result<TimeInfo<'a>, DropReason> {
    let utc_offset = dict
        .find(keys::UTC_OFFSET)
        .and_then(|t| t.value.as_i32());
    let is_dst = dict.find(keys::IS_DST).and_then(|t| t.value.as_u8());
    let tz_name = dict.find(keys::TZ_NAME).and_then(|t| t.value.as_str());

    match (time.value.as_u32(), utc_offset, is_dst, tz_name) {
        (Some(unix_time), Some(utc_offset), Some(is_dst), Some(tz_name)) => Ok(TimeInfo {
            unix_time,
            utc_offset,
            is_dst: is_dst != 0,
            tz_name,
        }),
        _ => Err(DropReason::IncompleteTime),
    }
}

fn classify_location(dict: &Dictionary, accuracy: &Tuple) -> Location {
    let mut location = Location {
        accuracy: float_value(accuracy),
        ..Location::default()
    };
    for tuple in dict {
        match tuple.key {
            keys::LATITUDE => location.latitude = float_value(tuple),
            keys::LONGITUDE => location.longitude = float_value(tuple),
            keys::ALTITUDE => location.altitude = float_value(tuple),
            _ => {}
        }
    }
    location
}

fn classify_http<'a>(dict: &'a Dictionary, marker: &Tuple) -> Response<'a> {
    let status = dict.find(keys::STATUS).and_then(|t| t.value.as_u16());
    let request_id = dict.find(keys::REQUEST_ID).and_then(|t| t.value.as_i32());

    let (Some(status), Some(request_id)) = (status, request_id) else {
        return Response::HttpFailure {
            request_id: 0,
            status: TRANSPORT_STATUS_OFFSET + BridgeError::InvalidBridgeResponse.code(),
        };
    };
    let status = i32::from(status);

    if success_flag(dict, marker) {
        Response::HttpSuccess {
            request_id,
            status,
            dict,
        }
    } else {
        Response::HttpFailure { request_id, status }
    }
}

/// A flag is set when the low byte of its value is non-zero.
fn flag_set(tuple: &Tuple) -> bool {
    tuple.value.as_u8().is_some_and(|v| v != 0)
}

/// `SUCCESS` when present, otherwise the marker's own value.
fn success_flag(dict: &Dictionary, marker: &Tuple) -> bool {
    flag_set(dict.find(keys::SUCCESS).unwrap_or(marker))
}

fn request_id_of(marker: &Tuple) -> i32 {
    marker.value.as_i32().unwrap_or(0)
}

fn float_value(tuple: &Tuple) -> f32 {
    tuple.value.as_u32().map(float_from_bits).unwrap_or(0.0)
}
