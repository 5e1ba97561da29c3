//! Reserved dictionary keys.
//!
//! Keys 0xFFE0-0xFFFF belong to the bridge protocol.
//! Application cookie keys must stay outside this range.

/// HTTP: request URL outbound; response marker inbound.
pub const URL: u32 = 0xFFFF;

/// HTTP: response status code (int16).
pub const STATUS: u32 = 0xFFFE;

/// HTTP: response success flag.
pub const SUCCESS: u32 = 0xFFFD;

/// HTTP: caller-chosen request id, echoed back by the companion.
pub const REQUEST_ID: u32 = 0xFFFC;

/// Companion reconnect notice.
pub const CONNECT: u32 = 0xFFFB;

/// Sender application id.
pub const APP_ID: u32 = 0xFFF2;

/// Cookie store request / confirmation.
pub const COOKIE_STORE: u32 = 0xFFF0;

/// Cookie load request / response.
pub const COOKIE_LOAD: u32 = 0xFFF1;

/// Cookie flush request / confirmation.
pub const COOKIE_FSYNC: u32 = 0xFFF3;

/// Cookie delete request / confirmation.
pub const COOKIE_DELETE: u32 = 0xFFF4;

/// Time request; the response value carries unix time.
pub const TIME: u32 = 0xFFF5;

/// Time response: UTC offset in seconds (int32).
pub const UTC_OFFSET: u32 = 0xFFF6;

/// Time response: daylight saving flag (uint8).
pub const IS_DST: u32 = 0xFFF7;

/// Time response: time zone name (cstring).
pub const TZ_NAME: u32 = 0xFFF8;

/// Location request; the response value carries accuracy as float bits.
pub const LOCATION: u32 = 0xFFE0;

/// Location response: latitude as float bits.
pub const LATITUDE: u32 = 0xFFE1;

/// Location response: longitude as float bits.
pub const LONGITUDE: u32 = 0xFFE2;

/// Location response: altitude as float bits.
pub const ALTITUDE: u32 = 0xFFE3;

/// First reserved key.
pub const RESERVED_START: u32 = 0xFFE0;

/// Last reserved key.
pub const RESERVED_END: u32 = 0xFFFF;

/// Every assigned protocol key, grouped by band.
pub const ALL: [u32; 18] = [
    URL,
    STATUS,
    SUCCESS,
    REQUEST_ID,
    CONNECT,
    APP_ID,
    COOKIE_STORE,
    COOKIE_LOAD,
    COOKIE_FSYNC,
    COOKIE_DELETE,
    TIME,
    UTC_OFFSET,
    IS_DST,
    TZ_NAME,
    LOCATION,
    LATITUDE,
    LONGITUDE,
    ALTITUDE,
];

/// Returns a human-readable name for a key.
pub fn key_name(key: u32) -> &'static str {
    match key {
        URL => "URL",
        STATUS => "STATUS",
        SUCCESS => "SUCCESS",
        REQUEST_ID => "REQUEST_ID",
        CONNECT => "CONNECT",
        APP_ID => "APP_ID",
        COOKIE_STORE => "COOKIE_STORE",
        COOKIE_LOAD => "COOKIE_LOAD",
        COOKIE_FSYNC => "COOKIE_FSYNC",
        COOKIE_DELETE => "COOKIE_DELETE",
        TIME => "TIME",
        UTC_OFFSET => "UTC_OFFSET",
        IS_DST => "IS_DST",
        TZ_NAME => "TZ_NAME",
        LOCATION => "LOCATION",
        LATITUDE => "LATITUDE",
        LONGITUDE => "LONGITUDE",
        ALTITUDE => "ALTITUDE",
        RESERVED_START..=RESERVED_END => "RESERVED",
        _ => "USER",
    }
}

/// Returns the band a key belongs to.
pub fn key_band(key: u32) -> &'static str {
    match key {
        URL | STATUS | SUCCESS | REQUEST_ID | CONNECT => "http",
        APP_ID => "identity",
        COOKIE_STORE | COOKIE_LOAD | COOKIE_FSYNC | COOKIE_DELETE => "cookie",
        TIME | UTC_OFFSET | IS_DST | TZ_NAME => "time",
        LOCATION | LATITUDE | LONGITUDE | ALTITUDE => "location",
        RESERVED_START..=RESERVED_END => "reserved",
        _ => "user",
    }
}

/// Returns true if the key is in the protocol's reserved range.
pub fn is_reserved(key: u32) -> bool {
    (RESERVED_START..=RESERVED_END).contains(&key)
}
