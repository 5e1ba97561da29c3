use httpbridge_channel::{ChannelConfig, LoopbackChannel};
use httpbridge_dict::{decode_dict, Value};
use httpbridge_proto::Bridge;
use tracing::debug;

use crate::cmd::{hex_arg, CookieValueArgs, EncodeArgs, Request};
use crate::exit::{bridge_error, dict_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let channel = LoopbackChannel::with_config(ChannelConfig {
        outbound_capacity: args.capacity,
        ..ChannelConfig::default()
    });
    let mut bridge: Bridge<LoopbackChannel, ()> = Bridge::with_app_id(channel, args.app_id);

    let name = request_name(&args.request);
    encode_request(&mut bridge, args.request)?;

    let wire = bridge
        .channel_mut()
        .take_sent_wire()
        .ok_or_else(|| CliError::new(INTERNAL, "encoder produced no dictionary"))?;
    let dict = decode_dict(&wire).map_err(|err| dict_error("encoded dictionary unreadable", err))?;
    debug!(request = name, size = wire.len(), "request encoded");

    print_encoded(name, &dict, &wire, format);
    Ok(SUCCESS)
}

fn request_name(request: &Request) -> &'static str {
    match request {
        Request::HttpGet { .. } => "http-get",
        Request::Time => "time",
        Request::Location => "location",
        Request::CookieSet { .. } => "cookie-set",
        Request::CookieGet { .. } => "cookie-get",
        Request::CookieDelete { .. } => "cookie-delete",
        Request::CookieFsync => "cookie-fsync",
    }
}

fn encode_request(bridge: &mut Bridge<LoopbackChannel, ()>, request: Request) -> CliResult<()> {
    let result = match request {
        Request::HttpGet { url, request_id } => bridge
            .http_get(&url, request_id)
            .and_then(|request| request.send()),
        Request::Time => bridge.time_request(),
        Request::Location => bridge.location_request(),
        Request::CookieSet {
            request_id,
            key,
            value,
        } => {
            let value = cookie_value(value)?;
            bridge.cookie_set(request_id, key, value)
        }
        Request::CookieGet { request_id, keys } => bridge.cookie_get_multiple(request_id, &keys),
        Request::CookieDelete { request_id, keys } => {
            bridge.cookie_delete_multiple(request_id, &keys)
        }
        Request::CookieFsync => bridge.cookie_fsync(),
    };
    result.map_err(|err| bridge_error("encode failed", err))
}

fn cookie_value(args: CookieValueArgs) -> CliResult<Value> {
    let value = if let Some(v) = args.int8 {
        Value::from(v)
    } else if let Some(v) = args.int16 {
        Value::from(v)
    } else if let Some(v) = args.int32 {
        Value::from(v)
    } else if let Some(v) = args.uint8 {
        Value::from(v)
    } else if let Some(v) = args.uint16 {
        Value::from(v)
    } else if let Some(v) = args.uint32 {
        Value::from(v)
    } else if let Some(v) = args.string {
        Value::from(v)
    } else if let Some(v) = args.hex {
        Value::from(hex_arg("--hex", &v)?)
    } else {
        return Err(CliError::new(USAGE, "a cookie value is required"));
    };
    Ok(value)
}
