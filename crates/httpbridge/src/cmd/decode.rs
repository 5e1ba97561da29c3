use std::fs;

use httpbridge_channel::LoopbackChannel;
use httpbridge_dict::{decode_dict, Dictionary};
use httpbridge_proto::{Bridge, Callbacks};

use crate::cmd::{hex_arg, DecodeArgs};
use crate::exit::{
    dict_error, io_error, json_error, CliError, CliResult, FAILURE, SUCCESS, USAGE,
};
use crate::output::{print_dispatch, FiredCallback, OutputFormat};

type Fired = Vec<FiredCallback>;

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let dict = read_dictionary(&args)?;

    let mut bridge = Bridge::with_app_id(LoopbackChannel::new(), args.app_id);
    bridge.register_callbacks(recording_callbacks(), Fired::new());

    let outcome = bridge.dispatch(&dict);
    let fired = bridge.context().cloned().unwrap_or_default();

    match outcome {
        Ok(kind) => {
            print_dispatch(Some(kind.as_str()), None, &fired, format);
            Ok(SUCCESS)
        }
        Err(reason) => {
            print_dispatch(None, Some(reason.to_string()), &fired, format);
            Ok(FAILURE)
        }
    }
}

fn read_dictionary(args: &DecodeArgs) -> CliResult<Dictionary> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json).map_err(|err| json_error("--json is not a dictionary", err));
    }
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return serde_json::from_str(&text).map_err(|err| {
            json_error(&format!("{} is not a dictionary", path.display()), err)
        });
    }
    if let Some(wire) = &args.wire {
        let bytes = hex_arg("--wire", wire)?;
        return decode_dict(&bytes).map_err(|err| dict_error("--wire is not a dictionary", err));
    }
    Err(CliError::new(USAGE, "one of --json, --file or --wire is required"))
}

fn recording_callbacks() -> Callbacks<Fired> {
    Callbacks::new()
        .on_failure(|request_id, status, fired: &mut Fired| {
            fired.push(
                FiredCallback::new("failure")
                    .arg("request_id", request_id)
                    .arg("status", status),
            )
        })
        .on_success(|request_id, status, dict, fired: &mut Fired| {
            fired.push(
                FiredCallback::new("success")
                    .arg("request_id", request_id)
                    .arg("status", status)
                    .arg("tuples", dict.len()),
            )
        })
        .on_reconnect(|fired: &mut Fired| fired.push(FiredCallback::new("reconnect")))
        .on_cookie_get(|request_id, tuple, fired: &mut Fired| {
            fired.push(
                FiredCallback::new("cookie_get")
                    .arg("request_id", request_id)
                    .arg("key", tuple.key)
                    .arg("value", &tuple.value),
            )
        })
        .on_cookie_batch_get(|request_id, dict, fired: &mut Fired| {
            fired.push(
                FiredCallback::new("cookie_batch_get")
                    .arg("request_id", request_id)
                    .arg("tuples", dict.len()),
            )
        })
        .on_cookie_set(|request_id, success, fired: &mut Fired| {
            fired.push(
                FiredCallback::new("cookie_set")
                    .arg("request_id", request_id)
                    .arg("success", success),
            )
        })
        .on_cookie_fsync(|success, fired: &mut Fired| {
            fired.push(FiredCallback::new("cookie_fsync").arg("success", success))
        })
        .on_cookie_delete(|request_id, success, fired: &mut Fired| {
            fired.push(
                FiredCallback::new("cookie_delete")
                    .arg("request_id", request_id)
                    .arg("success", success),
            )
        })
        .on_time(|info, fired: &mut Fired| {
            fired.push(
                FiredCallback::new("time")
                    .arg("unix_time", info.unix_time)
                    .arg("utc_offset", info.utc_offset)
                    .arg("is_dst", info.is_dst)
                    .arg("tz_name", info.tz_name),
            )
        })
        .on_location(|location, fired: &mut Fired| {
            fired.push(
                FiredCallback::new("location")
                    .arg("accuracy", location.accuracy)
                    .arg("latitude", location.latitude)
                    .arg("longitude", location.longitude)
                    .arg("altitude", location.altitude),
            )
        })
}
