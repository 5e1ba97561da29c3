use httpbridge_channel::{DEFAULT_INBOUND_CAPACITY, DEFAULT_OUTBOUND_CAPACITY};
use httpbridge_proto::keys;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_version, OutputFormat, VersionInfo};

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.extended {
        println!("httpbridge {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let info = VersionInfo {
        name: "httpbridge",
        version: env!("CARGO_PKG_VERSION"),
        target: option_env!("HTTPBRIDGE_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("HTTPBRIDGE_BUILD_PROFILE").unwrap_or("unknown"),
        target_os: std::env::consts::OS,
        target_arch: std::env::consts::ARCH,
        outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        inbound_capacity: DEFAULT_INBOUND_CAPACITY,
        reserved_keys: format!("{:#06x}..={:#06x}", keys::RESERVED_START, keys::RESERVED_END),
        reserved_key_count: keys::ALL.len(),
    };
    print_version(&info, format);
    Ok(SUCCESS)
}
