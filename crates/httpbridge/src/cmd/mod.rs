use clap::{Args, Subcommand};
use std::path::PathBuf;

use httpbridge_channel::DEFAULT_OUTBOUND_CAPACITY;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod keys;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a request and print the resulting dictionary.
    Encode(EncodeArgs),
    /// Dispatch a response dictionary and print the callbacks that fire.
    Decode(DecodeArgs),
    /// Print the reserved key table.
    Keys,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Keys => keys::run(format),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Application id written on addressed requests.
    #[arg(long, default_value = "0", value_parser = parse_u32, env = "HTTPBRIDGE_APP_ID")]
    pub app_id: u32,
    /// Outbound dictionary capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    pub capacity: usize,
    #[command(subcommand)]
    pub request: Request,
}

#[derive(Subcommand, Debug)]
pub enum Request {
    /// HTTP GET request.
    HttpGet {
        #[arg(long)]
        url: String,
        #[arg(long, allow_hyphen_values = true)]
        request_id: i32,
    },
    /// Time zone request.
    Time,
    /// Location request.
    Location,
    /// Store one cookie.
    CookieSet {
        #[arg(long, allow_hyphen_values = true)]
        request_id: i32,
        #[arg(long, value_parser = parse_u32)]
        key: u32,
        #[command(flatten)]
        value: CookieValueArgs,
    },
    /// Load cookies.
    CookieGet {
        #[arg(long, allow_hyphen_values = true)]
        request_id: i32,
        /// Cookie keys (comma-separated).
        #[arg(long, value_delimiter = ',', required = true, value_parser = parse_u32)]
        keys: Vec<u32>,
    },
    /// Delete cookies.
    CookieDelete {
        #[arg(long, allow_hyphen_values = true)]
        request_id: i32,
        /// Cookie keys (comma-separated).
        #[arg(long, value_delimiter = ',', required = true, value_parser = parse_u32)]
        keys: Vec<u32>,
    },
    /// Persist pending cookie writes.
    CookieFsync,
}

/// Exactly one typed cookie value.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct CookieValueArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub int8: Option<i8>,
    #[arg(long, allow_hyphen_values = true)]
    pub int16: Option<i16>,
    #[arg(long, allow_hyphen_values = true)]
    pub int32: Option<i32>,
    #[arg(long)]
    pub uint8: Option<u8>,
    #[arg(long)]
    pub uint16: Option<u16>,
    #[arg(long)]
    pub uint32: Option<u32>,
    #[arg(long)]
    pub string: Option<String>,
    /// Raw bytes as hex.
    #[arg(long)]
    pub hex: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Application id responses must carry.
    #[arg(long, default_value = "0", value_parser = parse_u32, env = "HTTPBRIDGE_APP_ID")]
    pub app_id: u32,
    /// Dictionary as JSON.
    #[arg(long, conflicts_with_all = ["file", "wire"])]
    pub json: Option<String>,
    /// Read the JSON dictionary from a file.
    #[arg(long, conflicts_with_all = ["json", "wire"])]
    pub file: Option<PathBuf>,
    /// Dictionary as hex wire bytes.
    #[arg(long, conflicts_with_all = ["json", "file"])]
    pub wire: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a decimal or `0x`-prefixed key or id.
pub fn parse_u32(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|err| format!("invalid value {input:?}: {err}"))
}

/// Decode a hex argument. Malformed input is a usage error.
pub fn hex_arg(flag: &str, input: &str) -> CliResult<Vec<u8>> {
    hex::decode(input.trim()).map_err(|err| CliError::new(USAGE, format!("{flag}: {err}")))
}
