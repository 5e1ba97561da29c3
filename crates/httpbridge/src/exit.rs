use std::fmt;
use std::io;

use httpbridge_dict::DictError;
use httpbridge_proto::BridgeError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => USAGE,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

fn dict_exit_code(err: DictError) -> i32 {
    match err {
        DictError::NotEnoughStorage | DictError::InvalidArgs => DATA_INVALID,
        DictError::InternalInconsistency => INTERNAL,
    }
}

pub fn dict_error(context: &str, err: DictError) -> CliError {
    CliError::new(dict_exit_code(err), format!("{context}: {err}"))
}

pub fn bridge_error(context: &str, err: BridgeError) -> CliError {
    let code = match err {
        BridgeError::Dict(inner) => dict_exit_code(inner),
        BridgeError::InvalidBridgeResponse => DATA_INVALID,
        BridgeError::Channel(_) => FAILURE,
    };
    CliError::new(code, format!("{context}: {err} (code {})", err.code()))
}

pub fn json_error(context: &str, err: serde_json::Error) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use httpbridge_channel::ChannelError;

    use super::*;

    #[test]
    fn storage_errors_are_invalid_data() {
        let err = bridge_error("encode", BridgeError::Dict(DictError::NotEnoughStorage));
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("8192"));
    }

    #[test]
    fn channel_errors_are_failures() {
        let err = bridge_error("send", BridgeError::Channel(ChannelError::NotConnected));
        assert_eq!(err.code, FAILURE);
        assert_eq!(err.to_string(), "send: channel error: not connected (code 8)");
    }

    #[test]
    fn missing_file_is_usage() {
        let err = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, USAGE);
    }
}
