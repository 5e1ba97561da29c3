use httpbridge_channel::ChannelError;
use httpbridge_dict::DictError;

/// Dictionary error codes are shifted by this many bits in the legacy code space.
pub const DICT_CODE_SHIFT: u32 = 12;

/// Legacy code for a recognized response that is missing required fields.
pub const INVALID_BRIDGE_RESPONSE_CODE: i32 = 1 << 17;

/// Statuses at or above this offset report channel-level failures.
pub const TRANSPORT_STATUS_OFFSET: i32 = 1000;

/// Errors that can occur in bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// Channel-level error.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Dictionary-level error.
    #[error("dictionary error: {0}")]
    Dict(#[from] DictError),

    /// The companion's response lacks fields its kind requires.
    #[error("invalid bridge response")]
    InvalidBridgeResponse,
}

impl BridgeError {
    /// Legacy numeric code.
    ///
    /// Channel codes are unchanged, dictionary codes are shifted left by
    /// [`DICT_CODE_SHIFT`], and an invalid response is
    /// [`INVALID_BRIDGE_RESPONSE_CODE`]. The three ranges never overlap.
    pub fn code(&self) -> i32 {
        match self {
            BridgeError::Channel(err) => err.code(),
            BridgeError::Dict(err) => err.code() << DICT_CODE_SHIFT,
            BridgeError::InvalidBridgeResponse => INVALID_BRIDGE_RESPONSE_CODE,
        }
    }

    /// Inverse of [`BridgeError::code`]. `0` (success) and unknown codes
    /// yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        if code == INVALID_BRIDGE_RESPONSE_CODE {
            return Some(BridgeError::InvalidBridgeResponse);
        }
        if let Some(err) = ChannelError::from_code(code) {
            return Some(BridgeError::Channel(err));
        }
        if code & ((1 << DICT_CODE_SHIFT) - 1) == 0 {
            return DictError::from_code(code >> DICT_CODE_SHIFT).map(BridgeError::Dict);
        }
        None
    }

    /// Status reported to the failure callback for this error.
    pub fn transport_status(&self) -> i32 {
        TRANSPORT_STATUS_OFFSET + self.code()
    }
}

/// Legacy numeric code of a result: `0` for success.
pub fn result_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => err.code(),
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
