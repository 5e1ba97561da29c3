/// Result codes reported by the message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The companion did not acknowledge in time.
    #[error("send timed out")]
    SendTimeout,

    /// The companion rejected the message.
    #[error("send rejected by companion")]
    SendRejected,

    /// No link to the companion device.
    #[error("not connected")]
    NotConnected,

    /// The companion process is not running.
    #[error("companion not running")]
    AppNotRunning,

    /// The call was made with invalid arguments or in an invalid state.
    #[error("invalid channel arguments")]
    InvalidArgs,

    /// The outbound slot is already acquired or a send is in flight.
    #[error("channel busy")]
    Busy,

    /// The message does not fit the receive buffer.
    #[error("buffer overflow")]
    BufferOverflow,

    /// The outbound slot was already released.
    #[error("outbound slot already released")]
    AlreadyReleased,

    /// Another registrant holds the callback slot.
    #[error("callbacks already registered")]
    CallbackAlreadyRegistered,

    /// No registrant holds the callback slot.
    #[error("callbacks not registered")]
    CallbackNotRegistered,
}

impl ChannelError {
    /// Every channel error, in code order.
    pub const ALL: [ChannelError; 10] = [
        ChannelError::SendTimeout,
        ChannelError::SendRejected,
        ChannelError::NotConnected,
        ChannelError::AppNotRunning,
        ChannelError::InvalidArgs,
        ChannelError::Busy,
        ChannelError::BufferOverflow,
        ChannelError::AlreadyReleased,
        ChannelError::CallbackAlreadyRegistered,
        ChannelError::CallbackNotRegistered,
    ];

    /// Legacy numeric code of this error. `0` is reserved for success.
    pub const fn code(self) -> i32 {
        match self {
            ChannelError::SendTimeout => 1 << 1,
            ChannelError::SendRejected => 1 << 2,
            ChannelError::NotConnected => 1 << 3,
            ChannelError::AppNotRunning => 1 << 4,
            ChannelError::InvalidArgs => 1 << 5,
            ChannelError::Busy => 1 << 6,
            ChannelError::BufferOverflow => 1 << 7,
            ChannelError::AlreadyReleased => 1 << 9,
            ChannelError::CallbackAlreadyRegistered => 1 << 10,
            ChannelError::CallbackNotRegistered => 1 << 11,
        }
    }

    /// Inverse of [`ChannelError::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|err| err.code() == code)
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        for (i, a) in ChannelError::ALL.iter().enumerate() {
            for b in &ChannelError::ALL[i + 1..] {
                assert_ne!(a.code(), b.code(), "{a:?} and {b:?} share a code");
            }
        }
    }

    #[test]
    fn codes_stay_below_dictionary_range() {
        for err in ChannelError::ALL {
            assert!(err.code() > 0);
            assert!(err.code() < 1 << 12);
        }
    }

    #[test]
    fn from_code_roundtrip() {
        for err in ChannelError::ALL {
            assert_eq!(ChannelError::from_code(err.code()), Some(err));
        }
        assert_eq!(ChannelError::from_code(0), None);
        assert_eq!(ChannelError::from_code(1 << 8), None);
    }
}
