/// Errors that can occur while writing or decoding dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DictError {
    /// The dictionary buffer has no room for the tuple.
    #[error("not enough storage in dictionary buffer")]
    NotEnoughStorage,

    /// The tuple cannot be represented (interior NUL, oversized value).
    #[error("invalid dictionary arguments")]
    InvalidArgs,

    /// Wire bytes do not describe a well-formed dictionary.
    #[error("dictionary internal inconsistency")]
    InternalInconsistency,
}

impl DictError {
    /// Legacy numeric code of this error.
    pub const fn code(self) -> i32 {
        match self {
            DictError::NotEnoughStorage => 1 << 1,
            DictError::InvalidArgs => 1 << 2,
            DictError::InternalInconsistency => 1 << 3,
        }
    }

    /// Inverse of [`DictError::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        [
            DictError::NotEnoughStorage,
            DictError::InvalidArgs,
            DictError::InternalInconsistency,
        ]
        .into_iter()
        .find(|err| err.code() == code)
    }
}

pub type Result<T> = std::result::Result<T, DictError>;
