use bytes::Bytes;

/// Wire type tag of a tuple value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TupleType {
    ByteArray = 0,
    CString = 1,
    UInt = 2,
    Int = 3,
}

impl TupleType {
    /// Parse a wire type tag.
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(TupleType::ByteArray),
            1 => Some(TupleType::CString),
            2 => Some(TupleType::UInt),
            3 => Some(TupleType::Int),
            _ => None,
        }
    }

    /// Human-readable name of the type tag.
    pub fn as_str(self) -> &'static str {
        match self {
            TupleType::ByteArray => "bytes",
            TupleType::CString => "cstring",
            TupleType::UInt => "uint",
            TupleType::Int => "int",
        }
    }
}

/// A typed dictionary value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    #[cfg_attr(feature = "serde", serde(rename = "bytes"))]
    ByteArray(Bytes),
    #[cfg_attr(feature = "serde", serde(rename = "cstring"))]
    CString(String),
    #[cfg_attr(feature = "serde", serde(rename = "uint8"))]
    UInt8(u8),
    #[cfg_attr(feature = "serde", serde(rename = "uint16"))]
    UInt16(u16),
    #[cfg_attr(feature = "serde", serde(rename = "uint32"))]
    UInt32(u32),
    #[cfg_attr(feature = "serde", serde(rename = "int8"))]
    Int8(i8),
    #[cfg_attr(feature = "serde", serde(rename = "int16"))]
    Int16(i16),
    #[cfg_attr(feature = "serde", serde(rename = "int32"))]
    Int32(i32),
}

impl Value {
    /// Wire type tag for this value.
    pub fn tuple_type(&self) -> TupleType {
        match self {
            Value::ByteArray(_) => TupleType::ByteArray,
            Value::CString(_) => TupleType::CString,
            Value::UInt8(_) | Value::UInt16(_) | Value::UInt32(_) => TupleType::UInt,
            Value::Int8(_) | Value::Int16(_) | Value::Int32(_) => TupleType::Int,
        }
    }

    /// Number of value bytes on the wire. Cstrings include their NUL terminator.
    pub fn encoded_len(&self) -> usize {
        match self {
            Value::ByteArray(data) => data.len(),
            Value::CString(text) => text.len() + 1,
            Value::UInt8(_) | Value::Int8(_) => 1,
            Value::UInt16(_) | Value::Int16(_) => 2,
            Value::UInt32(_) | Value::Int32(_) => 4,
        }
    }

    /// Whether the value is an integer of any width.
    pub fn is_integer(&self) -> bool {
        matches!(self.tuple_type(), TupleType::UInt | TupleType::Int)
    }

    // Integers widen by their own signedness, then the narrow accessors
    // truncate, so reading a 4-byte value as `u8` yields its low byte.
    fn widened(&self) -> Option<i64> {
        match *self {
            Value::UInt8(v) => Some(i64::from(v)),
            Value::UInt16(v) => Some(i64::from(v)),
            Value::UInt32(v) => Some(i64::from(v)),
            Value::Int8(v) => Some(i64::from(v)),
            Value::Int16(v) => Some(i64::from(v)),
            Value::Int32(v) => Some(i64::from(v)),
            Value::ByteArray(_) | Value::CString(_) => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        self.widened().map(|v| v as u8)
    }

    pub fn as_i8(&self) -> Option<i8> {
        self.widened().map(|v| v as i8)
    }

    pub fn as_u16(&self) -> Option<u16> {
        self.widened().map(|v| v as u16)
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.widened().map(|v| v as i16)
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.widened().map(|v| v as u32)
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.widened().map(|v| v as i32)
    }

    /// Integer truthiness: any non-zero integer is `true`.
    pub fn as_bool(&self) -> Option<bool> {
        self.widened().map(|v| v != 0)
    }

    /// Borrow a cstring value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::CString(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow a byte-array value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::ByteArray(data) => Some(data),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::ByteArray(data) => f.write_str(&hex::encode(data)),
            Value::CString(text) => write!(f, "{text:?}"),
            Value::UInt8(v) => write!(f, "{v}"),
            Value::UInt16(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_int!(
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::CString(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::CString(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::ByteArray(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::ByteArray(Bytes::from(value))
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::ByteArray(value)
    }
}
