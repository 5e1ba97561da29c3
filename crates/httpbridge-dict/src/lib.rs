//! Typed key/value dictionary container for httpbridge.
//!
//! A dictionary is an ordered list of tuples. Every tuple carries:
//! - A 4-byte little-endian key
//! - A 1-byte type tag (byte array, cstring, unsigned or signed integer)
//! - A 2-byte little-endian value length
//!
//! Outbound dictionaries are built with a capacity-bounded [`DictWriter`];
//! inbound dictionaries are read through [`Dictionary::find`] and
//! [`Dictionary::iter`], which preserve write order.

pub mod codec;
pub mod dictionary;
pub mod error;
pub mod value;
pub mod writer;

pub use codec::{
    decode_dict, encode_dict, encode_tuples, DICT_HEADER_SIZE, MAX_TUPLES, MAX_VALUE_LEN,
    TUPLE_HEADER_SIZE,
};
pub use dictionary::{Dictionary, Tuple};
pub use error::{DictError, Result};
pub use value::{TupleType, Value};
pub use writer::DictWriter;
