use crate::codec::{DICT_HEADER_SIZE, MAX_TUPLES, MAX_VALUE_LEN};
use crate::dictionary::{Dictionary, Tuple};
use crate::error::{DictError, Result};
use crate::value::Value;

/// Builds an outbound dictionary inside a fixed byte budget.
///
/// Every write is checked against the encoded size of the dictionary so a
/// finished writer always fits the buffer it was sized for.
#[derive(Debug, Clone)]
pub struct DictWriter {
    tuples: Vec<Tuple>,
    capacity: usize,
    size: usize,
}

impl DictWriter {
    /// Create an empty writer with a byte budget.
    pub fn new(capacity: usize) -> Self {
        Self {
            tuples: Vec::new(),
            capacity,
            size: DICT_HEADER_SIZE,
        }
    }

    /// Append a tuple.
    ///
    /// Fails with [`DictError::InvalidArgs`] for values that cannot be encoded
    /// and [`DictError::NotEnoughStorage`] when the tuple does not fit.
    pub fn write(&mut self, key: u32, value: impl Into<Value>) -> Result<()> {
        let tuple = Tuple::new(key, value);
        validate_value(&tuple.value)?;

        if self.tuples.len() >= MAX_TUPLES {
            return Err(DictError::NotEnoughStorage);
        }

        let needed = tuple.encoded_len();
        if self.size + needed > self.capacity {
            return Err(DictError::NotEnoughStorage);
        }

        self.size += needed;
        self.tuples.push(tuple);
        Ok(())
    }

    /// Tuples written so far, in order.
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Encoded size of the dictionary so far.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.size)
    }

    /// Drop all tuples, keeping the capacity.
    pub fn clear(&mut self) {
        self.tuples.clear();
        self.size = DICT_HEADER_SIZE;
    }

    /// Snapshot of the written tuples as a dictionary.
    pub fn to_dictionary(&self) -> Dictionary {
        Dictionary::from(self.tuples.clone())
    }

    /// Consume the writer and return the dictionary.
    pub fn finish(self) -> Dictionary {
        Dictionary::from(self.tuples)
    }
}

fn validate_value(value: &Value) -> Result<()> {
    if value.encoded_len() > MAX_VALUE_LEN {
        return Err(DictError::InvalidArgs);
    }
    if let Value::CString(text) = value {
        if text.contains('\0') {
            return Err(DictError::InvalidArgs);
        }
    }
    Ok(())
}
