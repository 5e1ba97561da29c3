use crate::codec::{DICT_HEADER_SIZE, TUPLE_HEADER_SIZE};
use crate::value::Value;

/// A single key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tuple {
    /// Dictionary key.
    pub key: u32,
    /// Typed value.
    pub value: Value,
}

impl Tuple {
    /// Create a new tuple.
    pub fn new(key: u32, value: impl Into<Value>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// The total wire size of this tuple (header + value).
    pub fn encoded_len(&self) -> usize {
        TUPLE_HEADER_SIZE + self.value.encoded_len()
    }
}

/// An ordered, read-only dictionary.
///
/// Lookups return the first tuple with a matching key; iteration follows
/// write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Dictionary {
    tuples: Vec<Tuple>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the first tuple with `key`.
    pub fn find(&self, key: u32) -> Option<&Tuple> {
        self.tuples.iter().find(|tuple| tuple.key == key)
    }

    /// Returns true if any tuple uses `key`.
    pub fn contains(&self, key: u32) -> bool {
        self.find(key).is_some()
    }

    /// Iterate tuples in write order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tuple> {
        self.tuples.iter()
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Tuples as a slice.
    pub fn as_slice(&self) -> &[Tuple] {
        &self.tuples
    }

    /// The total wire size of this dictionary.
    pub fn encoded_len(&self) -> usize {
        DICT_HEADER_SIZE + self.tuples.iter().map(Tuple::encoded_len).sum::<usize>()
    }

    /// Consume the dictionary and return its tuples.
    pub fn into_tuples(self) -> Vec<Tuple> {
        self.tuples
    }
}

impl From<Vec<Tuple>> for Dictionary {
    fn from(tuples: Vec<Tuple>) -> Self {
        Self { tuples }
    }
}

impl FromIterator<Tuple> for Dictionary {
    fn from_iter<I: IntoIterator<Item = Tuple>>(iter: I) -> Self {
        Self {
            tuples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a Tuple;
    type IntoIter = std::slice::Iter<'a, Tuple>;

    fn into_iter(self) -> Self::IntoIter {
        self.tuples.iter()
    }
}
