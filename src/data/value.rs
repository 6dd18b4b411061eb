//! Field values and insertion-ordered field maps.

use std::collections::HashMap;
use std::sync::Arc;

use ndarray::ArrayD;

use crate::error::{Result, SimsenseError};
use crate::time::Timestamp;

/// A mapping from field name to value that remembers insertion order.
///
/// Overwriting an existing key keeps its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> FieldMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert or overwrite `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Look up a value by key for mutation.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = *self.index.get(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Check whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for FieldMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for FieldMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for FieldMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A value read from a container, or derived from one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Zero-dimensional numeric value.
    Scalar(f64),
    /// N-dimensional numeric array, shared between copies of a record.
    Array(Arc<ArrayD<f64>>),
    /// Raw string or character data.
    Bytes(Vec<u8>),
    /// Derived timestamp.
    Timestamp(Timestamp),
    /// Nested group.
    Group(Record),
}

impl Value {
    /// Wrap an owned array.
    pub fn array(data: ArrayD<f64>) -> Self {
        Self::Array(Arc::new(data))
    }

    /// Numeric scalar, if this is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric array, if this is one.
    pub fn as_array(&self) -> Option<&ArrayD<f64>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Raw bytes, if this is text data.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Timestamp, if this is one.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Nested record, if this is a group.
    pub fn as_group(&self) -> Option<&Record> {
        match self {
            Self::Group(r) => Some(r),
            _ => None,
        }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(v) => format!("scalar {}", v),
            Self::Array(a) => format!("array {:?}", a.shape()),
            Self::Bytes(b) => format!("text {:?}", String::from_utf8_lossy(b)),
            Self::Timestamp(t) => format!("timestamp {}", t),
            Self::Group(r) => format!("group ({})", r.len()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<ArrayD<f64>> for Value {
    fn from(a: ArrayD<f64>) -> Self {
        Self::array(a)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Bytes(s.as_bytes().to_vec())
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Self::Timestamp(t)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Group(r)
    }
}

/// A data dictionary: field name to value.
pub type Record = FieldMap<Value>;

impl FieldMap<Value> {
    /// Fetch a field or fail with [`SimsenseError::FieldNotFound`].
    pub fn field(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| SimsenseError::field_not_found(name))
    }

    /// Fetch a numeric array field.
    pub fn array_field(&self, name: &str) -> Result<&ArrayD<f64>> {
        self.field(name)?
            .as_array()
            .ok_or_else(|| SimsenseError::Shape(format!("field '{}' is not an array", name)))
    }

    /// Fetch a timestamp field.
    pub fn timestamp_field(&self, name: &str) -> Result<Timestamp> {
        self.field(name)?
            .as_timestamp()
            .ok_or_else(|| SimsenseError::field_not_found(name))
    }
}
