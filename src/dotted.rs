//! Attribute-style access to nested records.

use crate::data::{FieldMap, Record, Value};
use crate::error::{Result, SimsenseError};

/// An attribute held by a [`Dotted`] wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// Leaf value (scalar, array, text or timestamp).
    Value(Value),
    /// Nested wrapper built from a nested record.
    Nested(Dotted),
}

impl Attr {
    /// Leaf value, if this is not a nested wrapper.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Nested(_) => None,
        }
    }

    /// Nested wrapper, if this is one.
    pub fn as_nested(&self) -> Option<&Dotted> {
        match self {
            Self::Nested(d) => Some(d),
            Self::Value(_) => None,
        }
    }

    /// Numeric scalar, if this is one.
    pub fn as_scalar(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_scalar)
    }
}

impl From<Value> for Attr {
    fn from(value: Value) -> Self {
        match value {
            Value::Group(record) => Self::Nested(Dotted::from(record)),
            other => Self::Value(other),
        }
    }
}

impl From<Dotted> for Attr {
    fn from(d: Dotted) -> Self {
        Self::Nested(d)
    }
}

/// Wraps a record so every key becomes an attribute.
///
/// Nested groups become nested wrappers. Arrays are shared with the source
/// record, the top-level structure is not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dotted {
    attrs: FieldMap<Attr>,
}

impl Dotted {
    /// Create an empty wrapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an attribute.
    pub fn get(&self, name: &str) -> Result<&Attr> {
        self.attrs
            .get(name)
            .ok_or_else(|| SimsenseError::missing_attribute(name))
    }

    /// Read a leaf value.
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.get(name)?
            .as_value()
            .ok_or_else(|| SimsenseError::missing_attribute(name))
    }

    /// Follow a dotted path such as `"retrieval.x"`.
    pub fn path(&self, dotted_path: &str) -> Result<&Attr> {
        let mut parts = dotted_path.split('.');
        let first = parts.next().unwrap_or_default();
        let mut current = self.get(first)?;
        for part in parts {
            current = current
                .as_nested()
                .ok_or_else(|| SimsenseError::missing_attribute(part))?
                .get(part)?;
        }
        Ok(current)
    }

    /// Insert or overwrite an attribute.
    pub fn set(&mut self, name: impl Into<String>, attr: impl Into<Attr>) {
        self.attrs.insert(name, attr.into());
    }

    /// Attribute names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys()
    }

    /// The live top-level mapping; nested wrappers stay wrapped.
    pub fn to_mapping(&self) -> &FieldMap<Attr> {
        &self.attrs
    }
}

impl From<Record> for Dotted {
    fn from(record: Record) -> Self {
        Self {
            attrs: record.into_iter().map(|(k, v)| (k, Attr::from(v))).collect(),
        }
    }
}

impl From<&Record> for Dotted {
    fn from(record: &Record) -> Self {
        Self::from(record.clone())
    }
}
