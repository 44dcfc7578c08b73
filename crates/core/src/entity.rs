//! Canonical write records
//!
//! An [`Entity`] is the backend-ready form of one record: its key plus an
//! ordered map of named property values. Model types convert themselves to
//! an `Entity` through [`crate::Model::to_entity`]; raw entities are
//! buffered as-is.

use crate::error::Result;
use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property value stored on an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Short, indexable string
    String(String),
    /// Long, unindexed text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Reference to another entity
    Key(Key),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Key> for Value {
    fn from(v: Key) -> Self {
        Value::Key(v)
    }
}

/// A backend record: key plus properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    key: Key,
    properties: BTreeMap<String, Value>,
}

impl Entity {
    /// Create an entity with no properties
    pub fn new(key: Key) -> Self {
        Self {
            key,
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a property, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.insert(name.into(), value.into())
    }

    /// Read a property
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// The entity's key
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The entity's kind
    pub fn kind(&self) -> &str {
        self.key.kind()
    }

    /// All properties in name order
    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    /// Check the entity can be written
    ///
    /// The key must be well formed; an incomplete last element is allowed.
    /// Property names must be non-empty.
    pub fn validate(&self) -> Result<()> {
        self.key.validate()?;
        if self.properties.keys().any(|name| name.is_empty()) {
            return Err(crate::Error::invalid_argument(format!(
                "entity of kind '{}' has an empty property name",
                self.kind()
            )));
        }
        Ok(())
    }

    /// Size in bytes of the canonical binary form, used for batch budgets
    pub fn encoded_size(&self) -> Result<usize> {
        Ok(bincode::serialized_size(self)? as usize)
    }
}
