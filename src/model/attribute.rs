//! Typed attribute values attached to collection nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The kind of a typed attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Null => write!(f, "null"),
            Kind::Bool => write!(f, "bool"),
            Kind::Number => write!(f, "number"),
            Kind::String => write!(f, "string"),
        }
    }
}

/// A single typed attribute value. Numbers are double-precision floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl AttributeValue {
    pub fn kind(&self) -> Kind {
        match self {
            AttributeValue::Null => Kind::Null,
            AttributeValue::Bool(_) => Kind::Bool,
            AttributeValue::Number(_) => Kind::Number,
            AttributeValue::String(_) => Kind::String,
        }
    }

    /// The native JSON form used in the attribute wire format.
    pub fn as_json(&self) -> serde_json::Value {
        match self {
            AttributeValue::Null => serde_json::Value::Null,
            AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
            AttributeValue::Number(n) => serde_json::json!(n),
            AttributeValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Parse a scalar JSON value. Arrays and objects have no attribute form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(AttributeValue::Null),
            serde_json::Value::Bool(b) => Some(AttributeValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(AttributeValue::Number),
            serde_json::Value::String(s) => Some(AttributeValue::String(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self { AttributeValue::Bool(v) }
}
impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self { AttributeValue::Number(v) }
}
impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self { AttributeValue::String(v.to_owned()) }
}
impl From<String> for AttributeValue {
    fn from(v: String) -> Self { AttributeValue::String(v) }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
        }
    }
}

/// A typed value with a stable string key.
///
/// Accessors convert to the requested kind or fail with
/// [`Error::WrongKind`] — there is no implicit coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new_string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: AttributeValue::String(value.into()) }
    }

    pub fn new_number(key: impl Into<String>, value: f64) -> Self {
        Self { key: key.into(), value: AttributeValue::Number(value) }
    }

    pub fn new_bool(key: impl Into<String>, value: bool) -> Self {
        Self { key: key.into(), value: AttributeValue::Bool(value) }
    }

    pub fn new_null(key: impl Into<String>) -> Self {
        Self { key: key.into(), value: AttributeValue::Null }
    }

    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn as_string(&self) -> Result<&str> {
        match &self.value {
            AttributeValue::String(s) => Ok(s),
            other => Err(self.wrong_kind(Kind::String, other.kind())),
        }
    }

    pub fn as_number(&self) -> Result<f64> {
        match &self.value {
            AttributeValue::Number(n) => Ok(*n),
            other => Err(self.wrong_kind(Kind::Number, other.kind())),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match &self.value {
            AttributeValue::Bool(b) => Ok(*b),
            other => Err(self.wrong_kind(Kind::Bool, other.kind())),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, AttributeValue::Null)
    }

    fn wrong_kind(&self, expected: Kind, got: Kind) -> Error {
        Error::WrongKind { key: self.key.clone(), expected, got }
    }
}
