//! The JSON-like document tree the engines operate on
//!
//! Documents are plain values: an insertion-ordered object, an array, or one
//! of the scalar leaves. Numbers carry their exact representation (32-bit vs
//! 64-bit integer, single vs double precision) so that a migration round trip
//! hands back byte-identical numeric fields.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LensError, Result};
use crate::op::TypeTag;

/// Runtime node kinds of a document tree
///
/// Unlike [`TypeTag`], this includes `Null`: null exists as a value in real
/// documents (an `Add` without a default produces one) but is never a
/// declared field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Null,
    Boolean,
    Number,
    Text,
    Array,
    Object,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Boolean => "boolean",
            NodeKind::Number => "number",
            NodeKind::Text => "text",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        };
        write!(f, "{name}")
    }
}

/// A numeric value together with its exact representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Convert to JSON, widening to the closest JSON numeric form.
    pub fn to_json(self) -> Value {
        match self {
            Number::Int(i) => Value::from(i64::from(i)),
            Number::Long(i) => Value::from(i),
            Number::Float(f) => Value::from(f64::from(f)),
            Number::Double(f) => Value::from(f),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Long(i) => write!(f, "{i}"),
            Number::Float(v) => write!(f, "{v}"),
            Number::Double(v) => write!(f, "{v}"),
        }
    }
}

/// A scalar leaf value
///
/// Scalars are the domain and codomain of convert mappings and the payload
/// of `Add`/`Remove` defaults. Containers are deliberately excluded.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Boolean(bool),
}

impl Scalar {
    /// The declared type this scalar satisfies.
    pub fn tag(&self) -> TypeTag {
        match self {
            Scalar::Text(_) => TypeTag::Text,
            Scalar::Number(_) => TypeTag::Number,
            Scalar::Boolean(_) => TypeTag::Boolean,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Number(Number::Int(i))
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Number(Number::Long(i))
    }
}

impl From<f32> for Scalar {
    fn from(f: f32) -> Self {
        Scalar::Number(Number::Float(f))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Number(Number::Double(f))
    }
}

/// A document tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Boolean(bool),
    Number(Number),
    Text(String),
    Array(Vec<Document>),
    Object(IndexMap<String, Document>),
}

impl Document {
    /// A fresh empty object node.
    pub fn object() -> Self {
        Document::Object(IndexMap::new())
    }

    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Document::Null => NodeKind::Null,
            Document::Boolean(_) => NodeKind::Boolean,
            Document::Number(_) => NodeKind::Number,
            Document::Text(_) => NodeKind::Text,
            Document::Array(_) => NodeKind::Array,
            Document::Object(_) => NodeKind::Object,
        }
    }

    /// Build a document from a JSON value.
    ///
    /// JSON does not distinguish numeric widths, so integers arrive as
    /// `Number::Long` and floats as `Number::Double`.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Boolean(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Document::Number(Number::Long(i))
                } else {
                    Document::Number(Number::Double(n.as_f64().unwrap_or_default()))
                }
            }
            Value::String(s) => Document::Text(s),
            Value::Array(items) => {
                Document::Array(items.into_iter().map(Document::from_json).collect())
            }
            Value::Object(fields) => Document::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Document::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Render as a JSON value, widening numeric kinds.
    pub fn to_json(&self) -> Value {
        match self {
            Document::Null => Value::Null,
            Document::Boolean(b) => Value::Bool(*b),
            Document::Number(n) => n.to_json(),
            Document::Text(s) => Value::String(s.clone()),
            Document::Array(items) => Value::Array(items.iter().map(Document::to_json).collect()),
            Document::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Extract the scalar stored in this node, checked against the declared
    /// type. Container tags are not extractable.
    pub(crate) fn to_scalar(&self, tag: TypeTag) -> Result<Scalar> {
        match (tag, self) {
            (TypeTag::Text, Document::Text(s)) => Ok(Scalar::Text(s.clone())),
            (TypeTag::Number, Document::Number(n)) => Ok(Scalar::Number(*n)),
            (TypeTag::Boolean, Document::Boolean(b)) => Ok(Scalar::Boolean(*b)),
            (TypeTag::Object | TypeTag::Array, _) => Err(LensError::UnsupportedType(tag)),
            (_, other) => Err(LensError::kind_mismatch(tag.node_kind(), other.kind())),
        }
    }
}

impl From<Scalar> for Document {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => Document::Text(s),
            Scalar::Number(n) => Document::Number(n),
            Scalar::Boolean(b) => Document::Boolean(b),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
