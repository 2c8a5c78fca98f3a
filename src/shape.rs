//! Synthetic shape documents
//!
//! Admission-time validation replays a migration history against a shape
//! tree instead of real data: scalar leaves hold the declared [`TypeTag`],
//! containers mirror the document structure. The tree implements
//! [`TreeNode`], so the structural primitives behave exactly as they do on
//! real documents.

use indexmap::IndexMap;

use crate::document::NodeKind;
use crate::error::{LensError, Result};
use crate::op::TypeTag;
use crate::tree::TreeNode;

/// A node in the synthetic validation tree
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// The shape of an explicit null value, e.g. what `Head` leaves behind
    /// for an empty array.
    Null,
    /// A scalar leaf holding its declared type.
    Scalar(TypeTag),
    Object(IndexMap<String, Shape>),
    Array(Vec<Shape>),
}

impl Shape {
    /// A fresh empty object shape — the origin every history replay starts
    /// from.
    pub fn empty_object() -> Self {
        Shape::Object(IndexMap::new())
    }

    /// The shape a freshly added field of the given declared type has.
    pub fn for_tag(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Object => Shape::Object(IndexMap::new()),
            TypeTag::Array => Shape::Array(Vec::new()),
            scalar => Shape::Scalar(scalar),
        }
    }

    /// The declared type this shape satisfies. `None` for null shapes,
    /// which no declared type produces directly.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Shape::Scalar(tag) => Some(*tag),
            Shape::Object(_) => Some(TypeTag::Object),
            Shape::Array(_) => Some(TypeTag::Array),
            Shape::Null => None,
        }
    }
}

impl TreeNode for Shape {
    fn kind(&self) -> NodeKind {
        match self {
            Shape::Null => NodeKind::Null,
            Shape::Scalar(tag) => tag.node_kind(),
            Shape::Object(_) => NodeKind::Object,
            Shape::Array(_) => NodeKind::Array,
        }
    }

    fn fields(&self) -> Result<&IndexMap<String, Shape>> {
        match self {
            Shape::Object(fields) => Ok(fields),
            other => Err(LensError::kind_mismatch(NodeKind::Object, other.kind())),
        }
    }

    fn fields_mut(&mut self) -> Result<&mut IndexMap<String, Shape>> {
        match self {
            Shape::Object(fields) => Ok(fields),
            other => Err(LensError::kind_mismatch(NodeKind::Object, other.kind())),
        }
    }

    fn items_mut(&mut self) -> Result<&mut Vec<Shape>> {
        match self {
            Shape::Array(items) => Ok(items),
            other => Err(LensError::kind_mismatch(NodeKind::Array, other.kind())),
        }
    }

    fn null() -> Self {
        Shape::Null
    }

    fn empty_object() -> Self {
        Shape::Object(IndexMap::new())
    }

    fn singleton_array(item: Self) -> Self {
        Shape::Array(vec![item])
    }
}
