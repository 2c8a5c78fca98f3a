//! The abstract tree interface and the shared structural primitives
//!
//! Both engines — the runtime transformation engine and the admission-time
//! validator — apply the same six structural edits. The validator works on a
//! synthetic shape tree instead of a real document, so the primitives are
//! written once against the [`TreeNode`] interface and instantiated for
//! both.

use indexmap::IndexMap;

use crate::document::{Document, NodeKind};
use crate::error::{LensError, Result};

/// The document-tree interface the engines consume
///
/// Objects expose their fields as an insertion-ordered map; arrays as a
/// plain vector. Accessors fail with a structural error when the node has
/// the wrong kind — the engines never coerce.
pub trait TreeNode: Clone + Sized {
    /// The kind of this node.
    fn kind(&self) -> NodeKind;

    /// The ordered field map of an object node.
    fn fields(&self) -> Result<&IndexMap<String, Self>>;

    /// Mutable access to the ordered field map of an object node.
    fn fields_mut(&mut self) -> Result<&mut IndexMap<String, Self>>;

    /// Mutable access to the elements of an array node.
    fn items_mut(&mut self) -> Result<&mut Vec<Self>>;

    /// The explicit null node.
    fn null() -> Self;

    /// A fresh empty object node.
    fn empty_object() -> Self;

    /// An array node holding exactly the given element.
    fn singleton_array(item: Self) -> Self;
}

impl TreeNode for Document {
    fn kind(&self) -> NodeKind {
        Document::kind(self)
    }

    fn fields(&self) -> Result<&IndexMap<String, Document>> {
        match self {
            Document::Object(fields) => Ok(fields),
            other => Err(LensError::kind_mismatch(NodeKind::Object, other.kind())),
        }
    }

    fn fields_mut(&mut self) -> Result<&mut IndexMap<String, Document>> {
        match self {
            Document::Object(fields) => Ok(fields),
            other => Err(LensError::kind_mismatch(NodeKind::Object, other.kind())),
        }
    }

    fn items_mut(&mut self) -> Result<&mut Vec<Document>> {
        match self {
            Document::Array(items) => Ok(items),
            other => Err(LensError::kind_mismatch(NodeKind::Array, other.kind())),
        }
    }

    fn null() -> Self {
        Document::Null
    }

    fn empty_object() -> Self {
        Document::object()
    }

    fn singleton_array(item: Self) -> Self {
        Document::Array(vec![item])
    }
}

/// Move a field to a new key, keeping its position and the order of all
/// other fields. Renaming an absent field leaves the object untouched.
pub fn rename<T: TreeNode>(node: &mut T, from: &str, to: &str) -> Result<()> {
    let fields = node.fields_mut()?;
    if !fields.contains_key(from) {
        return Ok(());
    }
    let old = std::mem::take(fields);
    for (name, value) in old {
        if name == from {
            fields.insert(to.to_string(), value);
        } else {
            fields.insert(name, value);
        }
    }
    Ok(())
}

/// Duplicate the value at `from` into `to`, only if `to` is absent.
pub fn copy<T: TreeNode>(node: &mut T, from: &str, to: &str) -> Result<()> {
    let fields = node.fields_mut()?;
    if let Some(value) = fields.get(from).cloned() {
        fields.entry(to.to_string()).or_insert(value);
    }
    Ok(())
}

/// Replace an array-valued field with its first element, or explicit null
/// when the array is empty.
pub fn head<T: TreeNode>(node: &mut T, name: &str) -> Result<()> {
    let fields = node.fields_mut()?;
    let value = fields
        .get_mut(name)
        .ok_or_else(|| LensError::missing_node(name))?;
    let items = value.items_mut()?;
    let first = if items.is_empty() {
        T::null()
    } else {
        items.remove(0)
    };
    *value = first;
    Ok(())
}

/// Replace a field's value with a single-element array containing it.
/// Wrapping an absent field leaves the object untouched.
pub fn wrap<T: TreeNode>(node: &mut T, name: &str) -> Result<()> {
    let fields = node.fields_mut()?;
    if let Some(value) = fields.get_mut(name) {
        let inner = std::mem::replace(value, T::null());
        *value = T::singleton_array(inner);
    }
    Ok(())
}

/// Move field `target` out of the inner object `from` into the current
/// object. The moved field lands at the end; an already-present outer field
/// of the same name wins.
pub fn hoist<T: TreeNode>(node: &mut T, target: &str, from: &str) -> Result<()> {
    let fields = node.fields_mut()?;
    let moved = fields
        .get_mut(from)
        .ok_or_else(|| LensError::missing_node(from))?
        .fields_mut()?
        .shift_remove(target);
    if let Some(value) = moved {
        fields.entry(target.to_string()).or_insert(value);
    }
    Ok(())
}

/// Move field `target` into the inner object `to`, creating `to` as an
/// empty object when absent. An existing non-object destination is a
/// structural error, raised before anything moves.
pub fn plunge<T: TreeNode>(node: &mut T, target: &str, to: &str) -> Result<()> {
    let fields = node.fields_mut()?;
    match fields.get(to).map(TreeNode::kind) {
        Some(kind) if kind != NodeKind::Object => {
            return Err(LensError::kind_mismatch(NodeKind::Object, kind));
        }
        Some(_) => {}
        None => {
            fields.insert(to.to_string(), T::empty_object());
        }
    }
    let moved = fields.shift_remove(target);
    if let (Some(value), Some(dest)) = (moved, fields.get_mut(to)) {
        dest.fields_mut()?.entry(target.to_string()).or_insert(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_json(value)
    }

    fn field_names(node: &Document) -> Vec<&str> {
        node.fields()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn rename_keeps_field_order() {
        let mut node = doc(json!({"a": 1, "b": 2, "c": 3}));
        rename(&mut node, "b", "renamed").unwrap();
        assert_eq!(field_names(&node), vec!["a", "renamed", "c"]);
        assert_eq!(node, doc(json!({"a": 1, "renamed": 2, "c": 3})));
    }

    #[test]
    fn rename_of_absent_field_is_a_no_op() {
        let mut node = doc(json!({"a": 1}));
        rename(&mut node, "missing", "b").unwrap();
        assert_eq!(node, doc(json!({"a": 1})));
    }

    #[test]
    fn rename_requires_an_object() {
        let mut node = doc(json!([1, 2]));
        let err = rename(&mut node, "a", "b").unwrap_err();
        assert!(matches!(err, LensError::StructuralType(_)));
    }

    #[test]
    fn copy_only_writes_an_absent_destination() {
        let mut node = doc(json!({"a": 1, "b": 2}));
        copy(&mut node, "a", "b").unwrap();
        assert_eq!(node, doc(json!({"a": 1, "b": 2})));

        copy(&mut node, "a", "c").unwrap();
        assert_eq!(node, doc(json!({"a": 1, "b": 2, "c": 1})));
    }

    #[test]
    fn wrap_then_head_restores_the_value() {
        let mut node = doc(json!({"tags": "premium"}));
        wrap(&mut node, "tags").unwrap();
        assert_eq!(node, doc(json!({"tags": ["premium"]})));

        head(&mut node, "tags").unwrap();
        assert_eq!(node, doc(json!({"tags": "premium"})));
    }

    #[test]
    fn head_of_an_empty_array_leaves_null() {
        let mut node = doc(json!({"tags": []}));
        head(&mut node, "tags").unwrap();
        assert_eq!(node, doc(json!({"tags": null})));
    }

    #[test]
    fn head_requires_an_array_field() {
        let mut node = doc(json!({"tags": "scalar"}));
        assert!(head(&mut node, "tags").is_err());
        let mut node = doc(json!({}));
        assert!(head(&mut node, "tags").is_err());
    }

    #[test]
    fn hoist_moves_a_field_out_of_an_inner_object() {
        let mut node = doc(json!({"o": {"x": 1, "y": 2}}));
        hoist(&mut node, "x", "o").unwrap();
        assert_eq!(node, doc(json!({"o": {"y": 2}, "x": 1})));
    }

    #[test]
    fn plunge_creates_the_destination_when_absent() {
        let mut node = doc(json!({"x": 1}));
        plunge(&mut node, "x", "o").unwrap();
        assert_eq!(node, doc(json!({"o": {"x": 1}})));
    }

    #[test]
    fn plunge_rejects_a_non_object_destination() {
        let mut node = doc(json!({"x": 1, "o": "scalar"}));
        let err = plunge(&mut node, "x", "o").unwrap_err();
        assert!(matches!(err, LensError::StructuralType(_)));
        // nothing moved
        assert_eq!(node, doc(json!({"x": 1, "o": "scalar"})));
    }

    #[test]
    fn hoist_undoes_plunge() {
        let original = doc(json!({"o": {"x": 1}}));
        let mut node = original.clone();
        hoist(&mut node, "x", "o").unwrap();
        assert_eq!(node, doc(json!({"o": {}, "x": 1})));
        plunge(&mut node, "x", "o").unwrap();
        assert_eq!(node, original);
    }
}
