//! Runtime transformation engine
//!
//! Applies a resolved operation sequence to a real document. Validation here
//! is minimal by design — sequences handed to this engine were already
//! checked against the schema history at admission time — but a document
//! whose shape does not match still fails loudly with a structural error
//! rather than being silently corrupted.
//!
//! The engine owns the document for the duration of the call and may mutate
//! it before an error surfaces; callers that need atomicity keep a clone.

use crate::document::Document;
use crate::error::{LensError, Result};
use crate::op::{Operation, TypeTag};
use crate::tree::{self, TreeNode};

/// Apply an operation sequence to a document, returning the transformed
/// tree.
pub fn apply(document: Document, ops: &[Operation]) -> Result<Document> {
    let mut document = document;
    apply_ops(&mut document, ops)?;
    Ok(document)
}

fn apply_ops(node: &mut Document, ops: &[Operation]) -> Result<()> {
    for op in ops {
        apply_op(node, op)?;
    }
    Ok(())
}

fn apply_op(node: &mut Document, op: &Operation) -> Result<()> {
    match op {
        Operation::Rename { from, to } => tree::rename(node, from, to),

        Operation::Add { name, tag, default } => {
            let value = match tag {
                TypeTag::Object => Document::object(),
                TypeTag::Array => Document::Array(Vec::new()),
                _ => default
                    .clone()
                    .map(Document::from)
                    .unwrap_or(Document::Null),
            };
            node.fields_mut()?.insert(name.clone(), value);
            Ok(())
        }

        Operation::Remove { name, .. } => {
            node.fields_mut()?.shift_remove(name);
            Ok(())
        }

        Operation::Copy { from, to } => tree::copy(node, from, to),
        Operation::Hoist { target, from } => tree::hoist(node, target, from),
        Operation::Plunge { target, to } => tree::plunge(node, target, to),
        Operation::Wrap { name } => tree::wrap(node, name),
        Operation::Head { name } => tree::head(node, name),

        Operation::Convert {
            name,
            mapping,
            conversion,
            ..
        } => {
            let fields = node.fields_mut()?;
            let value = fields
                .get_mut(name)
                .ok_or_else(|| LensError::missing_node(name))?;
            let scalar = value.to_scalar(conversion.from)?;
            let mapped = mapping.call(scalar)?;
            if mapped.tag() != conversion.to {
                return Err(LensError::kind_mismatch(
                    conversion.to.node_kind(),
                    mapped.tag().node_kind(),
                ));
            }
            *value = Document::from(mapped);
            Ok(())
        }

        Operation::ApplyIn { target, ops } => {
            let child = node
                .fields_mut()?
                .get_mut(target)
                .ok_or_else(|| LensError::missing_node(target))?;
            apply_ops(child, ops)
        }

        Operation::ApplyMap { ops } => {
            for item in node.items_mut()? {
                apply_ops(item, ops)?;
            }
            Ok(())
        }
    }
}
