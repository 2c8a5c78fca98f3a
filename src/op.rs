//! The operation model: the eleven reversible structural edits
//!
//! Every operation knows its own reverse, so a lens declared in one
//! direction serves both. `Add` and `Head` are lossy: their reverses restore
//! the shape of a document but not the information a forward application
//! discarded.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::{NodeKind, Scalar};
use crate::error::Result;

/// Declared type of a document field
///
/// Five kinds only; nullability is a property of values, not of declared
/// types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Text,
    Number,
    Boolean,
    Object,
    Array,
}

impl TypeTag {
    /// Whether this tag names a scalar kind.
    pub fn is_scalar(self) -> bool {
        matches!(self, TypeTag::Text | TypeTag::Number | TypeTag::Boolean)
    }

    /// The node kind a field of this declared type has at runtime.
    pub fn node_kind(self) -> NodeKind {
        match self {
            TypeTag::Text => NodeKind::Text,
            TypeTag::Number => NodeKind::Number,
            TypeTag::Boolean => NodeKind::Boolean,
            TypeTag::Object => NodeKind::Object,
            TypeTag::Array => NodeKind::Array,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Text => "text",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
        };
        write!(f, "{name}")
    }
}

/// Source and target type of a value conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeConversion {
    pub from: TypeTag,
    pub to: TypeTag,
}

impl TypeConversion {
    pub fn new(from: TypeTag, to: TypeTag) -> Self {
        Self { from, to }
    }

    pub fn reverse(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

/// A convert mapping function
pub type MappingFn = Arc<dyn Fn(Scalar) -> Result<Scalar> + Send + Sync>;

/// A mapping function bundled with its declared input and output types
///
/// The declared tags are what admission-time validation checks against the
/// surrounding [`TypeConversion`]; closures cannot be introspected, so the
/// caller states the contract explicitly.
#[derive(Clone)]
pub struct TypedMapping {
    pub input: TypeTag,
    pub output: TypeTag,
    func: MappingFn,
}

impl TypedMapping {
    pub fn new(
        input: TypeTag,
        output: TypeTag,
        func: impl Fn(Scalar) -> Result<Scalar> + Send + Sync + 'static,
    ) -> Self {
        Self {
            input,
            output,
            func: Arc::new(func),
        }
    }

    /// Run the mapping on a scalar value.
    pub fn call(&self, value: Scalar) -> Result<Scalar> {
        (self.func)(value)
    }
}

impl fmt::Debug for TypedMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedMapping")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("func", &"<fn>")
            .finish()
    }
}

impl PartialEq for TypedMapping {
    fn eq(&self, other: &Self) -> bool {
        self.input == other.input
            && self.output == other.output
            && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// How the operation lists nested inside `ApplyIn`/`ApplyMap` reverse
///
/// `Lens::reverse` reverses both the order of its steps and each step
/// itself. The system this engine interoperates with reverses nested lists
/// by order only, leaving each nested step as declared — an inconsistency
/// that downstream consumers currently depend on. [`NESTED_REVERSAL`] pins
/// the shipped behavior; `Elementwise` is the self-consistent alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedReversal {
    /// Reverse only the order of the nested operation list.
    OrderOnly,
    /// Reverse the order and each nested operation, like `Lens::reverse`.
    Elementwise,
}

/// The nested-reversal behavior used by [`Operation::reverse`].
pub const NESTED_REVERSAL: NestedReversal = NestedReversal::OrderOnly;

/// One atomic, reversible structural edit
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Move a field to a new key, keeping its position.
    Rename { from: String, to: String },
    /// Insert a field of the declared type, with the default or explicit null.
    Add {
        name: String,
        tag: TypeTag,
        default: Option<Scalar>,
    },
    /// Delete a field. Carries the type and default its reverse needs.
    Remove {
        name: String,
        tag: TypeTag,
        default: Option<Scalar>,
    },
    /// Duplicate a field into a new key, only if the destination is absent.
    Copy { from: String, to: String },
    /// Move field `target` out of the inner object `from` into the current one.
    Hoist { target: String, from: String },
    /// Move field `target` into the inner object `to`.
    Plunge { target: String, to: String },
    /// Replace a value with a single-element array containing it.
    Wrap { name: String },
    /// Replace an array with its first element.
    Head { name: String },
    /// Map a scalar field to a new value of another scalar type.
    Convert {
        name: String,
        mapping: TypedMapping,
        reverse_mapping: TypedMapping,
        conversion: TypeConversion,
    },
    /// Apply a nested sequence inside the object at `target`.
    ApplyIn { target: String, ops: Vec<Operation> },
    /// Apply a nested sequence to every element of the current array.
    ApplyMap { ops: Vec<Operation> },
}

impl Operation {
    /// The reverse edit, using the shipped [`NESTED_REVERSAL`] behavior for
    /// nested operation lists.
    pub fn reverse(&self) -> Operation {
        self.reverse_with(NESTED_REVERSAL)
    }

    /// The reverse edit with an explicit nested-reversal behavior.
    pub fn reverse_with(&self, nested: NestedReversal) -> Operation {
        match self {
            Operation::Rename { from, to } => Operation::Rename {
                from: to.clone(),
                to: from.clone(),
            },
            Operation::Add { name, tag, default } => Operation::Remove {
                name: name.clone(),
                tag: *tag,
                default: default.clone(),
            },
            Operation::Remove { name, tag, default } => Operation::Add {
                name: name.clone(),
                tag: *tag,
                default: default.clone(),
            },
            Operation::Copy { from, to } => Operation::Copy {
                from: to.clone(),
                to: from.clone(),
            },
            Operation::Hoist { target, from } => Operation::Plunge {
                target: target.clone(),
                to: from.clone(),
            },
            Operation::Plunge { target, to } => Operation::Hoist {
                target: target.clone(),
                from: to.clone(),
            },
            Operation::Wrap { name } => Operation::Head { name: name.clone() },
            Operation::Head { name } => Operation::Wrap { name: name.clone() },
            Operation::Convert {
                name,
                mapping,
                reverse_mapping,
                conversion,
            } => Operation::Convert {
                name: name.clone(),
                mapping: reverse_mapping.clone(),
                reverse_mapping: mapping.clone(),
                conversion: conversion.reverse(),
            },
            Operation::ApplyIn { target, ops } => Operation::ApplyIn {
                target: target.clone(),
                ops: reverse_nested(ops, nested),
            },
            Operation::ApplyMap { ops } => Operation::ApplyMap {
                ops: reverse_nested(ops, nested),
            },
        }
    }

    /// Whether the reverse of this edit cannot recover all original
    /// information. `Add` invents a default, `Head` discards every array
    /// element but the first.
    pub fn is_lossy(&self) -> bool {
        matches!(self, Operation::Add { .. } | Operation::Head { .. })
    }
}

fn reverse_nested(ops: &[Operation], nested: NestedReversal) -> Vec<Operation> {
    match nested {
        NestedReversal::OrderOnly => ops.iter().rev().cloned().collect(),
        NestedReversal::Elementwise => ops.iter().rev().map(|op| op.reverse_with(nested)).collect(),
    }
}
