//! Declarative configuration surface for building lenses
//!
//! A lens is declared as a `(source, destination)` pair plus a chain of
//! operation calls. Nested `apply_in`/`apply_map` blocks take a closure over
//! a fresh [`OperationsBuilder`].
//!
//! ```
//! use lenswork::{LensBuilder, TypeTag, Scalar};
//!
//! let lens = LensBuilder::new("1.0", "1.1")
//!     .rename("user_id", "id")
//!     .add("active", TypeTag::Boolean, Some(Scalar::from(true)))
//!     .build();
//! assert_eq!(lens.operations.len(), 2);
//! ```

use crate::document::Scalar;
use crate::graph::{VersionId, EMPTY_VERSION};
use crate::lens::Lens;
use crate::op::{Operation, TypeConversion, TypeTag, TypedMapping};

/// Builder for a bare operation sequence, used inside nested blocks
#[derive(Debug, Default)]
pub struct OperationsBuilder {
    ops: Vec<Operation>,
}

impl OperationsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.ops.push(Operation::Rename {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn add(mut self, name: impl Into<String>, tag: TypeTag, default: Option<Scalar>) -> Self {
        self.ops.push(Operation::Add {
            name: name.into(),
            tag,
            default,
        });
        self
    }

    pub fn remove(
        mut self,
        name: impl Into<String>,
        tag: TypeTag,
        default: Option<Scalar>,
    ) -> Self {
        self.ops.push(Operation::Remove {
            name: name.into(),
            tag,
            default,
        });
        self
    }

    pub fn copy(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.ops.push(Operation::Copy {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn hoist(mut self, target: impl Into<String>, from: impl Into<String>) -> Self {
        self.ops.push(Operation::Hoist {
            target: target.into(),
            from: from.into(),
        });
        self
    }

    pub fn plunge(mut self, target: impl Into<String>, to: impl Into<String>) -> Self {
        self.ops.push(Operation::Plunge {
            target: target.into(),
            to: to.into(),
        });
        self
    }

    pub fn wrap(mut self, name: impl Into<String>) -> Self {
        self.ops.push(Operation::Wrap { name: name.into() });
        self
    }

    pub fn head(mut self, name: impl Into<String>) -> Self {
        self.ops.push(Operation::Head { name: name.into() });
        self
    }

    pub fn convert(
        mut self,
        name: impl Into<String>,
        conversion: TypeConversion,
        mapping: TypedMapping,
        reverse_mapping: TypedMapping,
    ) -> Self {
        self.ops.push(Operation::Convert {
            name: name.into(),
            mapping,
            reverse_mapping,
            conversion,
        });
        self
    }

    pub fn apply_in(
        mut self,
        target: impl Into<String>,
        block: impl FnOnce(OperationsBuilder) -> OperationsBuilder,
    ) -> Self {
        self.ops.push(Operation::ApplyIn {
            target: target.into(),
            ops: block(OperationsBuilder::new()).build(),
        });
        self
    }

    pub fn apply_map(mut self, block: impl FnOnce(OperationsBuilder) -> OperationsBuilder) -> Self {
        self.ops.push(Operation::ApplyMap {
            ops: block(OperationsBuilder::new()).build(),
        });
        self
    }

    pub fn build(self) -> Vec<Operation> {
        self.ops
    }
}

/// Builder for a [`Lens`]
#[derive(Debug)]
pub struct LensBuilder {
    source: VersionId,
    destination: VersionId,
    ops: OperationsBuilder,
}

impl LensBuilder {
    pub fn new(source: impl Into<VersionId>, destination: impl Into<VersionId>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ops: OperationsBuilder::new(),
        }
    }

    /// Builder for an origin lens, starting at the reserved `"empty"`
    /// version.
    pub fn root(version: impl Into<VersionId>) -> Self {
        Self::new(EMPTY_VERSION, version)
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.ops = self.ops.rename(from, to);
        self
    }

    pub fn add(mut self, name: impl Into<String>, tag: TypeTag, default: Option<Scalar>) -> Self {
        self.ops = self.ops.add(name, tag, default);
        self
    }

    pub fn remove(
        mut self,
        name: impl Into<String>,
        tag: TypeTag,
        default: Option<Scalar>,
    ) -> Self {
        self.ops = self.ops.remove(name, tag, default);
        self
    }

    pub fn copy(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.ops = self.ops.copy(from, to);
        self
    }

    pub fn hoist(mut self, target: impl Into<String>, from: impl Into<String>) -> Self {
        self.ops = self.ops.hoist(target, from);
        self
    }

    pub fn plunge(mut self, target: impl Into<String>, to: impl Into<String>) -> Self {
        self.ops = self.ops.plunge(target, to);
        self
    }

    pub fn wrap(mut self, name: impl Into<String>) -> Self {
        self.ops = self.ops.wrap(name);
        self
    }

    pub fn head(mut self, name: impl Into<String>) -> Self {
        self.ops = self.ops.head(name);
        self
    }

    pub fn convert(
        mut self,
        name: impl Into<String>,
        conversion: TypeConversion,
        mapping: TypedMapping,
        reverse_mapping: TypedMapping,
    ) -> Self {
        self.ops = self.ops.convert(name, conversion, mapping, reverse_mapping);
        self
    }

    pub fn apply_in(
        mut self,
        target: impl Into<String>,
        block: impl FnOnce(OperationsBuilder) -> OperationsBuilder,
    ) -> Self {
        self.ops = self.ops.apply_in(target, block);
        self
    }

    pub fn apply_map(mut self, block: impl FnOnce(OperationsBuilder) -> OperationsBuilder) -> Self {
        self.ops = self.ops.apply_map(block);
        self
    }

    pub fn build(self) -> Lens {
        Lens::new(self.source, self.destination, self.ops.build())
    }
}
