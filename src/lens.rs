//! A lens: a directed, reversible migration between two schema versions

use crate::graph::VersionId;
use crate::op::Operation;

/// A declared migration from one schema version to another
///
/// A lens is an edge in the version graph: applying `operations` in order
/// turns a document valid under `source` into one valid under
/// `destination`. The derived [`reverse`](Lens::reverse) turns it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Lens {
    pub source: VersionId,
    pub destination: VersionId,
    pub operations: Vec<Operation>,
}

impl Lens {
    pub fn new(
        source: impl Into<VersionId>,
        destination: impl Into<VersionId>,
        operations: Vec<Operation>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            operations,
        }
    }

    /// The opposite migration: direction swapped, every step reversed, and
    /// the step order reversed.
    pub fn reverse(&self) -> Lens {
        Lens {
            source: self.destination.clone(),
            destination: self.source.clone(),
            operations: self.operations.iter().map(Operation::reverse).rev().collect(),
        }
    }
}
