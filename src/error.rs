//! Error types for the lens engine

use thiserror::Error;

use crate::document::NodeKind;
use crate::graph::VersionId;
use crate::op::TypeTag;

/// Result type for lens operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Lens engine errors
#[derive(Error, Debug)]
pub enum LensError {
    /// A lens failed admission-time validation. The registration that raised
    /// this error left the version graph unchanged.
    #[error("invalid lens configuration: {0}")]
    Configuration(String),

    #[error("unknown schema version: {0}")]
    UnknownVersion(VersionId),

    #[error("no migration path from '{from}' to '{to}'")]
    PathNotFound { from: VersionId, to: VersionId },

    /// The document handed to the transformation engine does not have the
    /// shape its declared version promises. Never retried or coerced.
    #[error("document shape mismatch: {0}")]
    StructuralType(String),

    #[error("type {0} is not supported for value conversion")]
    UnsupportedType(TypeTag),
}

impl LensError {
    /// Structural error for a node of the wrong kind.
    pub(crate) fn kind_mismatch(expected: NodeKind, found: NodeKind) -> Self {
        LensError::StructuralType(format!("expected {expected} node, found {found}"))
    }

    /// Structural error for a field that is not present at all.
    pub(crate) fn missing_node(field: &str) -> Self {
        LensError::StructuralType(format!("field '{field}' is missing"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_problem() {
        let err = LensError::kind_mismatch(NodeKind::Object, NodeKind::Array);
        assert_eq!(
            err.to_string(),
            "document shape mismatch: expected object node, found array"
        );

        let err = LensError::PathNotFound {
            from: "1.0".to_string(),
            to: "2.0".to_string(),
        };
        assert_eq!(err.to_string(), "no migration path from '1.0' to '2.0'");
    }
}
