//! Lenswork
//!
//! A bidirectional schema evolution engine: documents produced under one
//! schema version are transformed into any other registered version (and
//! back) through declared, reversible structural edits called lenses.
//!
//! ## Features
//!
//! - **Reversible Operations**: eleven structural edits, each with a derived
//!   reverse; a lens declared in one direction serves both
//! - **Admission-Time Validation**: the full migration history is replayed
//!   against a synthetic shape document before a lens joins the graph, so
//!   inconsistent migrations never reach real traffic
//! - **Shortest-Path Resolution**: any two registered versions are bridged
//!   by concatenating the lenses along a breadth-first shortest path
//! - **Exact Numeric Kinds**: documents keep their 32/64-bit integer and
//!   single/double float representations across round trips
//!
//! ## Architecture
//!
//! ```text
//! LensBuilder ── build ──> Lens ── register ──> VersionGraph
//!                                                    │
//!                                   (validate::check on the full history)
//!                                                    │
//! Document ←── transform::apply ←── lens_from_to(a, b)
//! ```
//!
//! The graph is assembled once during configuration and is immutable
//! afterwards; resolution and transformation are pure functions over their
//! inputs.
//!
//! ## Example
//!
//! ```
//! use lenswork::{transform, Document, LensBuilder, Scalar, TypeTag, VersionGraph};
//! use serde_json::json;
//!
//! let root = LensBuilder::root("1.0")
//!     .add("user_id", TypeTag::Text, Some(Scalar::from("")))
//!     .build();
//! let mut graph = VersionGraph::new(root)?;
//! graph.register(LensBuilder::new("1.0", "1.1").rename("user_id", "id").build())?;
//!
//! let ops = graph.lens_from_to("1.0", "1.1")?;
//! let doc = transform::apply(Document::from_json(json!({"user_id": "42"})), &ops)?;
//! assert_eq!(doc.to_json(), json!({"id": "42"}));
//! # Ok::<(), lenswork::LensError>(())
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod graph;
pub mod lens;
pub mod op;
pub mod shape;
pub mod transform;
pub mod tree;
pub mod validate;

pub use builder::{LensBuilder, OperationsBuilder};
pub use document::{Document, NodeKind, Number, Scalar};
pub use error::{LensError, Result};
pub use graph::{VersionGraph, VersionId, EMPTY_VERSION};
pub use lens::Lens;
pub use op::{NestedReversal, Operation, TypeConversion, TypeTag, TypedMapping, NESTED_REVERSAL};
pub use shape::Shape;
pub use tree::TreeNode;
