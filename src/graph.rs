//! The version graph
//!
//! Vertices are schema version identifiers; every admitted lens is stored
//! as two directed edges (the declared lens and its derived reverse),
//! indexed by their `(source, destination)` pairs. The graph is built
//! during a single-threaded configuration phase — an origin lens followed
//! by any number of registrations — and is read-only afterwards: queries
//! take `&self`, so a frozen graph can be shared behind an `Arc` with no
//! locking.
//!
//! Path resolution is a plain breadth-first search: every edge has unit
//! cost, so BFS already yields a shortest path.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use crate::error::{LensError, Result};
use crate::lens::Lens;
use crate::op::Operation;
use crate::validate;

/// Opaque schema version label
pub type VersionId = String;

/// Reserved version identifier for the zero-field origin schema. The first
/// lens admitted to a graph must originate here.
pub const EMPTY_VERSION: &str = "empty";

/// The bidirectional graph of admitted schema migrations
#[derive(Debug)]
pub struct VersionGraph {
    adjacency: HashMap<VersionId, Vec<VersionId>>,
    lenses: HashMap<(VersionId, VersionId), Lens>,
}

impl VersionGraph {
    /// Build a graph from its origin lens.
    ///
    /// The origin must start at [`EMPTY_VERSION`] and is validated like any
    /// other admission — against the empty schema it claims to extend.
    pub fn new(root: Lens) -> Result<Self> {
        if root.source != EMPTY_VERSION {
            return Err(LensError::Configuration(format!(
                "the first lens must originate at the '{EMPTY_VERSION}' version, not '{}'",
                root.source
            )));
        }
        validate::check(&root.operations)?;

        let mut graph = Self {
            adjacency: HashMap::new(),
            lenses: HashMap::new(),
        };
        graph.admit(root);
        Ok(graph)
    }

    /// Admit a lens into the graph.
    ///
    /// The lens source must already be a known version. Registering an edge
    /// that already exists is a no-op. Otherwise the full operation history
    /// from [`EMPTY_VERSION`] to the lens source, concatenated with the new
    /// operations, is validated; only on success do the destination vertex
    /// and both directed edges appear. Admission is all-or-nothing: a
    /// failed registration leaves the graph untouched.
    pub fn register(&mut self, lens: Lens) -> Result<()> {
        if !self.contains(&lens.source) {
            return Err(LensError::UnknownVersion(lens.source.clone()));
        }
        if self
            .lenses
            .contains_key(&(lens.source.clone(), lens.destination.clone()))
        {
            return Ok(());
        }

        let mut history = self.lens_from_to(EMPTY_VERSION, &lens.source)?;
        history.extend(lens.operations.iter().cloned());
        validate::check(&history)?;

        self.admit(lens);
        Ok(())
    }

    /// Whether a version is a known vertex.
    pub fn contains(&self, version: &str) -> bool {
        self.adjacency.contains_key(version)
    }

    /// All known versions, sorted.
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.adjacency.keys().map(String::as_str).collect();
        versions.sort_unstable();
        versions
    }

    /// Number of directed edges (two per admitted lens).
    pub fn edge_count(&self) -> usize {
        self.lenses.len()
    }

    /// Resolve the single operation sequence that migrates a document from
    /// one version to another, concatenating the operations of every hop on
    /// a shortest path.
    pub fn lens_from_to(&self, from: &str, to: &str) -> Result<Vec<Operation>> {
        if !self.contains(from) {
            return Err(LensError::UnknownVersion(from.to_string()));
        }
        if !self.contains(to) {
            return Err(LensError::UnknownVersion(to.to_string()));
        }

        let path = self
            .shortest_path(from, to)
            .ok_or_else(|| LensError::PathNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        trace!(?path, "resolved migration path");

        let mut ops = Vec::new();
        for hop in path.windows(2) {
            let lens = self
                .lenses
                .get(&(hop[0].clone(), hop[1].clone()))
                .ok_or_else(|| {
                    LensError::Configuration(format!(
                        "missing lens for admitted edge '{}' -> '{}'",
                        hop[0], hop[1]
                    ))
                })?;
            ops.extend(lens.operations.iter().cloned());
        }
        Ok(ops)
    }

    fn admit(&mut self, lens: Lens) {
        debug!(
            source = %lens.source,
            destination = %lens.destination,
            ops = lens.operations.len(),
            "admitting lens"
        );
        let reverse = lens.reverse();
        self.adjacency
            .entry(lens.source.clone())
            .or_default()
            .push(lens.destination.clone());
        self.adjacency
            .entry(lens.destination.clone())
            .or_default()
            .push(lens.source.clone());
        self.lenses
            .insert((reverse.source.clone(), reverse.destination.clone()), reverse);
        self.lenses
            .insert((lens.source.clone(), lens.destination.clone()), lens);
    }

    fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<VersionId>> {
        if from == to {
            return Some(vec![from.to_string()]);
        }

        let mut predecessor: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::from([from]);
        let mut queue: VecDeque<&str> = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            let Some(neighbors) = self.adjacency.get(current) else {
                continue;
            };
            for next in neighbors {
                if !visited.insert(next.as_str()) {
                    continue;
                }
                predecessor.insert(next.as_str(), current);
                if next == to {
                    let mut path = vec![next.as_str()];
                    let mut node = next.as_str();
                    while let Some(&prev) = predecessor.get(node) {
                        path.push(prev);
                        node = prev;
                    }
                    path.reverse();
                    return Some(path.into_iter().map(String::from).collect());
                }
                queue.push_back(next.as_str());
            }
        }
        None
    }
}
