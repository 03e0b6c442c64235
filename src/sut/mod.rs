// SUT data model shared by the generators, metrics and I/O shells

pub mod export;
pub mod format;
pub mod loader;

pub use export::{export_dot, render_to_png, write_dot};
pub use format::to_text;
pub use loader::{load_from_path, LoadError};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Control-flow model graph: vertices carry their text label
pub type ModelGraph = DiGraph<String, ()>;

/// Vertex identifier within a model
pub type VertexId = NodeIndex;

/// Constraint classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// The ordered pair must occur in some test path
    Positive,
    /// The ordered pair must occur in exactly one test path
    Once,
    /// The ordered pair must not occur in any test path
    Negative,
    /// The ordered pair may occur in at most one test path
    MaxOnce,
}

impl ConstraintKind {
    /// Keyword used in the SUT text format
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Positive => "POSITIVE",
            ConstraintKind::Once => "ONCE",
            ConstraintKind::Negative => "NEGATIVE",
            ConstraintKind::MaxOnce => "MAX_ONCE",
        }
    }
}

impl FromStr for ConstraintKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POSITIVE" => Ok(ConstraintKind::Positive),
            "ONCE" => Ok(ConstraintKind::Once),
            "NEGATIVE" => Ok(ConstraintKind::Negative),
            "MAX_ONCE" => Ok(ConstraintKind::MaxOnce),
            _ => Err(()),
        }
    }
}

/// Ordered vertex-pair constraint on the generated test paths
///
/// Immutable once created; refers to vertices of the owning [`Sut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub from: VertexId,
    pub to: VertexId,
    pub kind: ConstraintKind,
}

/// System Under Test: a simple directed graph plus start vertex,
/// end-vertex set and an ordered constraint list.
///
/// Built by the loader (or programmatic setup), then treated as read-only
/// by the generators and the metrics. Nothing here is mutated during
/// generation.
#[derive(Debug, Clone, Default)]
pub struct Sut {
    graph: ModelGraph,
    index: HashMap<String, VertexId>,
    start: Option<VertexId>,
    ends: HashSet<VertexId>,
    constraints: Vec<Constraint>,
}

impl Sut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex by label. Idempotent: an existing label returns its id.
    pub fn add_vertex(&mut self, label: &str) -> VertexId {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = self.graph.add_node(label.to_string());
        self.index.insert(label.to_string(), id);
        id
    }

    /// Designate the start vertex, inserting it if necessary
    pub fn set_start(&mut self, label: &str) -> VertexId {
        let id = self.add_vertex(label);
        self.start = Some(id);
        id
    }

    /// Add a vertex to the end set, inserting it if necessary
    pub fn add_end(&mut self, label: &str) -> VertexId {
        let id = self.add_vertex(label);
        self.ends.insert(id);
        id
    }

    /// Add a directed edge, inserting both endpoints
    ///
    /// The graph stays simple: duplicate ordered pairs and self-loops are
    /// rejected. Returns whether an edge was actually inserted.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let u = self.add_vertex(from);
        let v = self.add_vertex(to);
        if self.graph.find_edge(u, v).is_some() {
            return false;
        }
        self.graph.add_edge(u, v, ());
        true
    }

    /// Register a constraint between two existing vertices
    ///
    /// Returns false (and registers nothing) if either label is unknown.
    pub fn add_constraint(&mut self, from: &str, to: &str, kind: ConstraintKind) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&from), Some(&to)) => {
                self.constraints.push(Constraint { from, to, kind });
                true
            }
            _ => false,
        }
    }

    pub fn graph(&self) -> &ModelGraph {
        &self.graph
    }

    pub fn start(&self) -> Option<VertexId> {
        self.start
    }

    pub fn ends(&self) -> &HashSet<VertexId> {
        &self.ends
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Look up a vertex id by label
    pub fn vertex(&self, label: &str) -> Option<VertexId> {
        self.index.get(label).copied()
    }

    /// Label of a vertex
    pub fn label(&self, v: VertexId) -> &str {
        &self.graph[v]
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges in insertion order
    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    /// Endpoints of an edge
    pub fn edge_endpoints(&self, e: EdgeIndex) -> Option<(VertexId, VertexId)> {
        self.graph.edge_endpoints(e)
    }

    /// Look up an edge by its endpoints
    pub fn edge_between(&self, u: VertexId, v: VertexId) -> Option<EdgeIndex> {
        self.graph.find_edge(u, v)
    }

    /// Successors of a vertex in edge-insertion order
    ///
    /// The petgraph walker yields the most recently added edge first, so the
    /// collected list is reversed to restore insertion order.
    pub fn outgoing(&self, v: VertexId) -> Vec<VertexId> {
        let mut next: Vec<_> = self.graph.neighbors_directed(v, Direction::Outgoing).collect();
        next.reverse();
        next
    }

    /// Predecessors of a vertex in edge-insertion order
    pub fn incoming(&self, v: VertexId) -> Vec<VertexId> {
        let mut prev: Vec<_> = self.graph.neighbors_directed(v, Direction::Incoming).collect();
        prev.reverse();
        prev
    }

    /// Labels of a path, in order
    pub fn path_labels(&self, path: &[VertexId]) -> Vec<&str> {
        path.iter().map(|&v| self.label(v)).collect()
    }

    /// Render a path as `[a, b, c]`
    pub fn path_to_string(&self, path: &[VertexId]) -> String {
        format!("[{}]", self.path_labels(path).join(", "))
    }

    /// Render a constraint as `[from → to : KIND]`
    pub fn constraint_to_string(&self, c: &Constraint) -> String {
        format!(
            "[{} → {} : {}]",
            self.label(c.from),
            self.label(c.to),
            c.kind.as_str()
        )
    }
}

impl fmt::Display for Sut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constraints: Vec<String> = self
            .constraints
            .iter()
            .map(|c| self.constraint_to_string(c))
            .collect();
        let mut ends: Vec<&str> = self.ends.iter().map(|&v| self.label(v)).collect();
        ends.sort_unstable();
        write!(
            f,
            "SUT{{vertices={}, edges={}, constraints=[{}], start={}, ends={{{}}}}}",
            self.vertex_count(),
            self.edge_count(),
            constraints.join(", "),
            self.start.map_or("-", |v| self.label(v)),
            ends.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_edge_chain() -> Sut {
        let mut sut = Sut::new();
        sut.set_start("START");
        sut.add_edge("START", "A");
        sut.add_edge("A", "END1");
        sut.add_end("END1");
        sut
    }

    #[test]
    fn test_add_vertex_idempotent() {
        let mut sut = Sut::new();
        let a = sut.add_vertex("A");
        let b = sut.add_vertex("A");
        assert_eq!(a, b);
        assert_eq!(sut.vertex_count(), 1);
    }

    #[test]
    fn test_add_edge_inserts_endpoints() {
        let mut sut = Sut::new();
        assert!(sut.add_edge("A", "B"));
        assert_eq!(sut.vertex_count(), 2);
        assert_eq!(sut.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let mut sut = Sut::new();
        assert!(sut.add_edge("A", "B"));
        assert!(!sut.add_edge("A", "B"));
        assert_eq!(sut.edge_count(), 1);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut sut = Sut::new();
        assert!(!sut.add_edge("A", "A"));
        assert_eq!(sut.edge_count(), 0);
    }

    #[test]
    fn test_constraint_requires_known_vertices() {
        let mut sut = two_edge_chain();
        assert!(sut.add_constraint("START", "A", ConstraintKind::Positive));
        assert!(!sut.add_constraint("START", "GHOST", ConstraintKind::Negative));
        assert_eq!(sut.constraints().len(), 1);
    }

    #[test]
    fn test_outgoing_in_insertion_order() {
        let mut sut = Sut::new();
        sut.add_edge("S", "A");
        sut.add_edge("S", "B");
        sut.add_edge("S", "C");
        let s = sut.vertex("S").unwrap();
        let labels: Vec<&str> = sut.outgoing(s).iter().map(|&v| sut.label(v)).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_incoming_in_insertion_order() {
        let mut sut = Sut::new();
        sut.add_edge("A", "T");
        sut.add_edge("B", "T");
        let t = sut.vertex("T").unwrap();
        let labels: Vec<&str> = sut.incoming(t).iter().map(|&v| sut.label(v)).collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn test_edge_between() {
        let sut = two_edge_chain();
        let s = sut.vertex("START").unwrap();
        let a = sut.vertex("A").unwrap();
        assert!(sut.edge_between(s, a).is_some());
        assert!(sut.edge_between(a, s).is_none());
    }

    #[test]
    fn test_constraint_kind_round_trip() {
        for kind in [
            ConstraintKind::Positive,
            ConstraintKind::Once,
            ConstraintKind::Negative,
            ConstraintKind::MaxOnce,
        ] {
            assert_eq!(kind.as_str().parse::<ConstraintKind>(), Ok(kind));
        }
        assert!("SOMETIMES".parse::<ConstraintKind>().is_err());
    }

    #[test]
    fn test_display() {
        let mut sut = two_edge_chain();
        sut.add_constraint("START", "A", ConstraintKind::Negative);
        let text = format!("{}", sut);
        assert!(text.contains("vertices=3"));
        assert!(text.contains("edges=2"));
        assert!(text.contains("[START → A : NEGATIVE]"));
        assert!(text.contains("start=START"));
        assert!(text.contains("ends={END1}"));
    }
}
