//! In-memory assessment graph with an identity index.
//!
//! Uses `petgraph` for the graph structure and a `HashMap` from [`NodeKey`] to
//! `NodeIndex` so repeated insertions of the same node are no-ops.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::{EdgeData, GraphKind, GraphStats, NodeKey, NodeKind};

/// Directed graph whose nodes are [`NodeKey`]s and whose edges carry [`EdgeData`].
///
/// At most one edge exists per ordered node pair; upserting an existing pair
/// replaces its attributes.
#[derive(Clone)]
pub struct AssessmentGraph {
    kind: GraphKind,
    graph: DiGraph<NodeKey, EdgeData>,
    /// NodeKey → NodeIndex mapping for O(1) node lookups.
    node_index: HashMap<NodeKey, NodeIndex>,
}

impl AssessmentGraph {
    /// Create a new empty graph.
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            graph: DiGraph::new(),
            node_index: HashMap::new(),
        }
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Ensure a node exists for the given key, returning its index.
    pub fn upsert_node(&mut self, kind: NodeKind, id: &str) -> NodeIndex {
        let key = NodeKey::new(kind, id);
        if let Some(idx) = self.node_index.get(&key) {
            return *idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.node_index.insert(key, idx);
        idx
    }

    /// Add `source → target`, or overwrite the attributes of the existing edge.
    pub fn upsert_edge(&mut self, source: NodeIndex, target: NodeIndex, data: EdgeData) -> EdgeIndex {
        self.graph.update_edge(source, target, data)
    }

    pub fn has_node(&self, kind: NodeKind, id: &str) -> bool {
        self.node_index.contains_key(&NodeKey::new(kind, id))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Attributes of the edge `source → target`, if present.
    pub fn edge(&self, source: &NodeKey, target: &NodeKey) -> Option<&EdgeData> {
        let s = *self.node_index.get(source)?;
        let t = *self.node_index.get(target)?;
        let e = self.graph.find_edge(s, t)?;
        self.graph.edge_weight(e)
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeKey> {
        self.graph.node_weights()
    }

    /// All edges as `(source, target, attributes)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeKey, &NodeKey, &EdgeData)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    /// Incoming plus outgoing edges of the node; a self-loop counts once each way.
    pub fn degree(&self, key: &NodeKey) -> usize {
        self.node_index
            .get(key)
            .map(|&idx| {
                self.graph.edges_directed(idx, Direction::Outgoing).count()
                    + self.graph.edges_directed(idx, Direction::Incoming).count()
            })
            .unwrap_or(0)
    }

    /// Borrow the underlying petgraph structure.
    pub fn graph(&self) -> &DiGraph<NodeKey, EdgeData> {
        &self.graph
    }

    /// Order-independent structural value used for equality checks.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            kind: self.kind,
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|(s, t, d)| ((s.clone(), t.clone()), *d))
                .collect(),
        }
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats::of(self)
    }
}

impl std::fmt::Debug for AssessmentGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentGraph")
            .field("kind", &self.kind)
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// Node set, edge set and attributes of a graph, without insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub kind: GraphKind,
    pub nodes: BTreeSet<NodeKey>,
    pub edges: BTreeMap<(NodeKey, NodeKey), EdgeData>,
}
