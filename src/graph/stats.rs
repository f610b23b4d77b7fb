//! Summary counts for an assessment graph, used in build reports and `inspect`.

use std::fmt;

use petgraph::Direction;
use serde::{Deserialize, Serialize};

use super::{AssessmentGraph, GraphKind, NodeKind};

/// Node and edge counts of one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub kind: GraphKind,
    pub students: usize,
    pub questions: usize,
    pub concepts: usize,
    pub edges: usize,
    /// Nodes with neither incoming nor outgoing edges.
    pub isolated: usize,
}

impl GraphStats {
    pub fn of(graph: &AssessmentGraph) -> Self {
        let g = graph.graph();
        let mut stats = Self {
            kind: graph.kind(),
            students: 0,
            questions: 0,
            concepts: 0,
            edges: g.edge_count(),
            isolated: 0,
        };

        for idx in g.node_indices() {
            match g[idx].kind {
                NodeKind::Student => stats.students += 1,
                NodeKind::Question => stats.questions += 1,
                NodeKind::Concept => stats.concepts += 1,
            }
            let no_out = g.neighbors_directed(idx, Direction::Outgoing).next().is_none();
            let no_in = g.neighbors_directed(idx, Direction::Incoming).next().is_none();
            if no_out && no_in {
                stats.isolated += 1;
            }
        }
        stats
    }

    pub fn nodes(&self) -> usize {
        self.students + self.questions + self.concepts
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} nodes ({} students, {} questions, {} concepts), {} edges, {} isolated",
            self.kind,
            self.nodes(),
            self.students,
            self.questions,
            self.concepts,
            self.edges,
            self.isolated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeData;

    #[test]
    fn counts_by_kind_and_isolated() {
        let mut g = AssessmentGraph::new(GraphKind::Relation);
        let qa = g.upsert_node(NodeKind::Question, "Qa");
        g.upsert_node(NodeKind::Question, "Qb");
        let c1 = g.upsert_node(NodeKind::Concept, "C1");
        g.upsert_edge(qa, c1, EdgeData::PLAIN);

        let stats = g.stats();
        assert_eq!(stats.questions, 2);
        assert_eq!(stats.concepts, 1);
        assert_eq!(stats.students, 0);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.isolated, 1);
        assert_eq!(stats.nodes(), 3);
        assert!(stats.to_string().starts_with("GR: 3 nodes"));
    }
}
