//! Export types for serializing graphs as JSON.
//!
//! These types give a human-readable view of a stored graph, with each node's
//! `type` attribute spelled out, suitable for `gcd-graphs inspect --json`.

use serde::{Deserialize, Serialize};

use crate::graph::{AssessmentGraph, GraphStats};

/// Exported node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExport {
    /// Identifier from the input tables.
    pub id: String,
    /// Node type: student, question or concept.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Exported edge with both endpoints resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    pub source: NodeExport,
    pub target: NodeExport,
    /// Correctness flag, present on interaction edges only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correct: Option<u8>,
}

/// Exported graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    /// Short graph name (GI, GR, GD).
    pub graph: String,
    pub stats: GraphStats,
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
}

impl From<&AssessmentGraph> for GraphExport {
    fn from(graph: &AssessmentGraph) -> Self {
        let node = |key: &crate::graph::NodeKey| NodeExport {
            id: key.id.clone(),
            kind: key.kind.to_string(),
        };
        Self {
            graph: graph.kind().short_name().to_string(),
            stats: graph.stats(),
            nodes: graph.nodes().map(node).collect(),
            edges: graph
                .edges()
                .map(|(s, t, d)| EdgeExport {
                    source: node(s),
                    target: node(t),
                    correct: d.correct,
                })
                .collect(),
        }
    }
}

/// Render a graph as pretty-printed JSON.
pub fn to_json(graph: &AssessmentGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&GraphExport::from(graph))
}
