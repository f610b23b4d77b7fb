//! Assessment graphs: typed directed graphs over students, questions and concepts.
//!
//! - **Graph** ([`AssessmentGraph`]): `petgraph` storage with idempotent node and
//!   edge upserts
//! - **Statistics** ([`GraphStats`]): node counts per kind, edges, isolated nodes
//!
//! Node identity is the pair ([`NodeKind`], identifier), so a student and a
//! question that share a literal identifier stay two distinct nodes.

pub mod index;
pub mod stats;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use index::{AssessmentGraph, GraphSnapshot};
pub use stats::GraphStats;

/// The `type` attribute of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Student,
    Question,
    Concept,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Question => "question",
            Self::Concept => "concept",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a node: its kind plus the identifier from the input tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub kind: NodeKind,
    pub id: String,
}

impl NodeKey {
    pub fn new(kind: NodeKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }

    pub fn student(id: impl Into<String>) -> Self {
        Self::new(NodeKind::Student, id)
    }

    pub fn question(id: impl Into<String>) -> Self {
        Self::new(NodeKind::Question, id)
    }

    pub fn concept(id: impl Into<String>) -> Self {
        Self::new(NodeKind::Concept, id)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Attributes stored on an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Correctness of the response; only interaction edges carry it.
    pub correct: Option<u8>,
}

impl EdgeData {
    /// An edge without attributes.
    pub const PLAIN: EdgeData = EdgeData { correct: None };

    pub fn response(correct: u8) -> Self {
        Self {
            correct: Some(correct),
        }
    }
}

/// Which of the three graphs a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphKind {
    /// Students → questions, with correctness.
    Interaction,
    /// Questions → concepts they exercise.
    Relation,
    /// Prerequisite concepts → dependent concepts.
    Dependency,
}

impl GraphKind {
    pub const ALL: [GraphKind; 3] = [Self::Interaction, Self::Relation, Self::Dependency];

    /// Conventional short name (`GI`, `GR`, `GD`).
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Interaction => "GI",
            Self::Relation => "GR",
            Self::Dependency => "GD",
        }
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
