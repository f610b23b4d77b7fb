//! Graph assembler: derive the interaction, relation and dependency graphs
//! from loaded tables.
//!
//! Every function here is pure. A matrix cell creates an edge only when it is
//! numerically equal to 1; anything else is the no-edge case, never an error.

use crate::graph::{AssessmentGraph, EdgeData, GraphKind, NodeKind};
use crate::table::{IndicatorMatrix, ResponseTable, Tables, is_indicator};

/// The three graphs of one build.
#[derive(Debug, Clone)]
pub struct GraphSet {
    pub interaction: AssessmentGraph,
    pub relation: AssessmentGraph,
    pub dependency: AssessmentGraph,
}

impl GraphSet {
    pub fn get(&self, kind: GraphKind) -> &AssessmentGraph {
        match kind {
            GraphKind::Interaction => &self.interaction,
            GraphKind::Relation => &self.relation,
            GraphKind::Dependency => &self.dependency,
        }
    }
}

/// Build GI: student → question edges carrying the correctness flag.
///
/// Records are applied in input order, so a repeated (student, question) pair
/// keeps the correctness of its last occurrence.
pub fn interaction_graph(responses: &ResponseTable) -> AssessmentGraph {
    let mut graph = AssessmentGraph::new(GraphKind::Interaction);
    for record in responses.iter() {
        let student = graph.upsert_node(NodeKind::Student, &record.student_id);
        let question = graph.upsert_node(NodeKind::Question, &record.question_id);
        graph.upsert_edge(student, question, EdgeData::response(record.correct));
    }
    tracing::debug!(
        rows = responses.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "assembled interaction graph"
    );
    graph
}

/// Build GR: question → concept edges from the skill matrix.
///
/// Every question column becomes a node, even one that exercises no concept.
pub fn relation_graph(skills: &IndicatorMatrix) -> AssessmentGraph {
    let mut graph = AssessmentGraph::new(GraphKind::Relation);
    for question_id in skills.columns() {
        let question = graph.upsert_node(NodeKind::Question, question_id);
        for (concept_id, value) in skills.column(question_id) {
            if is_indicator(value) {
                let concept = graph.upsert_node(NodeKind::Concept, concept_id);
                graph.upsert_edge(question, concept, EdgeData::PLAIN);
            }
        }
    }
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "assembled relation graph"
    );
    graph
}

/// Build GD: prerequisite → concept edges from the prerequisite matrix.
///
/// Every concept column becomes a node, even one with no prerequisites.
pub fn dependency_graph(prerequisites: &IndicatorMatrix) -> AssessmentGraph {
    let mut graph = AssessmentGraph::new(GraphKind::Dependency);
    for concept_id in prerequisites.columns() {
        let concept = graph.upsert_node(NodeKind::Concept, concept_id);
        for (prerequisite_id, value) in prerequisites.column(concept_id) {
            if is_indicator(value) {
                let prerequisite = graph.upsert_node(NodeKind::Concept, prerequisite_id);
                graph.upsert_edge(prerequisite, concept, EdgeData::PLAIN);
            }
        }
    }
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "assembled dependency graph"
    );
    graph
}

/// Build all three graphs. They share no data, so they are built in parallel.
pub fn assemble(tables: &Tables) -> GraphSet {
    let (interaction, (relation, dependency)) = rayon::join(
        || interaction_graph(&tables.responses),
        || {
            rayon::join(
                || relation_graph(&tables.skills),
                || dependency_graph(&tables.prerequisites),
            )
        },
    );
    GraphSet {
        interaction,
        relation,
        dependency,
    }
}
