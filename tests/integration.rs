//! End-to-end integration tests for the graph builder.
//!
//! These tests write input tables to a temporary directory, run the full
//! load → assemble → persist pipeline, and read the artifacts back.

use std::path::Path;

use gcd_graphs::config::{BuilderConfig, InputPaths, OutputPaths};
use gcd_graphs::error::{BuildError, DataLoadError, PersistError, SchemaMismatchError};
use gcd_graphs::graph::{GraphKind, NodeKey, NodeKind};
use gcd_graphs::persist::load_graph;
use gcd_graphs::pipeline::GraphBuilder;

const RESPONSES: &str = "\
student_id,question_id,correct
S1,Q1,1
S1,Q2,0
S2,Q1,1
S1,Q1,0
";

const SKILLS: &str = "\
concept,Q1,Q2,Q3
C1,1,0,0
C2,1,1,0
C3,0,0,0
";

const PREREQUISITES: &str = "\
,C1,C2,C3
C1,0,1,0
C2,0,0,1
C3,0,0,0
";

fn write_inputs(dir: &Path, responses: &str, skills: &str, prerequisites: &str) -> BuilderConfig {
    std::fs::write(dir.join("student_data.csv"), responses).unwrap();
    std::fs::write(dir.join("q_matrix.csv"), skills).unwrap();
    std::fs::write(dir.join("d_matrix.csv"), prerequisites).unwrap();
    BuilderConfig {
        inputs: InputPaths {
            responses: dir.join("student_data.csv"),
            skills: dir.join("q_matrix.csv"),
            prerequisites: dir.join("d_matrix.csv"),
        },
        outputs: OutputPaths {
            interaction: dir.join("graphs/GI.bin"),
            relation: dir.join("graphs/GR.bin"),
            dependency: dir.join("graphs/GD.bin"),
        },
        delimiter: ',',
    }
}

#[test]
fn end_to_end_build_and_reload() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = write_inputs(dir.path(), RESPONSES, SKILLS, PREREQUISITES);
    let builder = GraphBuilder::new(config.clone());

    let built = builder.build().unwrap();
    builder.run().unwrap();

    for kind in GraphKind::ALL {
        let loaded = load_graph(config.outputs.get(kind)).unwrap();
        assert_eq!(loaded.snapshot(), built.get(kind).snapshot(), "{kind} round trip");
    }

    let gi = load_graph(&config.outputs.interaction).unwrap();
    assert_eq!(gi.node_count(), 4);
    assert_eq!(gi.edge_count(), 3);
    let edge = gi
        .edge(&NodeKey::student("S1"), &NodeKey::question("Q1"))
        .unwrap();
    assert_eq!(edge.correct, Some(0));

    let gr = load_graph(&config.outputs.relation).unwrap();
    assert!(gr.has_node(NodeKind::Question, "Q3"));
    assert!(!gr.has_node(NodeKind::Concept, "C3"));
    assert_eq!(gr.edge_count(), 3);
    assert!(gr.edge(&NodeKey::question("Q2"), &NodeKey::concept("C2")).is_some());

    let gd = load_graph(&config.outputs.dependency).unwrap();
    assert_eq!(gd.node_count(), 3);
    assert_eq!(gd.edge_count(), 2);
    assert!(gd.edge(&NodeKey::concept("C1"), &NodeKey::concept("C2")).is_some());
    assert!(gd.edge(&NodeKey::concept("C2"), &NodeKey::concept("C3")).is_some());
}

#[test]
fn repeated_response_keeps_last_correctness() {
    let dir = tempfile::TempDir::new().unwrap();
    let responses = "student_id,question_id,correct\nS1,Q1,1\nS1,Q2,0\nS1,Q1,0\n";
    let config = write_inputs(dir.path(), responses, SKILLS, PREREQUISITES);
    let graphs = GraphBuilder::new(config).build().unwrap();

    let gi = graphs.interaction.snapshot();
    let nodes: Vec<_> = gi.nodes.iter().cloned().collect();
    assert_eq!(
        nodes,
        vec![
            NodeKey::student("S1"),
            NodeKey::question("Q1"),
            NodeKey::question("Q2"),
        ]
    );
    assert_eq!(gi.edges.len(), 2);
    for q in ["Q1", "Q2"] {
        let key = (NodeKey::student("S1"), NodeKey::question(q));
        assert_eq!(gi.edges[&key].correct, Some(0));
    }
}

#[test]
fn tab_separated_inputs() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut config = write_inputs(
        dir.path(),
        "student_id\tquestion_id\tcorrect\nS1\tQ1\t1\n",
        "\tQ1\nC1\t1\n",
        "\tC1\nC1\t0\n",
    );
    config.delimiter = '\t';
    let report = GraphBuilder::new(config).run().unwrap();
    assert_eq!(report.get(GraphKind::Relation).unwrap().stats.edges, 1);
}

#[test]
fn malformed_matrix_aborts_before_persisting() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = write_inputs(dir.path(), RESPONSES, ",Q1,Q2\nC1,1,0,1\n", PREREQUISITES);

    let err = GraphBuilder::new(config.clone()).run().unwrap_err();
    assert!(matches!(
        err,
        BuildError::DataLoad(DataLoadError::Schema(SchemaMismatchError::RowWidth { .. }))
    ));
    for kind in GraphKind::ALL {
        assert!(!config.outputs.get(kind).exists());
    }
}

#[test]
fn short_matrix_rows_build_without_edges() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = write_inputs(dir.path(), RESPONSES, ",Q1,Q2\nC1,1\nC2\n", PREREQUISITES);

    let graphs = GraphBuilder::new(config).build().unwrap();
    let gr = &graphs.relation;
    assert_eq!(gr.edge_count(), 1);
    assert!(gr.edge(&NodeKey::question("Q1"), &NodeKey::concept("C1")).is_some());
    assert!(gr.has_node(NodeKind::Question, "Q2"));
    assert!(!gr.has_node(NodeKind::Concept, "C2"));
}

#[test]
fn quoted_identifiers_with_delimiters() {
    let dir = tempfile::TempDir::new().unwrap();
    let responses = "student_id,question_id,correct\n\"Doe, J\",\"Q1, part a\",1\n";
    let config = write_inputs(dir.path(), responses, SKILLS, PREREQUISITES);

    let graphs = GraphBuilder::new(config).build().unwrap();
    let edge = graphs
        .interaction
        .edge(&NodeKey::student("Doe, J"), &NodeKey::question("Q1, part a"))
        .unwrap();
    assert_eq!(edge.correct, Some(1));
}

#[test]
fn missing_required_column_aborts() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = write_inputs(
        dir.path(),
        "student,question_id,correct\nS1,Q1,1\n",
        SKILLS,
        PREREQUISITES,
    );
    let err = GraphBuilder::new(config).run().unwrap_err();
    assert!(matches!(
        err,
        BuildError::DataLoad(DataLoadError::MissingColumn { ref column, .. }) if column == "student_id"
    ));
}

#[test]
fn unwritable_output_is_persist_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut config = write_inputs(dir.path(), RESPONSES, SKILLS, PREREQUISITES);
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();
    config.outputs.relation = blocker.join("GR.bin");

    let err = GraphBuilder::new(config).run().unwrap_err();
    assert!(matches!(err, BuildError::Persist(PersistError::Io { .. })));
}

#[test]
fn config_file_drives_a_build() {
    let dir = tempfile::TempDir::new().unwrap();
    write_inputs(dir.path(), RESPONSES, SKILLS, PREREQUISITES);
    let root = dir.path().display().to_string().replace('\\', "/");
    let toml = format!(
        r#"
[inputs]
responses = "{root}/student_data.csv"
skills = "{root}/q_matrix.csv"
prerequisites = "{root}/d_matrix.csv"

[outputs]
interaction = "{root}/out/GI.bin"
relation = "{root}/out/GR.bin"
dependency = "{root}/out/GD.bin"
"#
    );
    let config = BuilderConfig::from_toml_str(&toml).unwrap();
    GraphBuilder::new(config).run().unwrap();
    assert!(dir.path().join("out/GD.bin").exists());
}
