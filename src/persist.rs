//! Persister: binary graph artifacts.
//!
//! An artifact is an 8-byte magic, a little-endian `u32` format version, then a
//! bincode-encoded [`StoredGraph`]. Loading rebuilds the graph through the same
//! upsert API used by the assembler, so node identities and edge attributes
//! survive the round trip exactly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assemble::GraphSet;
use crate::config::OutputPaths;
use crate::error::PersistError;
use crate::graph::{AssessmentGraph, EdgeData, GraphKind, NodeKey};

pub type PersistResult<T> = std::result::Result<T, PersistError>;

pub const MAGIC: &[u8; 8] = b"GCDGRAPH";
pub const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = MAGIC.len() + 4;

/// On-disk form of a graph: nodes in index order, edges by node position.
#[derive(Debug, Serialize, Deserialize)]
struct StoredGraph {
    kind: GraphKind,
    nodes: Vec<NodeKey>,
    edges: Vec<(u32, u32, EdgeData)>,
}

impl From<&AssessmentGraph> for StoredGraph {
    fn from(graph: &AssessmentGraph) -> Self {
        let g = graph.graph();
        Self {
            kind: graph.kind(),
            nodes: g.node_weights().cloned().collect(),
            edges: g
                .raw_edges()
                .iter()
                .map(|e| (e.source().index() as u32, e.target().index() as u32, e.weight))
                .collect(),
        }
    }
}

/// Write one graph to `path`, creating missing parent directories.
pub fn save_graph(graph: &AssessmentGraph, path: &Path) -> PersistResult<()> {
    let io_err = |source: std::io::Error| PersistError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let stored = StoredGraph::from(graph);
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    writer.write_all(MAGIC).map_err(io_err)?;
    writer
        .write_all(&FORMAT_VERSION.to_le_bytes())
        .map_err(io_err)?;
    bincode::serialize_into(&mut writer, &stored).map_err(|e| match *e {
        bincode::ErrorKind::Io(source) => io_err(source),
        other => PersistError::Encode {
            path: path.display().to_string(),
            message: other.to_string(),
        },
    })?;
    writer.flush().map_err(io_err)?;

    tracing::info!(
        graph = %graph.kind(),
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "saved graph"
    );
    Ok(())
}

/// Read a graph written by [`save_graph`].
pub fn load_graph(path: &Path) -> PersistResult<AssessmentGraph> {
    let path_str = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| PersistError::Io {
        path: path_str.clone(),
        source: e,
    })?;

    if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
        return Err(PersistError::BadMagic { path: path_str });
    }
    let version_bytes: [u8; 4] = bytes
        .get(MAGIC.len()..HEADER_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| PersistError::Decode {
            path: path_str.clone(),
            message: "truncated header".into(),
        })?;
    let version = u32::from_le_bytes(version_bytes);
    if version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            path: path_str,
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let stored: StoredGraph =
        bincode::deserialize(&bytes[HEADER_LEN..]).map_err(|e| PersistError::Decode {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
    rebuild(stored, &path_str)
}

fn rebuild(stored: StoredGraph, path: &str) -> PersistResult<AssessmentGraph> {
    let mut graph = AssessmentGraph::new(stored.kind);
    let indices: Vec<_> = stored
        .nodes
        .iter()
        .map(|key| graph.upsert_node(key.kind, &key.id))
        .collect();
    if graph.node_count() != stored.nodes.len() {
        return Err(PersistError::Decode {
            path: path.to_string(),
            message: "duplicate node in artifact".into(),
        });
    }

    for (source, target, data) in stored.edges {
        let endpoint = |i: u32| {
            indices.get(i as usize).copied().ok_or_else(|| PersistError::Decode {
                path: path.to_string(),
                message: format!("edge references missing node {i}"),
            })
        };
        graph.upsert_edge(endpoint(source)?, endpoint(target)?, data);
    }
    Ok(graph)
}

/// Persist the three graphs to their configured locations.
pub fn save_all(graphs: &GraphSet, outputs: &OutputPaths) -> PersistResult<()> {
    for kind in GraphKind::ALL {
        save_graph(graphs.get(kind), outputs.get(kind))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use tempfile::TempDir;

    fn sample() -> AssessmentGraph {
        let mut g = AssessmentGraph::new(GraphKind::Interaction);
        let s = g.upsert_node(NodeKind::Student, "S1");
        let q1 = g.upsert_node(NodeKind::Question, "Q1");
        let q2 = g.upsert_node(NodeKind::Question, "S1");
        g.upsert_edge(s, q1, EdgeData::response(1));
        g.upsert_edge(s, q2, EdgeData::response(0));
        g
    }

    #[test]
    fn round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("GI.bin");
        let graph = sample();

        save_graph(&graph, &path).unwrap();
        let loaded = load_graph(&path).unwrap();
        assert_eq!(loaded.snapshot(), graph.snapshot());
        assert_eq!(loaded.kind(), GraphKind::Interaction);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/GR.bin");
        save_graph(&AssessmentGraph::new(GraphKind::Relation), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn rejects_foreign_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.bin");
        std::fs::write(&path, b"not a graph at all").unwrap();
        assert!(matches!(load_graph(&path), Err(PersistError::BadMagic { .. })));

        std::fs::write(&path, b"GCD").unwrap();
        assert!(matches!(load_graph(&path), Err(PersistError::BadMagic { .. })));
    }

    #[test]
    fn rejects_other_versions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v9.bin");
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&9u32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();
        assert!(matches!(
            load_graph(&path),
            Err(PersistError::UnsupportedVersion { found: 9, .. })
        ));
    }

    #[test]
    fn rejects_truncated_body() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("GI.bin");
        save_graph(&sample(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
        assert!(matches!(load_graph(&path), Err(PersistError::Decode { .. })));
    }

    #[test]
    fn unwritable_destination_is_io_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        // A regular file cannot act as a parent directory.
        let err = save_graph(&sample(), &blocker.join("GI.bin")).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_graph(&dir.path().join("absent.bin")),
            Err(PersistError::Io { .. })
        ));
    }
}
