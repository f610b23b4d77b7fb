// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # gcd-graphs
//!
//! Builds the three directed graphs consumed by a graph-based cognitive
//! diagnosis model from flat assessment tables.
//!
//! ## Architecture
//!
//! - **Loader** (`table`): response records and indicator matrices from delimited text
//! - **Graph** (`graph`): petgraph-backed graphs keyed by (node kind, identifier)
//! - **Assembler** (`assemble`): interaction (GI), relation (GR) and dependency (GD) graphs
//! - **Persister** (`persist`): versioned bincode artifacts that load back exactly
//! - **Pipeline** (`pipeline`): load → assemble → persist for one [`config::BuilderConfig`]
//!
//! ## Library usage
//!
//! ```no_run
//! use gcd_graphs::config::BuilderConfig;
//! use gcd_graphs::pipeline::GraphBuilder;
//!
//! let report = GraphBuilder::new(BuilderConfig::default()).run().unwrap();
//! for graph in &report.graphs {
//!     println!("{} -> {}", graph.stats, graph.path.display());
//! }
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod persist;
pub mod pipeline;
pub mod table;
