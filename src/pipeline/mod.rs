//! Build pipeline: load the tables, assemble the graphs, persist them.
//!
//! The stages run strictly in order with no retries. The first failure is
//! returned unchanged and nothing after it runs.

use std::path::PathBuf;

use crate::assemble::{GraphSet, assemble};
use crate::config::BuilderConfig;
use crate::error::BuildResult;
use crate::graph::{GraphKind, GraphStats};
use crate::persist::save_all;
use crate::table::Tables;

/// One stage of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Read the three input files.
    Load,
    /// Derive GI, GR and GD.
    Assemble,
    /// Write the three artifacts.
    Persist,
}

/// Outcome of one graph in a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphReport {
    pub stats: GraphStats,
    pub path: PathBuf,
}

/// Outcome of a successful build, one entry per graph in GI, GR, GD order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub graphs: Vec<GraphReport>,
}

impl RunReport {
    pub fn get(&self, kind: GraphKind) -> Option<&GraphReport> {
        self.graphs.iter().find(|g| g.stats.kind == kind)
    }
}

/// Runs builds for one configuration.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: BuilderConfig,
}

impl GraphBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn load(&self) -> BuildResult<Tables> {
        tracing::debug!(stage = ?StageKind::Load, "starting stage");
        Ok(Tables::load(&self.config.inputs, self.config.delimiter)?)
    }

    /// Load and assemble without writing anything.
    pub fn build(&self) -> BuildResult<GraphSet> {
        let tables = self.load()?;
        tracing::debug!(stage = ?StageKind::Assemble, "starting stage");
        Ok(assemble(&tables))
    }

    /// Load, assemble and persist all three graphs.
    pub fn run(&self) -> BuildResult<RunReport> {
        let graphs = self.build()?;
        tracing::debug!(stage = ?StageKind::Persist, "starting stage");
        save_all(&graphs, &self.config.outputs)?;

        let outputs = &self.config.outputs;
        let report = RunReport {
            graphs: GraphKind::ALL
                .iter()
                .map(|&kind| GraphReport {
                    stats: graphs.get(kind).stats(),
                    path: outputs.get(kind).to_path_buf(),
                })
                .collect(),
        };

        tracing::info!(
            interaction_edges = graphs.interaction.edge_count(),
            relation_edges = graphs.relation.edge_count(),
            dependency_edges = graphs.dependency.edge_count(),
            "graphs built and saved"
        );
        Ok(report)
    }
}
