//! Build configuration: where the three tables come from and where the three
//! graphs go.
//!
//! A [`BuilderConfig`] is always passed explicitly into the orchestrator. It can
//! be written by hand, read from a TOML file, or assembled from command-line
//! flags layered over a file through [`PartialConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::GraphKind;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Locations of the three input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    /// Response records (`student_id`, `question_id`, `correct`).
    pub responses: PathBuf,
    /// Skill matrix: concept rows by question columns.
    pub skills: PathBuf,
    /// Prerequisite matrix: prerequisite-concept rows by concept columns.
    pub prerequisites: PathBuf,
}

/// Destinations of the three graph artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    /// Interaction graph (GI).
    pub interaction: PathBuf,
    /// Relation graph (GR).
    pub relation: PathBuf,
    /// Dependency graph (GD).
    pub dependency: PathBuf,
}

impl OutputPaths {
    /// Destination of the given graph.
    pub fn get(&self, kind: GraphKind) -> &Path {
        match kind {
            GraphKind::Interaction => &self.interaction,
            GraphKind::Relation => &self.relation,
            GraphKind::Dependency => &self.dependency,
        }
    }
}

/// Complete configuration for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    pub inputs: InputPaths,
    pub outputs: OutputPaths,
    /// Field delimiter shared by all three input files.
    pub delimiter: char,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            inputs: InputPaths {
                responses: PathBuf::from("data/student_data.csv"),
                skills: PathBuf::from("data/q_matrix.csv"),
                prerequisites: PathBuf::from("data/d_matrix.csv"),
            },
            outputs: OutputPaths {
                interaction: PathBuf::from("graphs/GI.bin"),
                relation: PathBuf::from("graphs/GR.bin"),
                dependency: PathBuf::from("graphs/GD.bin"),
            },
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

pub const DEFAULT_DELIMITER: char = ',';

impl BuilderConfig {
    /// Parse a complete configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        PartialConfig::from_toml_str(text, "<inline>")?.resolve()
    }

    /// Read a complete configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> ConfigResult<Self> {
        PartialConfig::from_toml_file(path)?.resolve()
    }
}

/// A configuration in which any setting may still be missing.
///
/// Layers are combined with [`PartialConfig::merge`]; the result is checked
/// for completeness by [`PartialConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub delimiter: Option<String>,
    pub inputs: PartialInputs,
    pub outputs: PartialOutputs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialInputs {
    pub responses: Option<PathBuf>,
    pub skills: Option<PathBuf>,
    pub prerequisites: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialOutputs {
    pub interaction: Option<PathBuf>,
    pub relation: Option<PathBuf>,
    pub dependency: Option<PathBuf>,
}

impl PartialConfig {
    pub fn from_toml_str(text: &str, origin: &str) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Overlay `other` on top of `self`: settings present in `other` win.
    pub fn merge(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            delimiter: other.delimiter.or(self.delimiter),
            inputs: PartialInputs {
                responses: other.inputs.responses.or(self.inputs.responses),
                skills: other.inputs.skills.or(self.inputs.skills),
                prerequisites: other.inputs.prerequisites.or(self.inputs.prerequisites),
            },
            outputs: PartialOutputs {
                interaction: other.outputs.interaction.or(self.outputs.interaction),
                relation: other.outputs.relation.or(self.outputs.relation),
                dependency: other.outputs.dependency.or(self.outputs.dependency),
            },
        }
    }

    /// Turn into a full configuration, failing on the first missing path.
    pub fn resolve(self) -> ConfigResult<BuilderConfig> {
        let delimiter = match self.delimiter {
            None => DEFAULT_DELIMITER,
            Some(raw) => parse_delimiter(&raw)?,
        };

        Ok(BuilderConfig {
            inputs: InputPaths {
                responses: require(self.inputs.responses, "inputs.responses")?,
                skills: require(self.inputs.skills, "inputs.skills")?,
                prerequisites: require(self.inputs.prerequisites, "inputs.prerequisites")?,
            },
            outputs: OutputPaths {
                interaction: require(self.outputs.interaction, "outputs.interaction")?,
                relation: require(self.outputs.relation, "outputs.relation")?,
                dependency: require(self.outputs.dependency, "outputs.dependency")?,
            },
            delimiter,
        })
    }
}

fn require(value: Option<PathBuf>, field: &str) -> ConfigResult<PathBuf> {
    value.ok_or_else(|| ConfigError::Missing {
        field: field.to_string(),
    })
}

/// Accepts a single character, or the escape `\t` for tab.
pub fn parse_delimiter(raw: &str) -> ConfigResult<char> {
    if raw == "\\t" {
        return Ok('\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::Delimiter {
            value: raw.to_string(),
        }),
    }
}
