//! Rich diagnostic error types for the graph builder.
//!
//! Each stage of a build (config, load, persist) defines its own error type with
//! miette `#[diagnostic]` derives, so a failed run tells the user which file was
//! at fault and what to change. Every error is fatal to the run.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for a graph build.
///
/// Each variant wraps a stage-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Persist(#[from] PersistError),
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(gcd::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(gcd::config::parse),
        help("Check the TOML syntax. Expected tables are [inputs] and [outputs].")
    )]
    Parse { path: String, message: String },

    #[error("missing required setting: {field}")]
    #[diagnostic(
        code(gcd::config::missing),
        help("Pass the value on the command line or set it in the config file.")
    )]
    Missing { field: String },

    #[error("invalid delimiter {value:?}: expected a single character")]
    #[diagnostic(
        code(gcd::config::delimiter),
        help("Use a one-character delimiter such as ',' or '\\t'.")
    )]
    Delimiter { value: String },
}

// ---------------------------------------------------------------------------
// Data load errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DataLoadError {
    #[error("failed to read input file: {path}")]
    #[diagnostic(
        code(gcd::load::read),
        help("Check that the file exists, is readable, and is UTF-8 encoded text.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: required column \"{column}\" not found in header")]
    #[diagnostic(
        code(gcd::load::missing_column),
        help("The response file must have a header naming student_id, question_id and correct.")
    )]
    MissingColumn { path: String, column: String },

    #[error("{path}:{line}: row has no value for column \"{column}\"")]
    #[diagnostic(
        code(gcd::load::missing_field),
        help("Every response row needs a cell for each required column.")
    )]
    MissingField {
        path: String,
        line: usize,
        column: String,
    },

    #[error("{path}:{line}: correctness flag {value:?} is not 0 or 1")]
    #[diagnostic(
        code(gcd::load::invalid_correctness),
        help("The correct column accepts 0, 1, 0.0 or 1.0.")
    )]
    InvalidCorrectness {
        path: String,
        line: usize,
        value: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaMismatchError),
}

/// Structural problems in an indicator matrix.
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaMismatchError {
    #[error("{path}: no header line found")]
    #[diagnostic(
        code(gcd::schema::empty_header),
        help("The first non-blank line must list the index column followed by identifiers.")
    )]
    EmptyHeader { path: String },

    #[error("{path}: header has no identifier columns after the index column")]
    #[diagnostic(
        code(gcd::schema::no_columns),
        help("A matrix needs at least two header cells: the index label and one identifier.")
    )]
    NoColumns { path: String },

    #[error("{path}:{line}: empty identifier")]
    #[diagnostic(
        code(gcd::schema::empty_key),
        help("Every column header and every row index must be a non-empty identifier.")
    )]
    EmptyKey { path: String, line: usize },

    #[error("{path}: column \"{key}\" appears more than once")]
    #[diagnostic(
        code(gcd::schema::duplicate_column),
        help("Column identifiers must be unique within a matrix.")
    )]
    DuplicateColumn { path: String, key: String },

    #[error("{path}:{line}: row \"{key}\" appears more than once")]
    #[diagnostic(
        code(gcd::schema::duplicate_row),
        help("Row identifiers must be unique within a matrix.")
    )]
    DuplicateRow {
        path: String,
        line: usize,
        key: String,
    },

    #[error("{path}:{line}: expected {expected} cells, found {actual}")]
    #[diagnostic(
        code(gcd::schema::row_width),
        help("Each row must have an index cell plus one cell per header column.")
    )]
    RowWidth {
        path: String,
        line: usize,
        expected: usize,
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// Persist errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PersistError {
    #[error("I/O error on {path}")]
    #[diagnostic(
        code(gcd::persist::io),
        help(
            "A filesystem operation failed. Check that the destination directory \
             is writable and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode graph for {path}: {message}")]
    #[diagnostic(code(gcd::persist::encode), help("This is a bug; please report it."))]
    Encode { path: String, message: String },

    #[error("failed to decode graph from {path}: {message}")]
    #[diagnostic(
        code(gcd::persist::decode),
        help("The file is truncated or corrupted. Rebuild it with `gcd-graphs build`.")
    )]
    Decode { path: String, message: String },

    #[error("{path} is not a graph artifact")]
    #[diagnostic(
        code(gcd::persist::bad_magic),
        help("Only files written by `gcd-graphs build` can be loaded.")
    )]
    BadMagic { path: String },

    #[error("{path}: unsupported artifact version {found} (expected {expected})")]
    #[diagnostic(
        code(gcd::persist::version),
        help("Stored graphs are not migrated. Rebuild the artifact from its source tables.")
    )]
    UnsupportedVersion {
        path: String,
        found: u32,
        expected: u32,
    },
}

/// Convenience result type for a whole build.
pub type BuildResult<T> = std::result::Result<T, BuildError>;
