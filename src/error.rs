//! Error types for the truss preprocessor

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for model assembly
///
/// Every variant is fatal to the current run. The pipeline stops at the first
/// error and no partial job is handed to the solver.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Required input file {} not found", .path.display())]
    MissingFile { path: PathBuf },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {file} line {line}, field '{field}': {message}")]
    Parse {
        file: String,
        line: usize,
        field: &'static str,
        message: String,
    },

    #[error("Node {node} does not exist (model has {node_count} nodes)")]
    DanglingReference { node: usize, node_count: usize },

    #[error("Material '{0}' not found in catalog")]
    UnknownMaterial(String),

    #[error("Invalid axis code {0} (expected 1, 2 or 4)")]
    InvalidAxisCode(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{table} row {row}: {source}")]
    AtRow {
        table: &'static str,
        row: usize,
        #[source]
        source: Box<PrepError>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Solver error: {0}")]
    Solver(String),
}

impl PrepError {
    /// Attach the table name and 0-based row index where the error occurred
    pub fn at_row(self, table: &'static str, row: usize) -> Self {
        PrepError::AtRow {
            table,
            row,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any row context
    pub fn root(&self) -> &PrepError {
        match self {
            PrepError::AtRow { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            PrepError::MissingFile { path }
        } else {
            PrepError::Io { path, source }
        }
    }
}

/// Result type for preprocessing operations
pub type PrepResult<T> = Result<T, PrepError>;
