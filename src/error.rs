//! Error types for diffst operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffstError>;

#[derive(Error, Debug)]
pub enum DiffstError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Number of columns being returned is different: {source_columns} vs {target_columns}")]
    ColumnCountMismatch {
        source_columns: usize,
        target_columns: usize,
    },

    #[error("Failed to read row from {side}: {message}")]
    SourceIo { side: String, message: String },

    #[error("Test case not found: {id} (looked for {path})")]
    TestCaseNotFound { id: String, path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{0:#}")]
    Generic(#[from] anyhow::Error),
}

impl DiffstError {
    pub fn column_count_mismatch(source_columns: usize, target_columns: usize) -> Self {
        Self::ColumnCountMismatch {
            source_columns,
            target_columns,
        }
    }

    pub fn source_io(side: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::SourceIo {
            side: side.into(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
