// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::engine::TaskId;

#[derive(Error, Debug)]
pub enum GlobdagError {
    #[error("Task '{task}' depends on itself: output pattern '{pattern}' overlaps its inputs")]
    SelfDependency { task: TaskId, pattern: String },

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Task '{0}' failed: {1:#}")]
    TaskFailed(TaskId, anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlobdagError {
    /// Errors raised by graph bookkeeping (`add`, sort, refresh lookups).
    ///
    /// These never leave partial state behind, unlike execution errors which
    /// abort a run halfway through.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GlobdagError::SelfDependency { .. }
                | GlobdagError::DagCycle(_)
                | GlobdagError::TaskNotFound(_)
                | GlobdagError::InvalidPattern { .. }
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GlobdagError>;
