// src/types.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::TaskId;

/// Engine-wide settings, fixed at construction time.
///
/// - `cwd`: root against which every glob pattern and resolved path is joined.
/// - `ignore`: glob patterns excluded from every resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_cwd")]
    pub cwd: PathBuf,

    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cwd: default_cwd(),
            ignore: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ignore: Vec::new(),
        }
    }

    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }
}

/// Options for a single [`crate::engine::Engine::run`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Run every task regardless of timestamps.
    pub force: bool,
}

impl RunOptions {
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// What a run pass did, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub executed: Vec<TaskId>,
    pub skipped: Vec<TaskId>,
}

impl RunReport {
    pub fn nothing_executed(&self) -> bool {
        self.executed.is_empty()
    }
}
