// src/engine/staleness.rs

//! Timestamp-based staleness decision.
//!
//! A task must run when some resolved output is older than some resolved
//! input. Files that cannot be stat'ed count as the epoch: a missing input
//! never makes a task stale on its own, a missing output always does.

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::task::JoinSet;
use tracing::trace;

use crate::fs::FileSystem;
use crate::glob::ResolvedFiles;

/// Why a task runs, or that it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDecision {
    /// The caller asked for a forced run.
    Forced,
    /// None of the resolved outputs exists (including "no outputs at all").
    MissingOutputs,
    /// Some output is older than some input.
    OutOfDate,
    /// Every output is at least as new as every input.
    UpToDate,
}

impl RunDecision {
    pub fn must_run(self) -> bool {
        !matches!(self, RunDecision::UpToDate)
    }
}

/// Modification time of a file, or `None` when it cannot be stat'ed.
pub type Stamp = Option<SystemTime>;

/// Pure decision over already collected stamps.
pub fn decide(inputs: &[Stamp], outputs: &[Stamp], force: bool) -> RunDecision {
    if force {
        return RunDecision::Forced;
    }
    if outputs.iter().all(Option::is_none) {
        return RunDecision::MissingOutputs;
    }

    let oldest_output = outputs.iter().map(|s| s.unwrap_or(UNIX_EPOCH)).min();
    let newest_input = inputs.iter().map(|s| s.unwrap_or(UNIX_EPOCH)).max();

    // "some output < some input" is the same as "oldest output < newest input".
    match (oldest_output, newest_input) {
        (Some(out), Some(inp)) if out < inp => RunDecision::OutOfDate,
        _ => RunDecision::UpToDate,
    }
}

/// Stat every file of a set concurrently; the result keeps the input order.
pub async fn collect_stamps(fs: &Arc<dyn FileSystem>, cwd: &Path, files: &[String]) -> Vec<Stamp> {
    let mut jobs = JoinSet::new();
    for (idx, rel) in files.iter().enumerate() {
        let fs = Arc::clone(fs);
        let path = cwd.join(rel);
        jobs.spawn_blocking(move || (idx, fs.modified(&path).ok()));
    }

    let mut stamps = vec![None; files.len()];
    while let Some(joined) = jobs.join_next().await {
        // A panicked stat is treated like a missing file.
        if let Ok((idx, stamp)) = joined {
            stamps[idx] = stamp;
        }
    }

    trace!(?files, ?stamps, "collected modification times");
    stamps
}

/// Stat the resolved files of a task and decide whether it must run.
pub async fn evaluate(
    fs: &Arc<dyn FileSystem>,
    cwd: &Path,
    resolved: &ResolvedFiles,
    force: bool,
) -> RunDecision {
    if force {
        return RunDecision::Forced;
    }

    let (inputs, outputs) = tokio::join!(
        collect_stamps(fs, cwd, &resolved.inputs),
        collect_stamps(fs, cwd, &resolved.outputs),
    );
    decide(&inputs, &outputs, force)
}
