// src/exec/adapter.rs

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error};

use crate::errors::{GlobdagError, Result};
use crate::exec::handles::{InputFile, OutputFile};
use crate::exec::task::{Task, TaskContext};
use crate::fs::FileSystem;
use crate::glob::ResolvedFiles;

/// Wrap the resolved files of `task` into handles and await its body.
///
/// A body error comes back as [`GlobdagError::TaskFailed`] carrying the task
/// id; nothing is retried.
pub async fn execute<A>(
    task: &Task<A>,
    resolved: &ResolvedFiles,
    cwd: &Path,
    fs: &Arc<dyn FileSystem>,
    args: &Arc<A>,
) -> Result<()> {
    let ctx = TaskContext {
        task: task.id().to_string(),
        cwd: cwd.to_path_buf(),
        inputs: resolved
            .inputs
            .iter()
            .map(|rel| InputFile::new(cwd, rel, Arc::clone(fs)))
            .collect(),
        outputs: resolved
            .outputs
            .iter()
            .map(|rel| OutputFile::new(cwd, rel, Arc::clone(fs)))
            .collect(),
        args: Arc::clone(args),
    };

    debug!(
        task = %task.id(),
        inputs = ctx.inputs.len(),
        outputs = ctx.outputs.len(),
        "invoking task body"
    );

    task.body().run(ctx).await.map_err(|err| {
        error!(task = %task.id(), error = %err, "task body failed");
        GlobdagError::TaskFailed(task.id().to_string(), err)
    })
}
