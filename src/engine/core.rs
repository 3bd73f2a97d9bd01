// src/engine/core.rs

//! The engine object: owns settings, collaborators and the task graph.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::dag::TaskGraph;
use crate::engine::TaskId;
use crate::errors::{GlobdagError, Result};
use crate::exec::Task;
use crate::fs::{FileSystem, RealFileSystem};
use crate::glob::path_utils::relative_str;
use crate::glob::{GlobResolver, GlobsetResolver, ResolvedFiles, resolve_files_async};
use crate::types::Settings;

/// Incremental task engine.
///
/// `A` is the type of the extra arguments handed to every task body; it is
/// fixed at construction and shared behind an `Arc`.
///
/// Graph mutation and sorting are serialised by an internal mutex that is
/// never held across an `.await`, so an `Engine` can be shared between tasks
/// (e.g. in an `Arc`).
pub struct Engine<A = ()> {
    pub(super) settings: Arc<Settings>,
    pub(super) args: Arc<A>,
    pub(super) fs: Arc<dyn FileSystem>,
    pub(super) resolver: Arc<dyn GlobResolver>,
    graph: Mutex<TaskGraph<A>>,
    globs: Mutex<HashMap<TaskId, ResolvedFiles>>,
}

impl<A> fmt::Debug for Engine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("settings", &self.settings)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl<A> Engine<A>
where
    A: Send + Sync + 'static,
{
    /// Engine over the real filesystem.
    pub fn new(settings: Settings, args: A) -> Result<Self> {
        Self::with_file_system(settings, args, Arc::new(RealFileSystem))
    }

    /// Engine over a custom filesystem; the default resolver walks the same
    /// filesystem.
    pub fn with_file_system(settings: Settings, args: A, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let resolver = GlobsetResolver::new(Arc::clone(&fs), &settings)?;
        info!(cwd = ?settings.cwd, ignore = ?settings.ignore, "engine created");

        Ok(Self {
            settings: Arc::new(settings),
            args: Arc::new(args),
            fs,
            resolver: Arc::new(resolver),
            graph: Mutex::new(TaskGraph::new()),
            globs: Mutex::new(HashMap::new()),
        })
    }

    /// Replace the glob resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn GlobResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn args(&self) -> &A {
        &self.args
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Register one task. See [`TaskGraph::add`] for the rejection rules;
    /// a rejected task leaves the engine unchanged.
    pub fn add(&self, task: Task<A>) -> Result<()> {
        self.graph().add(task)
    }

    /// Register several tasks in order, stopping at the first rejection.
    pub fn add_all<I>(&self, tasks: I) -> Result<()>
    where
        I: IntoIterator<Item = Task<A>>,
    {
        self.graph().add_all(tasks)
    }

    pub fn get_topologically_sorted_list(&self) -> Result<Vec<Arc<Task<A>>>> {
        self.graph().topological_order()
    }

    /// Tasks whose input patterns match `path`.
    ///
    /// `path` may be relative to the working directory or absolute under it;
    /// a path outside the working directory matches nothing.
    pub fn get_tasks_by_glob(&self, path: impl AsRef<Path>) -> Result<Vec<Arc<Task<A>>>> {
        let Some(rel) = relative_str(&self.settings.cwd, path.as_ref()) else {
            debug!(path = ?path.as_ref(), "path is outside the working directory");
            return Ok(Vec::new());
        };
        self.graph().tasks_by_glob(&rel)
    }

    /// Re-resolve the files behind one task and cache them.
    pub async fn refresh_globs_for_task(&self, id: &str) -> Result<ResolvedFiles> {
        let task = self
            .graph()
            .get(id)
            .cloned()
            .ok_or_else(|| GlobdagError::TaskNotFound(id.to_string()))?;

        let resolved = self.resolve(&task).await?;
        debug!(
            task = %id,
            inputs = resolved.inputs.len(),
            outputs = resolved.outputs.len(),
            "refreshed globs"
        );
        self.globs_cache().insert(id.to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Re-resolve and cache the files behind every registered task.
    pub async fn refresh_globs(&self) -> Result<()> {
        let ids: Vec<TaskId> = self.graph().task_ids().map(str::to_string).collect();
        for id in ids {
            self.refresh_globs_for_task(&id).await?;
        }
        Ok(())
    }

    /// Files cached by the last refresh of `id`, if any.
    pub fn resolved_files(&self, id: &str) -> Option<ResolvedFiles> {
        self.globs_cache().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graph().contains(id)
    }

    pub fn len(&self) -> usize {
        self.graph().len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph().is_empty()
    }

    /// Direct dependencies and dependents of a task, for diagnostics.
    pub fn neighbours_of(&self, id: &str) -> (Vec<TaskId>, Vec<TaskId>) {
        let graph = self.graph();
        let deps = graph.dependencies_of(id).into_iter().map(str::to_string).collect();
        let dependents = graph.dependents_of(id).into_iter().map(str::to_string).collect();
        (deps, dependents)
    }

    pub(super) async fn resolve(&self, task: &Task<A>) -> Result<ResolvedFiles> {
        resolve_files_async(
            Arc::clone(&self.resolver),
            task.inputs().to_vec(),
            task.outputs().to_vec(),
        )
        .await
    }

    fn graph(&self) -> MutexGuard<'_, TaskGraph<A>> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn globs_cache(&self) -> MutexGuard<'_, HashMap<TaskId, ResolvedFiles>> {
        self.globs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
