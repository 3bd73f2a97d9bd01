// src/dag/graph.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::dag::edges::{EdgeGraph, infer_edges};
use crate::dag::sort::{has_cycle, kahn_order};
use crate::errors::{GlobdagError, Result};
use crate::exec::Task;
use crate::glob::patterns::{compile_glob, compile_matcher, find_self_overlap};

/// Registered tasks in insertion order.
///
/// Edges are never stored; they are re-derived from the declared patterns
/// whenever the graph is inspected, so the task list is the single source of
/// truth. The graph is acyclic after every successful [`TaskGraph::add`].
pub struct TaskGraph<A = ()> {
    tasks: Vec<Arc<Task<A>>>,
}

impl<A> Default for TaskGraph<A> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<A> fmt::Debug for TaskGraph<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph")
            .field("tasks", &self.task_ids().collect::<Vec<_>>())
            .finish()
    }
}

impl<A> TaskGraph<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task.
    ///
    /// Fails without changing the graph when a pattern does not compile, when
    /// an output pattern overlaps one of the task's own inputs, or when the
    /// task would close a cycle. A task reusing a registered id replaces the
    /// old one in place.
    pub fn add(&mut self, task: Task<A>) -> Result<()> {
        validate_patterns(&task)?;

        if let Some(pattern) = find_self_overlap(task.inputs(), task.outputs())? {
            return Err(GlobdagError::SelfDependency {
                task: task.id().to_string(),
                pattern: pattern.to_string(),
            });
        }

        let id = task.id().to_string();
        let task = Arc::new(task);

        // Tentative insert; remember how to undo it.
        let replaced = match self.position(&id) {
            Some(pos) => Some((pos, std::mem::replace(&mut self.tasks[pos], task))),
            None => {
                self.tasks.push(task);
                None
            }
        };

        if self.has_cycle() {
            match replaced {
                Some((pos, previous)) => self.tasks[pos] = previous,
                None => {
                    self.tasks.pop();
                }
            }
            warn!(task = %id, "rejected task: it would create a cycle");
            return Err(GlobdagError::DagCycle(format!(
                "adding task with id {id} creates a cycle in the DAG"
            )));
        }

        if replaced.is_some() {
            debug!(task = %id, "replaced registered task");
        } else {
            debug!(task = %id, total = self.tasks.len(), "registered task");
        }
        Ok(())
    }

    /// Register tasks in order, stopping at the first rejection. Tasks
    /// before the rejected one stay registered.
    pub fn add_all<I>(&mut self, tasks: I) -> Result<()>
    where
        I: IntoIterator<Item = Task<A>>,
    {
        for task in tasks {
            self.add(task)?;
        }
        Ok(())
    }

    pub fn has_cycle(&self) -> bool {
        has_cycle(&self.edges())
    }

    /// All tasks, producers before consumers, ties in insertion order.
    pub fn topological_order(&self) -> Result<Vec<Arc<Task<A>>>> {
        let order = kahn_order(&self.edges());

        if order.len() != self.tasks.len() {
            return Err(GlobdagError::DagCycle(
                "the graph contains a cycle and cannot be topologically sorted".to_string(),
            ));
        }

        Ok(order
            .into_iter()
            .map(|node| Arc::clone(&self.tasks[node.index()]))
            .collect())
    }

    /// Tasks with an input pattern matching `rel_path` (relative to the
    /// working directory), in insertion order.
    pub fn tasks_by_glob(&self, rel_path: &str) -> Result<Vec<Arc<Task<A>>>> {
        let mut matching = Vec::new();
        for task in &self.tasks {
            for pattern in task.inputs() {
                if compile_matcher(pattern)?.is_match(rel_path) {
                    matching.push(Arc::clone(task));
                    break;
                }
            }
        }
        Ok(matching)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Task<A>>> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Registered tasks in insertion order.
    pub fn tasks(&self) -> &[Arc<Task<A>>] {
        &self.tasks
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.id())
    }

    /// Tasks whose outputs feed `id` (its direct dependencies).
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        match self.get(id) {
            Some(task) => self
                .tasks
                .iter()
                .filter(|other| other.id() != id && other.feeds(task))
                .map(|other| other.id())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Tasks fed by the outputs of `id` (its direct dependents).
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        match self.get(id) {
            Some(task) => self
                .tasks
                .iter()
                .filter(|other| other.id() != id && task.feeds(other))
                .map(|other| other.id())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == id)
    }

    fn edges(&self) -> EdgeGraph {
        infer_edges(&self.tasks)
    }
}

fn validate_patterns<A>(task: &Task<A>) -> Result<()> {
    for pattern in task.inputs().iter().chain(task.outputs()) {
        compile_glob(pattern)?;
    }
    Ok(())
}
