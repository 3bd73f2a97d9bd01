// src/exec/task.rs

//! Task definition and the body capability.
//!
//! A task is an id plus declared input/output glob patterns plus a body.
//! The body is anything implementing [`TaskBody`]; closures go through
//! [`Task::from_fn`], shell commands through
//! [`CommandTask`](crate::exec::command::CommandTask).

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::engine::TaskId;
use crate::exec::handles::{InputFile, OutputFile};

/// Future returned by a task body.
pub type TaskFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Everything a body receives for one invocation.
#[derive(Debug)]
pub struct TaskContext<A> {
    pub task: TaskId,
    /// Working directory of the engine.
    pub cwd: PathBuf,
    pub inputs: Vec<InputFile>,
    pub outputs: Vec<OutputFile>,
    /// Extra arguments fixed at engine construction, shared by every task.
    pub args: Arc<A>,
}

/// Trait abstracting what a task does when it runs.
pub trait TaskBody<A>: Send + Sync {
    fn run(&self, ctx: TaskContext<A>) -> TaskFuture<'_>;
}

/// Body backed by an async closure.
pub struct FnBody<F>(F);

impl<A, F, Fut> TaskBody<A> for FnBody<F>
where
    F: Fn(TaskContext<A>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn run(&self, ctx: TaskContext<A>) -> TaskFuture<'_> {
        Box::pin((self.0)(ctx))
    }
}

/// A registered unit of work.
pub struct Task<A = ()> {
    id: TaskId,
    inputs: Vec<String>,
    outputs: Vec<String>,
    body: Arc<dyn TaskBody<A>>,
}

impl<A> Task<A> {
    pub fn new<I, O, S, T, B>(id: impl Into<TaskId>, inputs: I, outputs: O, body: B) -> Self
    where
        I: IntoIterator<Item = S>,
        O: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
        B: TaskBody<A> + 'static,
    {
        Self {
            id: id.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            body: Arc::new(body),
        }
    }

    pub fn from_fn<I, O, S, T, F, Fut>(id: impl Into<TaskId>, inputs: I, outputs: O, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        O: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
        F: Fn(TaskContext<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::new(id, inputs, outputs, FnBody(f))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn body(&self) -> &dyn TaskBody<A> {
        self.body.as_ref()
    }

    /// Whether some output pattern of `self` appears verbatim among the
    /// input patterns of `other` (the edge `self -> other`).
    pub fn feeds(&self, other: &Task<A>) -> bool {
        self.outputs.iter().any(|out| other.inputs.contains(out))
    }
}

impl<A> Clone for Task<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<A> fmt::Debug for Task<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}
