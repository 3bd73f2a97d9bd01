#![allow(dead_code)]

use globdag::exec::{Task, TaskBody};

use crate::recording::{Behaviour, ExecutionLog, RecordingBody};

/// Builder for `Task` to simplify test setup.
///
/// ```ignore
/// let task = TaskBuilder::new("ID-1").input("*.ts").output("*.js").noop();
/// ```
pub struct TaskBuilder {
    id: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl TaskBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn input(mut self, pattern: &str) -> Self {
        self.inputs.push(pattern.to_string());
        self
    }

    pub fn inputs(mut self, patterns: &[&str]) -> Self {
        self.inputs.extend(patterns.iter().map(|p| p.to_string()));
        self
    }

    pub fn output(mut self, pattern: &str) -> Self {
        self.outputs.push(pattern.to_string());
        self
    }

    pub fn outputs(mut self, patterns: &[&str]) -> Self {
        self.outputs.extend(patterns.iter().map(|p| p.to_string()));
        self
    }

    /// Task whose body does nothing.
    pub fn noop<A: Send + Sync + 'static>(self) -> Task<A> {
        self.with_body(RecordingBody::new(ExecutionLog::new(), Behaviour::Record))
    }

    /// Task that records its id in `log` when it runs.
    pub fn recorded<A: Send + Sync + 'static>(self, log: &ExecutionLog) -> Task<A> {
        self.with_body(RecordingBody::new(log.clone(), Behaviour::Record))
    }

    /// Task that records its id and writes every resolved output.
    pub fn writing<A: Send + Sync + 'static>(self, log: &ExecutionLog) -> Task<A> {
        self.with_body(RecordingBody::new(log.clone(), Behaviour::WriteOutputs))
    }

    /// Task that records its id and then fails with `message`.
    pub fn failing<A: Send + Sync + 'static>(self, log: &ExecutionLog, message: &str) -> Task<A> {
        self.with_body(RecordingBody::new(
            log.clone(),
            Behaviour::Fail(message.to_string()),
        ))
    }

    pub fn with_body<A, B>(self, body: B) -> Task<A>
    where
        B: TaskBody<A> + 'static,
    {
        Task::new(self.id, self.inputs, self.outputs, body)
    }
}
