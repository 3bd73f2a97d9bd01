use std::sync::{Arc, Mutex};

use anyhow::bail;
use globdag::exec::{TaskBody, TaskContext, TaskFuture};

/// Shared, ordered record of which task bodies ran.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, id: &str) {
        self.entries.lock().unwrap().push(id.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Return the entries recorded so far and start over.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.lock().unwrap())
    }
}

/// What a [`RecordingBody`] does after recording its task id.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Nothing else.
    Record,
    /// Write every resolved output with the concatenated input contents
    /// (or the task id when there are no inputs).
    WriteOutputs,
    /// Fail with the given message.
    Fail(String),
}

/// A fake task body that:
/// - records which tasks were "run"
/// - optionally produces its outputs or fails.
pub struct RecordingBody {
    log: ExecutionLog,
    behaviour: Behaviour,
}

impl RecordingBody {
    pub fn new(log: ExecutionLog, behaviour: Behaviour) -> Self {
        Self { log, behaviour }
    }
}

impl<A: Send + Sync + 'static> TaskBody<A> for RecordingBody {
    fn run(&self, ctx: TaskContext<A>) -> TaskFuture<'_> {
        Box::pin(async move {
            self.log.record(&ctx.task);

            match &self.behaviour {
                Behaviour::Record => {}
                Behaviour::WriteOutputs => {
                    let mut text = String::new();
                    for input in &ctx.inputs {
                        text.push_str(&input.read().await?);
                    }
                    if text.is_empty() {
                        text = ctx.task.clone();
                    }
                    for output in &ctx.outputs {
                        output.write(text.clone()).await?;
                    }
                }
                Behaviour::Fail(message) => bail!("{message}"),
            }
            anyhow::Ok(())
        })
    }
}
