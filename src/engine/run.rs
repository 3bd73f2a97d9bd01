// src/engine/run.rs

//! Run orchestration: one sequential pass over the topological order.

use tracing::{debug, info, warn};

use crate::engine::core::Engine;
use crate::engine::staleness::{self, RunDecision};
use crate::errors::Result;
use crate::exec::adapter;
use crate::types::{RunOptions, RunReport};

impl<A> Engine<A>
where
    A: Send + Sync + 'static,
{
    /// Execute every due task once, producers first.
    ///
    /// The order is computed once at the start. Each task is resolved and
    /// checked right before it would run, so files written by an upstream
    /// task in this pass are visible to the check of its consumers. The
    /// first body failure stops the pass; later tasks are not executed.
    pub async fn run(&self, options: RunOptions) -> Result<RunReport> {
        let order = self.get_topologically_sorted_list()?;
        info!(tasks = order.len(), force = options.force, "starting run");

        let mut report = RunReport::default();

        for task in order {
            let resolved = self.resolve(&task).await?;
            let decision =
                staleness::evaluate(&self.fs, &self.settings.cwd, &resolved, options.force).await;

            if !decision.must_run() {
                debug!(task = %task.id(), "up to date; skipping");
                report.skipped.push(task.id().to_string());
                continue;
            }

            match decision {
                RunDecision::Forced => info!(task = %task.id(), "running (forced)"),
                RunDecision::MissingOutputs => info!(task = %task.id(), "running (outputs missing)"),
                _ => info!(task = %task.id(), "running (outputs older than inputs)"),
            }

            if let Err(err) =
                adapter::execute(&task, &resolved, &self.settings.cwd, &self.fs, &self.args).await
            {
                warn!(
                    task = %task.id(),
                    executed = report.executed.len(),
                    "run aborted by task failure"
                );
                return Err(err);
            }
            report.executed.push(task.id().to_string());
        }

        info!(
            executed = report.executed.len(),
            skipped = report.skipped.len(),
            "run finished"
        );
        Ok(report)
    }
}
