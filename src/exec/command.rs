// src/exec/command.rs

//! Shell-command task bodies, used by the manifest-driven binary.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::exec::task::{TaskBody, TaskContext, TaskFuture};

/// Environment variable holding the task id.
pub const ENV_TASK: &str = "GLOBDAG_TASK";
/// Environment variable holding newline-separated resolved input paths.
pub const ENV_INPUTS: &str = "GLOBDAG_INPUTS";
/// Environment variable holding newline-separated resolved output paths.
pub const ENV_OUTPUTS: &str = "GLOBDAG_OUTPUTS";

/// Runs `cmd` through the platform shell inside the engine's working
/// directory. A non-zero exit status is a task failure.
#[derive(Debug, Clone)]
pub struct CommandTask {
    cmd: String,
}

impl CommandTask {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }
}

impl<A: Send + Sync + 'static> TaskBody<A> for CommandTask {
    fn run(&self, ctx: TaskContext<A>) -> TaskFuture<'_> {
        Box::pin(async move { run_command(&self.cmd, ctx).await })
    }
}

async fn run_command<A>(cmd_line: &str, ctx: TaskContext<A>) -> Result<()> {
    info!(task = %ctx.task, cmd = %cmd_line, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    };

    let inputs: Vec<&str> = ctx.inputs.iter().map(|f| f.relative()).collect();
    let outputs: Vec<&str> = ctx.outputs.iter().map(|f| f.relative()).collect();

    cmd.current_dir(&ctx.cwd)
        .env(ENV_TASK, &ctx.task)
        .env(ENV_INPUTS, inputs.join("\n"))
        .env(ENV_OUTPUTS, outputs.join("\n"))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", ctx.task))?;

    // Always consume both pipes so buffers don't fill.
    let stdout_log = child.stdout.take().map(|stdout| {
        let task = ctx.task.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(task = %task, "stdout: {}", line);
            }
        })
    });
    let stderr_log = child.stderr.take().map(|stderr| {
        let task = ctx.task.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task, "stderr: {}", line);
            }
        })
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{}'", ctx.task))?;

    for handle in [stdout_log, stderr_log].into_iter().flatten() {
        let _ = handle.await;
    }

    let code = status.code().unwrap_or(-1);
    info!(
        task = %ctx.task,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    if !status.success() {
        bail!("command `{cmd_line}` exited with status {code}");
    }
    Ok(())
}
