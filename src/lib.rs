// src/lib.rs

//! Incremental task-dependency engine.
//!
//! Tasks declare input and output glob patterns. An output pattern of one
//! task appearing verbatim among the input patterns of another makes the
//! second depend on the first. [`Engine::run`] walks the tasks in
//! topological order and runs those whose outputs are older than their
//! inputs.
//!
//! ```no_run
//! use globdag::{Engine, RunOptions, Settings, Task};
//!
//! # async fn demo() -> globdag::errors::Result<()> {
//! let engine = Engine::new(Settings::new("site"), ())?;
//! engine.add(Task::from_fn("copy", ["*.md"], ["out.txt"], |ctx| async move {
//!     let mut text = String::new();
//!     for input in &ctx.inputs {
//!         text.push_str(&input.read().await?);
//!     }
//!     ctx.outputs[0].write(text).await?;
//!     anyhow::Ok(())
//! }))?;
//! engine.run(RunOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod glob;
pub mod logging;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{build_engine, load_and_validate};

pub use crate::engine::{Engine, RunDecision, TaskId};
pub use crate::errors::GlobdagError;
pub use crate::exec::{CommandTask, InputFile, OutputFile, Task, TaskBody, TaskContext};
pub use crate::types::{RunOptions, RunReport, Settings};

/// High-level entry point used by `main.rs`.
///
/// This wires together manifest loading, engine construction and a single
/// run pass (or a dry-run listing).
pub async fn run(args: CliArgs) -> Result<()> {
    let manifest_path = PathBuf::from(&args.config);
    let manifest = load_and_validate(&manifest_path)?;
    let engine = build_engine(&manifest, &manifest_path)?;

    if args.dry_run {
        print_dry_run(&engine)?;
        return Ok(());
    }

    let options = RunOptions { force: args.force };
    let report = engine.run(options).await?;

    info!(
        executed = ?report.executed,
        skipped = ?report.skipped,
        "globdag finished"
    );
    Ok(())
}

/// Simple dry-run output: tasks in execution order with their patterns.
fn print_dry_run(engine: &Engine<()>) -> Result<()> {
    let order = engine.get_topologically_sorted_list()?;

    println!("globdag dry-run");
    println!("  cwd = {}", engine.settings().cwd.display());
    if !engine.settings().ignore.is_empty() {
        println!("  ignore = {:?}", engine.settings().ignore);
    }
    println!();

    println!("execution order ({}):", order.len());
    for (pos, task) in order.iter().enumerate() {
        println!("  {}. {}", pos + 1, task.id());
        println!("      inputs: {:?}", task.inputs());
        println!("      outputs: {:?}", task.outputs());
        let (deps, _) = engine.neighbours_of(task.id());
        if !deps.is_empty() {
            println!("      after: {:?}", deps);
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
