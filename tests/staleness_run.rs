// tests/staleness_run.rs

mod common;
use crate::common::{TestResult, mock_engine};
use globdag_test_utils::{ExecutionLog, TaskBuilder, init_tracing};

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use globdag::fs::MockFileSystem;
use globdag::{Engine, GlobdagError, RunOptions, Settings, Task, TaskContext};

/// src/a.ts -> build/a.js -> dist/bundle.js
fn two_stage(fs: &MockFileSystem, log: &ExecutionLog) -> Engine<()> {
    fs.add_file("src/a.ts", "let a = 1;");
    fs.add_dir("build");
    fs.add_dir("dist");

    let engine = mock_engine(fs);
    engine
        .add(
            TaskBuilder::new("compile")
                .input("src/*.ts")
                .output("build/a.js")
                .writing(log),
        )
        .unwrap();
    engine
        .add(
            TaskBuilder::new("bundle")
                .input("build/a.js")
                .output("dist/bundle.js")
                .writing(log),
        )
        .unwrap();
    engine
}

#[tokio::test]
async fn first_run_executes_producers_before_consumers() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let log = ExecutionLog::new();
    let engine = two_stage(&fs, &log);

    let report = engine.run(RunOptions::default()).await?;

    assert_eq!(report.executed, vec!["compile", "bundle"]);
    assert!(report.skipped.is_empty());
    assert_eq!(log.entries(), vec!["compile", "bundle"]);
    assert_eq!(fs.contents("build/a.js").as_deref(), Some("let a = 1;"));
    assert_eq!(fs.contents("dist/bundle.js").as_deref(), Some("let a = 1;"));
    Ok(())
}

#[tokio::test]
async fn second_run_without_changes_does_nothing() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let log = ExecutionLog::new();
    let engine = two_stage(&fs, &log);

    engine.run(RunOptions::default()).await?;
    log.take();

    let report = engine.run(RunOptions::default()).await?;
    assert!(report.nothing_executed());
    assert_eq!(report.skipped, vec!["compile", "bundle"]);
    assert!(log.entries().is_empty());
    Ok(())
}

#[tokio::test]
async fn touched_input_reruns_the_whole_chain() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let log = ExecutionLog::new();
    let engine = two_stage(&fs, &log);

    engine.run(RunOptions::default()).await?;
    log.take();

    fs.touch("src/a.ts")?;
    let report = engine.run(RunOptions::default()).await?;
    assert_eq!(report.executed, vec!["compile", "bundle"]);
    assert_eq!(log.entries(), vec!["compile", "bundle"]);
    Ok(())
}

#[tokio::test]
async fn touched_intermediate_only_reruns_downstream() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let log = ExecutionLog::new();
    let engine = two_stage(&fs, &log);

    engine.run(RunOptions::default()).await?;
    log.take();

    fs.touch("build/a.js")?;
    let report = engine.run(RunOptions::default()).await?;
    assert_eq!(report.executed, vec!["bundle"]);
    assert_eq!(report.skipped, vec!["compile"]);
    Ok(())
}

#[tokio::test]
async fn force_runs_up_to_date_tasks() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let log = ExecutionLog::new();
    let engine = two_stage(&fs, &log);

    engine.run(RunOptions::default()).await?;
    log.take();

    let report = engine.run(RunOptions::forced()).await?;
    assert_eq!(report.executed, vec!["compile", "bundle"]);
    assert_eq!(log.entries(), vec!["compile", "bundle"]);
    Ok(())
}

#[tokio::test]
async fn failing_task_stops_the_pass() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("src/a.ts", "");
    let log = ExecutionLog::new();
    let engine = mock_engine(&fs);

    engine.add(
        TaskBuilder::new("compile")
            .input("src/*.ts")
            .output("build/a.js")
            .failing(&log, "tsc exited with 2"),
    )?;
    engine.add(
        TaskBuilder::new("bundle")
            .input("build/a.js")
            .output("dist/bundle.js")
            .recorded(&log),
    )?;

    let err = engine.run(RunOptions::default()).await.unwrap_err();
    match err {
        GlobdagError::TaskFailed(ref id, ref cause) => {
            assert_eq!(id, "compile");
            assert!(cause.to_string().contains("tsc exited with 2"));
        }
        other => panic!("Expected TaskFailed error, got: {:?}", other),
    }
    assert!(!err.is_structural());
    assert_eq!(log.entries(), vec!["compile"]);
    Ok(())
}

#[tokio::test]
async fn stale_glob_output_triggers_a_run() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("a.js", "old");
    fs.add_file("a.ts", "new");
    let log = ExecutionLog::new();
    let engine = mock_engine(&fs);

    engine.add(TaskBuilder::new("tsc").input("*.ts").output("*.js").recorded(&log))?;

    let report = engine.run(RunOptions::default()).await?;
    assert_eq!(report.executed, vec!["tsc"]);
    Ok(())
}

#[tokio::test]
async fn fresh_glob_output_is_skipped() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("a.ts", "new");
    fs.add_file("a.js", "built");
    let log = ExecutionLog::new();
    let engine = mock_engine(&fs);

    engine.add(TaskBuilder::new("tsc").input("*.ts").output("*.js").recorded(&log))?;

    let report = engine.run(RunOptions::default()).await?;
    assert_eq!(report.skipped, vec!["tsc"]);
    assert!(log.entries().is_empty());
    Ok(())
}

#[tokio::test]
async fn equal_timestamps_do_not_trigger_a_run() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    let same = UNIX_EPOCH + Duration::from_secs(42_000_000);
    fs.add_file_at("a.ts", "", same);
    fs.add_file_at("a.js", "", same);
    let log = ExecutionLog::new();
    let engine = mock_engine(&fs);

    engine.add(TaskBuilder::new("tsc").input("*.ts").output("*.js").recorded(&log))?;

    let report = engine.run(RunOptions::default()).await?;
    assert!(report.nothing_executed());
    Ok(())
}

#[tokio::test]
async fn tasks_without_existing_outputs_always_run() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("a.ts", "");
    let log = ExecutionLog::new();
    let engine = mock_engine(&fs);

    engine.add(TaskBuilder::new("lint").input("*.ts").recorded(&log))?;
    engine.add(TaskBuilder::new("docs").input("*.ts").output("*.html").recorded(&log))?;

    for _ in 0..2 {
        let report = engine.run(RunOptions::default()).await?;
        assert_eq!(report.executed, vec!["lint", "docs"]);
    }
    assert_eq!(log.entries(), vec!["lint", "docs", "lint", "docs"]);
    Ok(())
}

#[tokio::test]
async fn bodies_receive_resolved_handles_and_extra_args() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("pages/b.md", "# B");
    fs.add_file("pages/a.md", "# A");
    fs.add_dir("site");

    let engine = Engine::with_file_system(
        Settings::new("."),
        String::from("release"),
        Arc::new(fs.clone()),
    )?;

    let seen = ExecutionLog::new();
    let record = seen.clone();
    engine.add(Task::from_fn(
        "render",
        ["pages/*.md"],
        ["site/index.html"],
        move |ctx: TaskContext<String>| {
            let record = record.clone();
            async move {
                record.record(&format!("{}:{}", ctx.task, ctx.args));
                let mut page = String::new();
                for input in &ctx.inputs {
                    record.record(input.relative());
                    page.push_str(&input.read().await?);
                }
                ctx.outputs[0].write(page).await?;
                anyhow::Ok(())
            }
        },
    ))?;

    engine.run(RunOptions::default()).await?;

    assert_eq!(
        seen.entries(),
        vec!["render:release", "pages/a.md", "pages/b.md"]
    );
    assert_eq!(fs.contents("site/index.html").as_deref(), Some("# A# B"));
    Ok(())
}

#[tokio::test]
async fn dot_slash_inputs_take_part_in_the_check() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("out.txt", "stale");
    fs.add_file("in.txt", "fresh");
    let log = ExecutionLog::new();
    let engine = mock_engine(&fs);

    engine.add(TaskBuilder::new("t").input("./in.txt").output("out.txt").writing(&log))?;

    let resolved = engine.refresh_globs_for_task("t").await?;
    assert_eq!(resolved.inputs, vec!["in.txt"]);

    let report = engine.run(RunOptions::default()).await?;
    assert_eq!(report.executed, vec!["t"]);
    assert_eq!(fs.contents("out.txt").as_deref(), Some("fresh"));
    Ok(())
}
