// tests/refresh_and_lookup.rs

mod common;
use crate::common::{TestResult, ids, mock_engine, noop};
use globdag_test_utils::init_tracing;

use std::sync::Arc;

use globdag::fs::MockFileSystem;
use globdag::glob::ResolvedFiles;
use globdag::{Engine, GlobdagError, Settings};

#[tokio::test]
async fn refresh_of_unknown_task_fails() {
    init_tracing();
    let engine = mock_engine(&MockFileSystem::new());

    let err = engine.refresh_globs_for_task("ghost").await.unwrap_err();
    assert!(matches!(err, GlobdagError::TaskNotFound(ref id) if id == "ghost"));
    assert!(err.is_structural());
}

#[tokio::test]
async fn refresh_resolves_and_caches_files() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("src/b.ts", "");
    fs.add_file("src/a.ts", "");
    fs.add_file("dist/a.js", "");
    let engine = mock_engine(&fs);

    engine.add(noop("tsc", &["src/*.ts"], &["dist/*.js", "dist/index.d.ts"]))?;
    assert!(engine.resolved_files("tsc").is_none());

    let resolved = engine.refresh_globs_for_task("tsc").await?;
    let expected = ResolvedFiles {
        inputs: vec!["src/a.ts".into(), "src/b.ts".into()],
        outputs: vec!["dist/a.js".into(), "dist/index.d.ts".into()],
    };
    assert_eq!(resolved, expected);
    assert_eq!(engine.resolved_files("tsc"), Some(expected));
    Ok(())
}

#[tokio::test]
async fn refresh_all_picks_up_new_files() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("a.md", "");
    let engine = mock_engine(&fs);

    engine.add(noop("render", &["*.md"], &["*.html"]))?;
    engine.add(noop("zip", &["*.html"], &["site.zip"]))?;
    engine.refresh_globs().await?;
    assert_eq!(engine.resolved_files("render").unwrap().inputs, vec!["a.md"]);
    assert!(engine.resolved_files("zip").unwrap().inputs.is_empty());

    fs.add_file("b.md", "");
    fs.add_file("a.html", "");
    engine.refresh_globs().await?;
    assert_eq!(
        engine.resolved_files("render").unwrap().inputs,
        vec!["a.md", "b.md"]
    );
    assert_eq!(engine.resolved_files("zip").unwrap().inputs, vec!["a.html"]);
    Ok(())
}

#[tokio::test]
async fn ignore_rules_hide_files_from_every_task() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("src/app.ts", "");
    fs.add_file("node_modules/lib/index.ts", "");
    let settings = Settings::new(".").with_ignore(["node_modules/**"]);
    let engine = Engine::with_file_system(settings, (), Arc::new(fs.clone()))?;

    engine.add(noop("tsc", &["**/*.ts"], &["out.js"]))?;
    let resolved = engine.refresh_globs_for_task("tsc").await?;
    assert_eq!(resolved.inputs, vec!["src/app.ts"]);
    Ok(())
}

#[test]
fn lookup_by_path_returns_consumers_in_insertion_order() -> TestResult {
    init_tracing();
    let engine = mock_engine(&MockFileSystem::new());

    engine.add(noop("lint", &["src/**/*.ts"], &["lint.log"]))?;
    engine.add(noop("docs", &["*.md"], &["docs.html"]))?;
    engine.add(noop("tsc", &["src/*.ts", "src/**/*.ts"], &["out.js"]))?;

    let hits = engine.get_tasks_by_glob("src/main.ts")?;
    assert_eq!(ids(&hits), vec!["lint", "tsc"]);

    let hits = engine.get_tasks_by_glob("./README.md")?;
    assert_eq!(ids(&hits), vec!["docs"]);

    assert!(engine.get_tasks_by_glob("Cargo.toml")?.is_empty());
    Ok(())
}

#[test]
fn single_star_does_not_cross_directories() -> TestResult {
    init_tracing();
    let engine = mock_engine(&MockFileSystem::new());

    engine.add(noop("top", &["*.ts"], &["out.js"]))?;
    assert!(engine.get_tasks_by_glob("src/main.ts")?.is_empty());
    assert_eq!(ids(&engine.get_tasks_by_glob("main.ts")?), vec!["top"]);
    Ok(())
}

#[test]
fn absolute_paths_are_taken_relative_to_cwd() -> TestResult {
    init_tracing();
    let root = std::env::temp_dir().join("globdag-lookup");
    let engine = Engine::with_file_system(
        Settings::new(&root),
        (),
        Arc::new(MockFileSystem::new()),
    )?;

    engine.add(noop("tsc", &["src/*.ts"], &["out.js"]))?;

    let hits = engine.get_tasks_by_glob(root.join("src/main.ts"))?;
    assert_eq!(ids(&hits), vec!["tsc"]);

    let elsewhere = std::env::temp_dir().join("somewhere-else/src/main.ts");
    assert!(engine.get_tasks_by_glob(elsewhere)?.is_empty());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_directory_loops_are_not_followed() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("a.ts"), "")?;
    std::fs::create_dir(dir.path().join("src"))?;
    std::fs::write(dir.path().join("src/b.ts"), "")?;
    std::os::unix::fs::symlink(dir.path(), dir.path().join("loop"))?;

    let engine = Engine::new(Settings::new(dir.path()), ())?;
    engine.add(noop("tsc", &["**/*.ts"], &["out.js"]))?;

    let resolved = engine.refresh_globs_for_task("tsc").await?;
    assert_eq!(resolved.inputs, vec!["a.ts", "src/b.ts"]);
    Ok(())
}
