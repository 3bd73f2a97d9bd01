#![allow(dead_code)]

use std::sync::Arc;

use globdag::fs::MockFileSystem;
use globdag::{Engine, Settings, Task};

use globdag_test_utils::TaskBuilder;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Engine rooted at `.` of an in-memory filesystem.
pub fn mock_engine(fs: &MockFileSystem) -> Engine<()> {
    Engine::with_file_system(Settings::new("."), (), Arc::new(fs.clone()))
        .expect("engine over mock filesystem")
}

/// Shorthand for a task with a no-op body.
pub fn noop(id: &str, inputs: &[&str], outputs: &[&str]) -> Task<()> {
    TaskBuilder::new(id).inputs(inputs).outputs(outputs).noop()
}

pub fn ids<A>(tasks: &[Arc<Task<A>>]) -> Vec<&str> {
    tasks.iter().map(|t| t.id()).collect()
}
