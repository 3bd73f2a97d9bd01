// src/glob/mod.rs

//! Glob compilation and resolution.
//!
//! - [`patterns`] compiles patterns and answers pattern-text questions
//!   (self-overlap, literal paths) without touching the filesystem.
//! - [`resolver`] defines the [`GlobResolver`] seam and the default
//!   `globset`-backed tree walker.
//! - [`path_utils`] normalises paths relative to the working directory.

pub mod path_utils;
pub mod patterns;
pub mod resolver;

use std::sync::Arc;

use anyhow::Context;

use crate::errors::Result;

pub use patterns::{build_globset, compile_glob, find_self_overlap, is_literal, strip_dot_slash};
pub use resolver::{GlobResolver, GlobsetResolver};

/// Concrete files backing one task, relative to the working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFiles {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Resolve a task's input and output patterns. Inputs and outputs are
/// resolved concurrently on the blocking pool.
///
/// Output patterns without glob metacharacters are kept even when the file
/// does not exist yet: they name the file the task is expected to create.
pub async fn resolve_files_async(
    resolver: Arc<dyn GlobResolver>,
    inputs: Vec<String>,
    outputs: Vec<String>,
) -> Result<ResolvedFiles> {
    let in_resolver = Arc::clone(&resolver);
    let input_job = tokio::task::spawn_blocking(move || in_resolver.resolve(&inputs));

    let output_patterns = outputs.clone();
    let output_job = tokio::task::spawn_blocking(move || resolver.resolve(&output_patterns));

    let (inputs, resolved_outputs) = tokio::join!(input_job, output_job);
    let inputs = inputs.context("input glob resolution panicked")??;
    let mut resolved_outputs = resolved_outputs.context("output glob resolution panicked")??;
    append_literal_outputs(&mut resolved_outputs, &outputs);

    Ok(ResolvedFiles {
        inputs,
        outputs: resolved_outputs,
    })
}

fn append_literal_outputs(resolved: &mut Vec<String>, patterns: &[String]) {
    for pattern in patterns.iter().filter(|p| is_literal(p)) {
        let literal = strip_dot_slash(pattern);
        if !resolved.iter().any(|r| r == literal) {
            resolved.push(literal.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::types::Settings;

    #[tokio::test]
    async fn literal_outputs_are_kept_when_absent() {
        let fs = MockFileSystem::new();
        fs.add_file("src/app.ts", "");
        fs.add_file("dist/old.js", "");
        let resolver = GlobsetResolver::new(Arc::new(fs), &Settings::new(".")).unwrap();

        let resolved = resolve_files_async(
            Arc::new(resolver),
            vec!["src/*.ts".to_string()],
            vec!["dist/*.js".to_string(), "./dist/app.js".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(resolved.inputs, vec!["src/app.ts"]);
        assert_eq!(resolved.outputs, vec!["dist/old.js", "dist/app.js"]);
    }
}
