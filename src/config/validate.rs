// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{Manifest, RawManifest};
use crate::errors::{GlobdagError, Result};

impl TryFrom<RawManifest> for Manifest {
    type Error = GlobdagError;

    fn try_from(raw: RawManifest) -> std::result::Result<Self, Self::Error> {
        validate_manifest(&raw)?;
        Ok(Manifest::new_unchecked(raw.settings, raw.tasks))
    }
}

/// Checks that need nothing but the manifest itself. Graph rules
/// (self-dependency, cycles, bad globs) are enforced when the tasks are
/// registered with an engine.
pub fn validate_manifest(raw: &RawManifest) -> Result<()> {
    ensure_has_tasks(raw)?;
    validate_task_entries(raw)?;
    Ok(())
}

fn ensure_has_tasks(raw: &RawManifest) -> Result<()> {
    if raw.tasks.is_empty() {
        return Err(GlobdagError::ConfigError(
            "manifest must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_entries(raw: &RawManifest) -> Result<()> {
    let mut seen = HashSet::new();

    for (idx, task) in raw.tasks.iter().enumerate() {
        if task.id.trim().is_empty() {
            return Err(GlobdagError::ConfigError(format!(
                "task #{} has an empty `id`",
                idx + 1
            )));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(GlobdagError::ConfigError(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
        if task.cmd.trim().is_empty() {
            return Err(GlobdagError::ConfigError(format!(
                "task '{}' has an empty `cmd`",
                task.id
            )));
        }
    }
    Ok(())
}
