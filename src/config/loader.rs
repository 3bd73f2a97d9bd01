// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{Manifest, RawManifest};
use crate::engine::Engine;
use crate::errors::Result;
use crate::exec::{CommandTask, Task};

/// Load a manifest from a given path and return the raw `RawManifest`.
///
/// This only performs TOML deserialization; it does **not** perform
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawManifest> {
    let contents = fs::read_to_string(path.as_ref())?;
    let manifest: RawManifest = toml::from_str(&contents)?;
    Ok(manifest)
}

/// Load a manifest from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Manifest> {
    let raw = load_from_path(&path)?;
    Manifest::try_from(raw)
}

/// Build an engine whose tasks run the manifest's shell commands, registered
/// in file order.
pub fn build_engine(manifest: &Manifest, manifest_path: &Path) -> Result<Engine<()>> {
    let engine = Engine::new(manifest.settings_for(manifest_path), ())?;

    for entry in manifest.tasks() {
        debug!(task = %entry.id, cmd = %entry.cmd, "registering manifest task");
        engine.add(Task::new(
            entry.id.clone(),
            entry.inputs.iter().cloned(),
            entry.outputs.iter().cloned(),
            CommandTask::new(entry.cmd.clone()),
        ))?;
    }

    Ok(engine)
}
