// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::Settings;

/// Manifest as read from a TOML file, before validation.
///
/// ```toml
/// [settings]
/// cwd = "."
/// ignore = ["target/**"]
///
/// [[task]]
/// id = "compile"
/// inputs = ["src/*.ts"]
/// outputs = ["dist/*.js"]
/// cmd = "tsc"
/// ```
///
/// Tasks are an array of tables so that file order is registration order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawManifest {
    #[serde(default)]
    pub settings: SettingsSection,

    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskEntry>,
}

/// `[settings]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsSection {
    /// Working directory. Relative paths are taken relative to the manifest's
    /// directory; when absent the manifest's directory itself is used.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Patterns excluded from every glob resolution.
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskEntry {
    pub id: String,

    #[serde(default)]
    pub inputs: Vec<String>,

    #[serde(default)]
    pub outputs: Vec<String>,

    /// Shell command run when the task is due.
    pub cmd: String,
}

/// A validated manifest. Construct through `Manifest::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct Manifest {
    settings: SettingsSection,
    tasks: Vec<TaskEntry>,
}

impl Manifest {
    pub(crate) fn new_unchecked(settings: SettingsSection, tasks: Vec<TaskEntry>) -> Self {
        Self { settings, tasks }
    }

    pub fn settings_section(&self) -> &SettingsSection {
        &self.settings
    }

    pub fn tasks(&self) -> &[TaskEntry] {
        &self.tasks
    }

    /// Engine settings with `cwd` anchored at the directory holding the
    /// manifest.
    pub fn settings_for(&self, manifest_path: &Path) -> Settings {
        let root = manifest_root_dir(manifest_path);
        let cwd = match &self.settings.cwd {
            Some(cwd) if cwd.is_absolute() => cwd.clone(),
            Some(cwd) => root.join(cwd),
            None => root,
        };
        Settings::new(cwd).with_ignore(self.settings.ignore.iter().cloned())
    }
}

/// Figure out the directory a manifest lives in.
///
/// - If the path has a non-empty parent (e.g. "build/Globdag.toml"), we use
///   that directory.
/// - If it's just a bare filename like "Globdag.toml" (parent = ""), we fall
///   back to the current working directory.
pub fn manifest_root_dir(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
