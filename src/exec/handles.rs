// src/exec/handles.rs

//! Read/write handles for the resolved files of a task.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::fs::FileSystem;

/// Shared state of both handle kinds.
#[derive(Clone)]
struct FileRef {
    relative: String,
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl FileRef {
    fn new(cwd: &Path, relative: &str, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            relative: relative.to_string(),
            path: cwd.join(relative),
            fs,
        }
    }

    fn name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or(&self.relative)
    }
}

/// A resolved input file. Reading a missing or unreadable file fails with
/// the underlying I/O error.
#[derive(Clone)]
pub struct InputFile(FileRef);

impl InputFile {
    pub fn new(cwd: &Path, relative: &str, fs: Arc<dyn FileSystem>) -> Self {
        Self(FileRef::new(cwd, relative, fs))
    }

    /// File name without directories, e.g. `main.ts`.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Path relative to the working directory, as resolved from the globs.
    pub fn relative(&self) -> &str {
        &self.0.relative
    }

    /// Path joined onto the working directory.
    pub fn path(&self) -> &Path {
        &self.0.path
    }

    pub async fn read(&self) -> io::Result<String> {
        let fs = Arc::clone(&self.0.fs);
        let path = self.0.path.clone();
        tokio::task::spawn_blocking(move || fs.read_to_string(&path))
            .await
            .map_err(io::Error::other)?
    }
}

/// A resolved output file. Writing creates the file when absent; the parent
/// directory must already exist.
#[derive(Clone)]
pub struct OutputFile(FileRef);

impl OutputFile {
    pub fn new(cwd: &Path, relative: &str, fs: Arc<dyn FileSystem>) -> Self {
        Self(FileRef::new(cwd, relative, fs))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn relative(&self) -> &str {
        &self.0.relative
    }

    pub fn path(&self) -> &Path {
        &self.0.path
    }

    pub async fn write(&self, data: impl Into<String>) -> io::Result<()> {
        let fs = Arc::clone(&self.0.fs);
        let path = self.0.path.clone();
        let data = data.into();
        tokio::task::spawn_blocking(move || fs.write(&path, data.as_bytes()))
            .await
            .map_err(io::Error::other)?
    }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InputFile").field(&self.0.path).finish()
    }
}

impl fmt::Debug for OutputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OutputFile").field(&self.0.path).finish()
    }
}
