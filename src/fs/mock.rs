// src/fs/mock.rs

use super::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Base of the logical clock, far enough from the epoch that a missing file
/// (treated as the epoch) is always older than any mock file.
const CLOCK_BASE_SECS: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem with a logical modification clock.
///
/// Every `add_file` / `write` stamps the file with the next tick, so a file
/// written later is always strictly newer than one written before it.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    clock: Arc<AtomicU64>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            clock: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Add a file stamped with the next clock tick.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let modified = self.tick();
        self.add_file_at(path, content, modified);
    }

    /// Add a file with an explicit modification time.
    pub fn add_file_at(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        modified: SystemTime,
    ) {
        let path = normalize(path.as_ref());
        let mut files = self.lock();
        Self::ensure_parent(&mut files, &path);
        files.insert(
            path,
            MockEntry::File {
                content: content.into(),
                modified,
            },
        );
    }

    /// Bump a file's modification time to the next tick.
    pub fn touch(&self, path: impl AsRef<Path>) -> io::Result<SystemTime> {
        let path = normalize(path.as_ref());
        let now = self.tick();
        let mut files = self.lock();
        match files.get_mut(&path) {
            Some(MockEntry::File { modified, .. }) => {
                *modified = now;
                Ok(now)
            }
            Some(MockEntry::Dir(_)) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    /// Current content of a file, if present (for assertions in tests).
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = normalize(path.as_ref());
        match self.lock().get(&path) {
            Some(MockEntry::File { content, .. }) => String::from_utf8(content.clone()).ok(),
            _ => None,
        }
    }

    /// Create an empty directory (and its parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let mut files = self.lock();
        Self::ensure_dir_entry(&mut files, &path);
    }

    fn tick(&self) -> SystemTime {
        let n = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        UNIX_EPOCH + Duration::from_secs(CLOCK_BASE_SECS + n)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn ensure_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if let Some(parent) = parent_of(path) {
            Self::ensure_dir_entry(files, &parent);
            Self::link_child(files, &parent, path);
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        Self::ensure_parent(files, path);
    }

    fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = normalize(path);
        match self.lock().get(&path) {
            Some(MockEntry::File { content, .. }) => String::from_utf8(content.clone())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Some(MockEntry::Dir(_)) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let path = normalize(path);
        let modified = self.tick();
        let mut files = self.lock();

        if let Some(MockEntry::Dir(_)) = files.get(&path) {
            return Err(is_a_directory(&path));
        }
        if let Some(parent) = parent_of(&path) {
            if !matches!(files.get(&parent), Some(MockEntry::Dir(_))) {
                return Err(not_found(&parent));
            }
            Self::link_child(&mut files, &parent, &path);
        }

        files.insert(
            path,
            MockEntry::File {
                content: contents.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        let path = normalize(path);
        match self.lock().get(&path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Ok(UNIX_EPOCH),
            None => Err(not_found(&path)),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(&normalize(path)), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(&normalize(path)), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        match self.lock().get(&normalize(path)) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory or not found: {:?}", path),
            )),
        }
    }
}

/// Drop `.` components so `./src/a.ts` and `src/a.ts` share one key.
fn normalize(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    let parent = if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    };
    // Avoid infinite loop at root
    if parent == path { None } else { Some(parent) }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("file not found: {:?}", path))
}

fn is_a_directory(path: &Path) -> io::Error {
    io::Error::other(format!("is a directory: {:?}", path))
}
