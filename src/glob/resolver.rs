// src/glob/resolver.rs

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::GlobSet;
use tracing::{debug, trace};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::glob::path_utils::to_slash;
use crate::glob::patterns::{build_globset, compile_matcher};
use crate::types::Settings;

/// Expands glob patterns into concrete files under a root directory.
///
/// Implementations return paths relative to the root, with forward slashes,
/// deduplicated, honouring whatever ignore rules they were built with. Only
/// files that currently exist are returned.
pub trait GlobResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, patterns: &[String]) -> Result<Vec<String>>;
}

/// Default resolver: walks the tree through a [`FileSystem`] and matches
/// relative paths with `globset`.
///
/// Results are grouped per pattern (in pattern order), sorted within a
/// pattern, and a file matched by several patterns appears once, at its
/// first match.
#[derive(Clone)]
pub struct GlobsetResolver {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    ignore: Option<GlobSet>,
}

impl fmt::Debug for GlobsetResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobsetResolver")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GlobsetResolver {
    pub fn new(fs: Arc<dyn FileSystem>, settings: &Settings) -> Result<Self> {
        let ignore = if settings.ignore.is_empty() {
            None
        } else {
            Some(build_globset(settings.ignore.as_slice())?)
        };

        Ok(Self {
            fs,
            root: settings.cwd.clone(),
            ignore,
        })
    }

    fn is_ignored(&self, rel: &str) -> bool {
        self.ignore.as_ref().is_some_and(|set| set.is_match(rel))
    }

    /// Every non-ignored file under the root, as sorted relative paths.
    fn walk(&self) -> Result<Vec<String>> {
        if !self.fs.is_dir(&self.root) {
            debug!(root = ?self.root, "glob root is not a directory; nothing to resolve");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut stack = vec![self.root.clone()];

        while let Some(dir) = stack.pop() {
            for path in self.fs.read_dir(&dir)? {
                let Some(rel) = self.relative(&path) else {
                    continue;
                };
                if self.is_ignored(&rel) {
                    trace!(path = %rel, "ignored");
                    continue;
                }
                if self.fs.is_dir(&path) {
                    // Linked directories can loop back into the tree.
                    if self.fs.is_symlink(&path) {
                        trace!(path = %rel, "skipping symlinked directory");
                        continue;
                    }
                    stack.push(path);
                } else if self.fs.is_file(&path) {
                    files.push(rel);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn relative(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root).ok().map(to_slash)
    }
}

impl GlobResolver for GlobsetResolver {
    fn resolve(&self, patterns: &[String]) -> Result<Vec<String>> {
        if patterns.is_empty() {
            return Ok(Vec::new());
        }

        let matchers = patterns
            .iter()
            .map(|p| compile_matcher(p))
            .collect::<Result<Vec<_>>>()?;
        let files = self.walk()?;

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();
        for matcher in &matchers {
            for file in files.iter().filter(|f| matcher.is_match(f.as_str())) {
                if seen.insert(file.as_str()) {
                    resolved.push(file.clone());
                }
            }
        }

        debug!(?patterns, count = resolved.len(), "resolved glob patterns");
        Ok(resolved)
    }
}
