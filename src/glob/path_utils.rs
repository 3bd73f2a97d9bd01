// src/glob/path_utils.rs

//! Utility functions for path handling.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Relative paths are taken as already relative to `root`. Absolute paths are
/// stripped of `root`, first directly and then after canonicalizing both
/// sides (symlinked temp dirs on macOS, `/private/var/...`).
///
/// Returns `None` if the path cannot be reasonably related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if path.is_relative() {
        let s = path.to_string_lossy().replace('\\', "/");
        return Some(s.strip_prefix("./").map(str::to_string).unwrap_or(s));
    }

    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(to_slash(rel));
        }
    }

    None
}

pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
