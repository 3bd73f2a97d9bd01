// src/glob/patterns.rs

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::errors::{GlobdagError, Result};

/// Characters that turn a pattern into a real glob.
const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Drop leading `./` segments; resolved paths never carry them.
pub fn strip_dot_slash(pattern: &str) -> &str {
    let mut rest = pattern;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest
}

/// Compile a single pattern.
///
/// `*` and `?` never cross a `/`; only `**` spans directories. A leading
/// `./` is ignored, so `./in.txt` matches the resolved path `in.txt`.
pub fn compile_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(strip_dot_slash(pattern))
        .literal_separator(true)
        .build()
        .map_err(|source| GlobdagError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

pub fn compile_matcher(pattern: &str) -> Result<GlobMatcher> {
    Ok(compile_glob(pattern)?.compile_matcher())
}

/// Build a GlobSet from simple string patterns.
pub fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(compile_glob(pat.as_ref())?);
    }
    builder.build().map_err(|source| GlobdagError::InvalidPattern {
        pattern: patterns
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        source,
    })
}

/// A pattern without glob metacharacters names exactly one path.
pub fn is_literal(pattern: &str) -> bool {
    !pattern.contains(GLOB_META)
}

/// The first output pattern of a task that equals, or glob-matches the text
/// of, one of its input patterns.
///
/// This compares pattern *text*; nothing is resolved against the filesystem.
pub fn find_self_overlap<'a>(inputs: &[String], outputs: &'a [String]) -> Result<Option<&'a str>> {
    for output in outputs {
        if inputs.iter().any(|input| input == output) {
            return Ok(Some(output.as_str()));
        }
        let matcher = compile_matcher(output)?;
        if inputs.iter().any(|input| matcher.is_match(strip_dot_slash(input))) {
            return Ok(Some(output.as_str()));
        }
    }
    Ok(None)
}
