//! Source artifact discovery.
//!
//! Walks a directory tree and returns the files matching a small
//! glob-style pattern. Three shapes cover every pipeline call site:
//! `**/*.c` (recursive, by extension), `*.c` (flat, by extension) and
//! `*` (flat, every file).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{BuildError, Result};

/// A parsed discovery pattern: an optional recursive prefix plus a
/// file-name glob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pattern<'a> {
  recursive: bool,
  file_glob: &'a str,
}

impl<'a> Pattern<'a> {
  fn parse(pattern: &'a str) -> Self {
    match pattern.strip_prefix("**/") {
      Some(rest) => Self { recursive: true, file_glob: rest },
      None => Self { recursive: false, file_glob: pattern },
    }
  }

  fn matches(&self, file_name: &str) -> bool {
    match self.file_glob.strip_prefix('*') {
      Some("") => true,
      Some(suffix) => file_name.ends_with(suffix),
      None => file_name == self.file_glob,
    }
  }
}

/// Find every file under `root` matching `pattern`.
///
/// Results are sorted lexicographically so repeated calls within one
/// invocation observe the same order. A root that does not exist, or
/// matches nothing, yields an empty set rather than an error.
pub fn find_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
  if !root.is_dir() {
    return Ok(Vec::new());
  }

  let pattern = Pattern::parse(pattern);
  let max_depth = if pattern.recursive { usize::MAX } else { 1 };

  let mut files = Vec::new();
  for entry in WalkDir::new(root).max_depth(max_depth).sort_by_file_name() {
    let entry = entry.map_err(|source| BuildError::Walk { root: root.to_path_buf(), source })?;
    if !entry.file_type().is_file() {
      continue;
    }
    let file_name = entry.file_name().to_string_lossy();
    if pattern.matches(&file_name) {
      files.push(entry.into_path());
    }
  }

  // sort_by_file_name orders siblings; sort the flat list as well so the
  // order is stable across directories.
  files.sort();
  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"").unwrap();
  }

  #[test]
  fn recursive_pattern_finds_nested_sources() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "core/a.c");
    touch(temp.path(), "core/deep/b.c");
    touch(temp.path(), "core/deep/b.h");
    touch(temp.path(), "top.c");

    let found = find_files(temp.path(), "**/*.c").unwrap();
    let names: Vec<_> = found
      .iter()
      .map(|p| p.strip_prefix(temp.path()).unwrap().to_string_lossy().replace('\\', "/"))
      .collect();
    assert_eq!(names, vec!["core/a.c", "core/deep/b.c", "top.c"]);
  }

  #[test]
  fn flat_wildcard_ignores_subdirectories() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "tri.vert");
    touch(temp.path(), "tri.frag");
    touch(temp.path(), "nested/skip.vert");

    let found = find_files(temp.path(), "*").unwrap();
    let names: Vec<_> = found.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
    assert_eq!(names, vec!["tri.frag", "tri.vert"]);
  }

  #[test]
  fn missing_root_yields_empty_set() {
    let temp = TempDir::new().unwrap();
    let found = find_files(&temp.path().join("nope"), "**/*.c").unwrap();
    assert!(found.is_empty());
  }

  #[test]
  fn no_matches_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "readme.txt");
    let found = find_files(temp.path(), "**/*.c").unwrap();
    assert!(found.is_empty());
  }

  #[test]
  fn ordering_is_stable_across_calls() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "b/z.c");
    touch(temp.path(), "a/y.c");
    touch(temp.path(), "a/x.c");

    let first = find_files(temp.path(), "**/*.c").unwrap();
    let second = find_files(temp.path(), "**/*.c").unwrap();
    assert_eq!(first, second);
  }
}
