//! Header and shader staging.
//!
//! Populates the public staging layout from the private source trees:
//! headers keep their directory structure minus the leading module
//! segment, shaders are copied flat by base file name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::debug;

use crate::error::{BuildError, Result};

/// The triad of public output directories under the build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
  pub include_dir: PathBuf,
  pub shader_dir: PathBuf,
  pub lib_dir: PathBuf,
}

impl StagingLayout {
  pub fn new(build_root: &Path) -> Self {
    Self {
      include_dir: build_root.join("include"),
      shader_dir: build_root.join("shaders"),
      lib_dir: build_root.join("lib"),
    }
  }

  /// Create all three directories. Creating an existing one is a no-op.
  pub fn ensure(&self) -> Result<()> {
    for dir in [&self.include_dir, &self.shader_dir, &self.lib_dir] {
      create_dir_all(dir)?;
    }
    Ok(())
  }
}

/// Stage one header into the include directory, returning the staged path.
///
/// The header's path relative to `source_root` loses its leading segment,
/// the module directory marking it as library-private. A header sitting
/// directly under the root keeps its bare file name.
pub fn stage_header(source_root: &Path, header: &Path, include_dir: &Path) -> Result<PathBuf> {
  let relative = header.strip_prefix(source_root).unwrap_or(header);

  let mut components = relative.components();
  components.next();
  let remainder = components.as_path();

  let dest = if remainder.as_os_str().is_empty() {
    // Single segment: the header sits directly under the source root.
    include_dir.join(relative)
  } else {
    include_dir.join(remainder)
  };

  if let Some(parent) = dest.parent() {
    create_dir_all(parent)?;
  }
  copy_preserving_mtime(header, &dest)?;
  debug!(from = %header.display(), to = %dest.display(), "staged header");
  Ok(dest)
}

/// Stage one shader flatly into the shader directory under its base name.
///
/// Two shaders sharing a base name overwrite each other; the one staged
/// last wins.
pub fn stage_shader(shader: &Path, shader_dir: &Path) -> Result<PathBuf> {
  let file_name = shader.file_name().ok_or_else(|| BuildError::Staging {
    path: shader.to_path_buf(),
    source: io::Error::new(io::ErrorKind::InvalidInput, "shader path has no file name"),
  })?;

  let dest = shader_dir.join(file_name);
  copy_preserving_mtime(shader, &dest)?;
  debug!(from = %shader.display(), to = %dest.display(), "staged shader");
  Ok(dest)
}

fn create_dir_all(dir: &Path) -> Result<()> {
  fs::create_dir_all(dir).map_err(|source| BuildError::Staging { path: dir.to_path_buf(), source })
}

/// Copy `src` over `dest`, carrying the modification time along where
/// the filesystem allows it.
fn copy_preserving_mtime(src: &Path, dest: &Path) -> Result<()> {
  fs::copy(src, dest).map_err(|source| BuildError::Staging { path: src.to_path_buf(), source })?;

  let metadata = fs::metadata(src).map_err(|source| BuildError::Staging { path: src.to_path_buf(), source })?;
  let mtime = FileTime::from_last_modification_time(&metadata);
  // Best effort: some filesystems refuse timestamp updates.
  let _ = filetime::set_file_mtime(dest, mtime);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
  }

  #[test]
  fn leading_segment_is_dropped() {
    let temp = TempDir::new().unwrap();
    let src_root = temp.path().join("src");
    let include = temp.path().join("include");
    let header = write(&src_root, "core/pigment.h", "// core");

    stage_header(&src_root, &header, &include).unwrap();
    assert!(include.join("pigment.h").is_file());
    assert!(!include.join("core").exists());
  }

  #[test]
  fn deeper_structure_survives_past_the_first_segment() {
    let temp = TempDir::new().unwrap();
    let src_root = temp.path().join("src");
    let include = temp.path().join("include");
    let header = write(&src_root, "a/b/c.h", "// nested");

    let dest = stage_header(&src_root, &header, &include).unwrap();
    assert_eq!(dest, include.join("b").join("c.h"));
    assert!(dest.is_file());
  }

  #[test]
  fn root_level_header_keeps_its_name() {
    let temp = TempDir::new().unwrap();
    let src_root = temp.path().join("src");
    let include = temp.path().join("include");
    let header = write(&src_root, "pigment.h", "// top");

    let dest = stage_header(&src_root, &header, &include).unwrap();
    assert_eq!(dest, include.join("pigment.h"));
    assert!(dest.is_file());
  }

  #[test]
  fn shader_collision_is_last_write_wins() {
    let temp = TempDir::new().unwrap();
    let first = write(temp.path(), "a/tri.vert", "first");
    let second = write(temp.path(), "b/tri.vert", "second");
    let shader_dir = temp.path().join("shaders");
    fs::create_dir_all(&shader_dir).unwrap();

    stage_shader(&first, &shader_dir).unwrap();
    stage_shader(&second, &shader_dir).unwrap();

    let entries: Vec<_> = fs::read_dir(&shader_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(fs::read_to_string(shader_dir.join("tri.vert")).unwrap(), "second");
  }

  #[test]
  fn staging_twice_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let src_root = temp.path().join("src");
    let include = temp.path().join("include");
    let header = write(&src_root, "core/frame.h", "// frame");

    let dest = stage_header(&src_root, &header, &include).unwrap();
    let first = fs::read(&dest).unwrap();
    stage_header(&src_root, &header, &include).unwrap();
    let second = fs::read(&dest).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn mtime_is_carried_over() {
    let temp = TempDir::new().unwrap();
    let src_root = temp.path().join("src");
    let include = temp.path().join("include");
    let header = write(&src_root, "core/old.h", "// old");

    let past = FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(&header, past).unwrap();

    let dest = stage_header(&src_root, &header, &include).unwrap();
    let staged_mtime = FileTime::from_last_modification_time(&fs::metadata(&dest).unwrap());
    assert_eq!(staged_mtime.unix_seconds(), past.unix_seconds());
  }

  #[test]
  fn ensure_tolerates_existing_directories() {
    let temp = TempDir::new().unwrap();
    let layout = StagingLayout::new(temp.path());
    layout.ensure().unwrap();
    layout.ensure().unwrap();
    assert!(layout.include_dir.is_dir());
    assert!(layout.shader_dir.is_dir());
    assert!(layout.lib_dir.is_dir());
  }

  #[test]
  fn unreadable_source_is_a_staging_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("src/core/ghost.h");
    let err = stage_header(&temp.path().join("src"), &missing, &temp.path().join("include")).unwrap_err();
    assert!(matches!(err, BuildError::Staging { .. }));
  }
}
