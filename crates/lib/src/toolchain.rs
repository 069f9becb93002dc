//! Compiler, archiver and linker invocation.
//!
//! The toolchain itself is an external collaborator; these wrappers only
//! build argument lists from a `BuildConfig` and translate non-zero
//! exits into typed errors. Compilation and linking are blocking,
//! bounded-duration operations.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::error::{BuildError, Result};

/// The C compiler and archiver used for every build step.
#[derive(Debug, Clone)]
pub struct Toolchain {
  cc: String,
  ar: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self::from_env()
  }
}

impl Toolchain {
  /// Resolve from `$CC` / `$AR`, with the conventional defaults.
  pub fn from_env() -> Self {
    Self {
      cc: env::var("CC").unwrap_or_else(|_| "cc".to_string()),
      ar: env::var("AR").unwrap_or_else(|_| "ar".to_string()),
    }
  }

  /// Compile one C source into `obj_dir`, returning the object path.
  ///
  /// The object mirrors the source's path under `obj_dir` so two sources
  /// with the same stem in different directories never collide.
  pub fn compile(&self, config: &BuildConfig, source: &Path, obj_dir: &Path) -> Result<PathBuf> {
    let object = object_path(&config.project_root, source, obj_dir)?;
    if let Some(parent) = object.parent() {
      fs::create_dir_all(parent)?;
    }

    let mut cmd = Command::new(&self.cc);
    cmd.arg("-c").arg(source).arg("-o").arg(&object);
    for dir in &config.include_dirs {
      cmd.arg("-I").arg(dir);
    }
    for flag in &config.flags {
      cmd.arg(flag);
    }

    info!(source = %source.display(), "compiling");
    let output = self.run(cmd, &self.cc)?;
    if !output.status.success() {
      return Err(BuildError::Compile {
        unit: source.to_path_buf(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      });
    }
    Ok(object)
  }

  /// Archive objects into a static library at `archive`.
  pub fn archive(&self, objects: &[PathBuf], archive: &Path) -> Result<()> {
    let mut cmd = Command::new(&self.ar);
    cmd.arg("rcs").arg(archive).args(objects);

    info!(archive = %archive.display(), objects = objects.len(), "archiving");
    let output = self.run(cmd, &self.ar)?;
    if !output.status.success() {
      return Err(BuildError::Archive {
        archive: archive.to_path_buf(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      });
    }
    Ok(())
  }

  /// Link objects and the static archive into an executable, pulling in
  /// the platform's shared libraries and extra search paths.
  pub fn link(&self, config: &BuildConfig, objects: &[PathBuf], archive: &Path, executable: &Path) -> Result<()> {
    let mut cmd = Command::new(&self.cc);
    cmd.args(objects).arg(archive).arg("-o").arg(executable);
    for dir in &config.deps.link_search_paths {
      cmd.arg("-L").arg(dir);
    }
    for lib in &config.deps.shared_libs {
      cmd.arg(format!("-l{lib}"));
    }

    info!(executable = %executable.display(), "linking");
    let output = self.run(cmd, &self.cc)?;
    if !output.status.success() {
      return Err(BuildError::Link {
        executable: executable.to_path_buf(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
      });
    }
    Ok(())
  }

  fn run(&self, mut cmd: Command, binary: &str) -> Result<Output> {
    debug!(command = ?cmd, "spawning toolchain process");
    cmd
      .output()
      .map_err(|source| BuildError::Spawn { binary: binary.to_string(), source })
  }
}

/// Object path for `source`: its path relative to `project_root`,
/// mirrored under `obj_dir` with an `.o` extension. A source outside the
/// project root keeps only its file name so the object still lands under
/// `obj_dir` rather than beside the source.
fn object_path(project_root: &Path, source: &Path, obj_dir: &Path) -> Result<PathBuf> {
  let relative = match source.strip_prefix(project_root) {
    Ok(relative) => relative,
    Err(_) => source.file_name().map(Path::new).ok_or_else(|| BuildError::Staging {
      path: source.to_path_buf(),
      source: io::Error::new(io::ErrorKind::InvalidInput, "source path has no file name"),
    })?,
  };
  Ok(obj_dir.join(relative).with_extension("o"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn objects_mirror_the_source_path() {
    let object = object_path(Path::new("/proj"), Path::new("/proj/src/core/frame.c"), Path::new("/proj/build/obj")).unwrap();
    assert_eq!(object, PathBuf::from("/proj/build/obj/src/core/frame.o"));
  }

  #[test]
  fn same_stem_in_different_modules_does_not_collide() {
    let root = Path::new("/proj");
    let obj_dir = Path::new("/proj/build/obj");
    let a = object_path(root, Path::new("/proj/src/a/init.c"), obj_dir).unwrap();
    let b = object_path(root, Path::new("/proj/src/b/init.c"), obj_dir).unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn source_outside_the_project_root_stays_under_obj_dir() {
    let object = object_path(Path::new("/proj"), Path::new("/elsewhere/extra.c"), Path::new("/proj/build/obj")).unwrap();
    assert_eq!(object, PathBuf::from("/proj/build/obj/extra.o"));
  }
}
