//! The static-library build pipeline.
//!
//! Runs discovery, staging, compilation and archival in a fixed order.
//! The first failure aborts the whole invocation, and the previous
//! archive is removed up front so a failed build never leaves last
//! run's output masquerading as fresh.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::BuildConfig;
use crate::discover::find_files;
use crate::error::{BuildError, Result};
use crate::stage::{self, StagingLayout};
use crate::toolchain::Toolchain;

/// Artifacts produced by a successful library build.
#[derive(Debug, Clone)]
pub struct LibraryArtifacts {
  /// The static archive under `lib/`, a read dependency of every
  /// example link step.
  pub archive: PathBuf,
  pub staged_headers: Vec<PathBuf>,
  pub staged_shaders: Vec<PathBuf>,
}

/// Build the static library: discover sources, headers and shaders,
/// populate the staging layout, compile every source and archive the
/// objects under `lib/`.
pub fn build_static_lib(config: &BuildConfig, toolchain: &Toolchain) -> Result<LibraryArtifacts> {
  let source_root = config.source_root();
  let sources = find_files(&source_root, "**/*.c")?;
  let headers = find_files(&source_root, "**/*.h")?;
  let shaders = find_files(&config.shader_root(), "*")?;

  let layout = StagingLayout::new(&config.build_root);
  layout.ensure()?;

  let archive = layout.lib_dir.join(config.platform.archive_filename(&config.target_name));
  remove_stale(&archive)?;

  let mut staged_headers = Vec::with_capacity(headers.len());
  for header in &headers {
    staged_headers.push(stage::stage_header(&source_root, header, &layout.include_dir)?);
  }

  let mut staged_shaders = Vec::with_capacity(shaders.len());
  for shader in &shaders {
    staged_shaders.push(stage::stage_shader(shader, &layout.shader_dir)?);
  }

  let obj_dir = config.build_root.join("obj");
  let mut objects = Vec::with_capacity(sources.len());
  for source in &sources {
    objects.push(toolchain.compile(config, source, &obj_dir)?);
  }

  toolchain.archive(&objects, &archive)?;
  info!(archive = %archive.display(), "static library built");

  Ok(LibraryArtifacts { archive, staged_headers, staged_shaders })
}

/// Delete the previous archive if one exists. Failures after this point
/// then leave no archive at all rather than a stale one.
fn remove_stale(archive: &Path) -> Result<()> {
  match fs::remove_file(archive) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(BuildError::Staging { path: archive.to_path_buf(), source }),
  }
}
