//! Build configuration assembly.
//!
//! A `BuildConfig` is assembled once from `BuildOptions`, then passed by
//! shared reference into every pipeline stage. Nothing mutates it after
//! `assemble` returns.

use std::path::PathBuf;

use crate::platform::{Platform, PlatformDependencySet};

/// Warning flags every compilation starts from.
const DEFAULT_FLAGS: &[&str] = &["-Wall", "-Wextra", "-Wconversion", "-Wsign-conversion", "-pedantic"];

/// Default removals: the conversion warnings are too noisy for the
/// Vulkan API surface.
const DEFAULT_REMOVED_FLAGS: &[&str] = &["-Wconversion", "-Wsign-conversion"];

/// Inputs to configuration assembly, typically from the CLI.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Project root containing `src/`, `shaders/` and `examples/`.
  pub project_root: PathBuf,
  /// Build output root; defaults to `<project_root>/build`.
  pub build_root: Option<PathBuf>,
  /// Logical name of the library, used to name the archive.
  pub target_name: String,
  /// Debug build: no optimization, debug info. Release adds LTO.
  pub debug: bool,
  /// Extra compiler flags appended after the defaults.
  pub add_flags: Vec<String>,
  /// Flags stripped from the final set, after additions.
  pub remove_flags: Vec<String>,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      project_root: PathBuf::from("."),
      build_root: None,
      target_name: "pigment".to_string(),
      debug: false,
      add_flags: Vec::new(),
      remove_flags: Vec::new(),
    }
  }
}

/// Fully assembled configuration for one build invocation.
///
/// Owned by the invocation that created it and read-only thereafter;
/// never a process-wide singleton.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  pub target_name: String,
  pub project_root: PathBuf,
  pub build_root: PathBuf,
  pub include_dirs: Vec<PathBuf>,
  pub flags: Vec<String>,
  pub debug: bool,
  pub platform: Platform,
  pub deps: PlatformDependencySet,
}

impl BuildConfig {
  /// Assemble a configuration for the platform we are running on.
  pub fn assemble(options: BuildOptions) -> Self {
    Self::assemble_for(options, Platform::current())
  }

  /// Assemble a configuration for an explicit platform.
  pub fn assemble_for(options: BuildOptions, platform: Platform) -> Self {
    let deps = platform.dependency_set();

    // Default removals apply to the default set only, so a caller can
    // still add one of the removed flags back explicitly.
    let mut flags: Vec<String> = DEFAULT_FLAGS
      .iter()
      .filter(|f| !DEFAULT_REMOVED_FLAGS.contains(f))
      .map(|f| f.to_string())
      .collect();
    if options.debug {
      flags.extend(["-g", "-O0"].map(String::from));
    } else {
      flags.extend(["-O2", "-flto=auto"].map(String::from));
    }
    flags.extend(options.add_flags);
    flags.retain(|flag| !options.remove_flags.iter().any(|r| r == flag));

    let mut include_dirs = vec![options.project_root.join("src")];
    include_dirs.extend(deps.include_dirs.iter().cloned());

    let build_root = options.build_root.unwrap_or_else(|| options.project_root.join("build"));

    Self {
      target_name: options.target_name,
      project_root: options.project_root,
      build_root,
      include_dirs,
      flags,
      debug: options.debug,
      platform,
      deps,
    }
  }

  pub fn source_root(&self) -> PathBuf {
    self.project_root.join("src")
  }

  pub fn shader_root(&self) -> PathBuf {
    self.project_root.join("shaders")
  }

  pub fn examples_root(&self) -> PathBuf {
    self.project_root.join("examples")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_removals_strip_conversion_warnings() {
    let config = BuildConfig::assemble_for(BuildOptions::default(), Platform::OtherUnix);
    assert!(config.flags.iter().any(|f| f == "-Wall"));
    assert!(config.flags.iter().any(|f| f == "-pedantic"));
    assert!(!config.flags.iter().any(|f| f == "-Wconversion"));
    assert!(!config.flags.iter().any(|f| f == "-Wsign-conversion"));
  }

  #[test]
  fn lto_only_in_release() {
    let release = BuildConfig::assemble_for(BuildOptions::default(), Platform::OtherUnix);
    assert!(release.flags.iter().any(|f| f == "-flto=auto"));
    assert!(release.flags.iter().any(|f| f == "-O2"));

    let debug = BuildConfig::assemble_for(BuildOptions { debug: true, ..Default::default() }, Platform::OtherUnix);
    assert!(!debug.flags.iter().any(|f| f == "-flto=auto"));
    assert!(debug.flags.iter().any(|f| f == "-g"));
  }

  #[test]
  fn default_removals_do_not_block_user_additions() {
    let options = BuildOptions {
      add_flags: vec!["-Wconversion".to_string()],
      ..Default::default()
    };
    let config = BuildConfig::assemble_for(options, Platform::OtherUnix);
    assert!(config.flags.iter().any(|f| f == "-Wconversion"));
    assert!(!config.flags.iter().any(|f| f == "-Wsign-conversion"));
  }

  #[test]
  fn user_removals_apply_after_additions() {
    let options = BuildOptions {
      add_flags: vec!["-ffast-math".to_string()],
      remove_flags: vec!["-pedantic".to_string(), "-ffast-math".to_string()],
      ..Default::default()
    };
    let config = BuildConfig::assemble_for(options, Platform::OtherUnix);
    assert!(!config.flags.iter().any(|f| f == "-pedantic"));
    assert!(!config.flags.iter().any(|f| f == "-ffast-math"));
  }

  #[test]
  fn platform_include_dirs_follow_the_source_root() {
    let config = BuildConfig::assemble_for(BuildOptions::default(), Platform::MacOs);
    assert_eq!(config.include_dirs[0], PathBuf::from("./src"));
    assert_eq!(config.include_dirs[1], PathBuf::from("/opt/homebrew/include"));
  }

  #[test]
  fn build_root_defaults_under_project_root() {
    let options = BuildOptions { project_root: PathBuf::from("/proj"), ..Default::default() };
    let config = BuildConfig::assemble_for(options, Platform::OtherUnix);
    assert_eq!(config.build_root, PathBuf::from("/proj/build"));
  }
}
