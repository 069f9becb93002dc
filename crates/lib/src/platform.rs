//! Platform detection and link-time dependency resolution.
//!
//! The graphics stack needs three shared libraries at link time: a
//! windowing library (GLFW), the Vulkan loader, and the shaderc shader
//! compiler. Their names and the extra search paths vary per platform.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Target platform for the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  Windows,
  MacOs,
  OtherUnix,
}

impl Platform {
  /// Detect the current platform at compile time.
  #[cfg(target_os = "windows")]
  pub const fn current() -> Self {
    Platform::Windows
  }

  #[cfg(target_os = "macos")]
  pub const fn current() -> Self {
    Platform::MacOs
  }

  #[cfg(not(any(target_os = "windows", target_os = "macos")))]
  pub const fn current() -> Self {
    Platform::OtherUnix
  }

  pub const fn as_str(&self) -> &'static str {
    match self {
      Platform::Windows => "windows",
      Platform::MacOs => "macos",
      Platform::OtherUnix => "unix",
    }
  }

  /// Shared libraries and extra search paths needed to link against the
  /// graphics stack on this platform.
  ///
  /// Pure: the returned set depends only on `self` and the three
  /// branches never share a library name set.
  pub fn dependency_set(&self) -> PlatformDependencySet {
    match self {
      Platform::Windows => PlatformDependencySet {
        shared_libs: string_vec(&["glfw3", "vulkan-1", "shaderc_shared"]),
        include_dirs: Vec::new(),
        link_search_paths: Vec::new(),
      },
      Platform::MacOs => PlatformDependencySet {
        shared_libs: string_vec(&["glfw.3.4", "vulkan.1", "shaderc_shared"]),
        include_dirs: vec![PathBuf::from("/opt/homebrew/include")],
        link_search_paths: vec![PathBuf::from("/opt/homebrew/lib")],
      },
      Platform::OtherUnix => PlatformDependencySet {
        shared_libs: string_vec(&["glfw", "vulkan", "shaderc_shared"]),
        include_dirs: Vec::new(),
        link_search_paths: Vec::new(),
      },
    }
  }

  /// File name of the static archive for `target` on this platform.
  pub fn archive_filename(&self, target: &str) -> String {
    match self {
      Platform::Windows => format!("{target}.lib"),
      Platform::MacOs | Platform::OtherUnix => format!("lib{target}.a"),
    }
  }

  /// File name of an executable on this platform.
  pub fn executable_filename(&self, name: &str) -> String {
    match self {
      Platform::Windows => format!("{name}.exe"),
      Platform::MacOs | Platform::OtherUnix => name.to_string(),
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// The shared libraries and extra search paths for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDependencySet {
  /// Library names passed opaquely to the link step (`-l<name>`).
  pub shared_libs: Vec<String>,
  /// Extra include directories, e.g. the Homebrew prefix on macOS.
  pub include_dirs: Vec<PathBuf>,
  /// Extra linker search paths (`-L<path>`).
  pub link_search_paths: Vec<PathBuf>,
}

fn string_vec(names: &[&str]) -> Vec<String> {
  names.iter().map(|s| s.to_string()).collect()
}
