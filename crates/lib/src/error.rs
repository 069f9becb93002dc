//! Error types for pigmake-lib.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building the library or an example.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Directory traversal failed during discovery.
  #[error("failed to walk {}: {source}", root.display())]
  Walk {
    root: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  /// Copying a file or creating a directory in the staging layout failed.
  /// Fatal to the whole invocation.
  #[error("staging failed for {}: {source}", path.display())]
  Staging {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A toolchain binary could not be spawned.
  #[error("failed to spawn '{binary}': {source}")]
  Spawn {
    binary: String,
    #[source]
    source: std::io::Error,
  },

  /// One compilation unit failed. Fatal to its containing build unit.
  #[error("compiling {} failed with exit code {code:?}\n{stderr}", unit.display())]
  Compile {
    unit: PathBuf,
    code: Option<i32>,
    stderr: String,
  },

  /// Archiving objects into the static library failed.
  #[error("archiving {} failed with exit code {code:?}\n{stderr}", archive.display())]
  Archive {
    archive: PathBuf,
    code: Option<i32>,
    stderr: String,
  },

  /// Linking an executable failed. Fatal only to its example.
  #[error("linking {} failed with exit code {code:?}\n{stderr}", executable.display())]
  Link {
    executable: PathBuf,
    code: Option<i32>,
    stderr: String,
  },

  /// I/O error outside the staging layout.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
