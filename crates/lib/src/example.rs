//! Example registry and per-example build loop.
//!
//! Every immediate subdirectory of the examples root is one candidate
//! example; the CLI turns each name into a boolean switch. Selected
//! examples are compiled and linked against the already-built static
//! archive, and a failure in one never aborts the others.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::BuildConfig;
use crate::discover::find_files;
use crate::error::Result;
use crate::toolchain::Toolchain;

/// One candidate example: a subdirectory of the examples root plus its
/// selection state from the CLI surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDescriptor {
  pub name: String,
  pub selected: bool,
}

/// Enumerate the immediate subdirectories of `examples_root`, sorted by
/// name. Plain files are ignored; a missing root yields no examples.
pub fn list_examples(examples_root: &Path) -> Result<Vec<String>> {
  if !examples_root.is_dir() {
    return Ok(Vec::new());
  }

  let mut names = Vec::new();
  for entry in fs::read_dir(examples_root)? {
    let entry = entry?;
    if entry.file_type()?.is_dir() {
      names.push(entry.file_name().to_string_lossy().into_owned());
    }
  }
  names.sort();
  Ok(names)
}

/// Outcome of one example build.
#[derive(Debug, Clone, Serialize)]
pub struct ExampleOutcome {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub executable: Option<PathBuf>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl ExampleOutcome {
  pub fn succeeded(&self) -> bool {
    self.error.is_none()
  }
}

/// Collected outcomes of the example build loop.
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
  pub outcomes: Vec<ExampleOutcome>,
}

impl BuildReport {
  pub fn all_succeeded(&self) -> bool {
    self.outcomes.iter().all(ExampleOutcome::succeeded)
  }
}

/// Build one example against the static archive, returning the path of
/// the linked executable.
pub fn build_example(config: &BuildConfig, toolchain: &Toolchain, name: &str, archive: &Path) -> Result<PathBuf> {
  let example_root = config.examples_root().join(name);
  let sources = find_files(&example_root, "**/*.c")?;

  let obj_dir = config.build_root.join("obj");
  let mut objects = Vec::with_capacity(sources.len());
  for source in &sources {
    objects.push(toolchain.compile(config, source, &obj_dir)?);
  }

  let bin_dir = config.build_root.join("bin");
  fs::create_dir_all(&bin_dir)?;
  let executable = bin_dir.join(config.platform.executable_filename(name));
  toolchain.link(config, &objects, archive, &executable)?;

  info!(example = name, executable = %executable.display(), "example built");
  Ok(executable)
}

/// Build every selected example. Failures are isolated per example and
/// collected into the report; later examples still run.
pub fn build_selected(
  config: &BuildConfig,
  toolchain: &Toolchain,
  examples: &[ExampleDescriptor],
  archive: &Path,
) -> BuildReport {
  let mut report = BuildReport::default();

  for example in examples.iter().filter(|e| e.selected) {
    match build_example(config, toolchain, &example.name, archive) {
      Ok(executable) => {
        report.outcomes.push(ExampleOutcome {
          name: example.name.clone(),
          executable: Some(executable),
          error: None,
        });
      }
      Err(err) => {
        warn!(example = %example.name, error = %err, "example build failed");
        report.outcomes.push(ExampleOutcome {
          name: example.name.clone(),
          executable: None,
          error: Some(err.to_string()),
        });
      }
    }
  }

  report
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn listing_ignores_plain_files_and_sorts() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("zebra")).unwrap();
    fs::create_dir(temp.path().join("alpha")).unwrap();
    fs::write(temp.path().join("README"), b"not an example").unwrap();

    let names = list_examples(temp.path()).unwrap();
    assert_eq!(names, vec!["alpha", "zebra"]);
  }

  #[test]
  fn missing_examples_root_yields_empty_registry() {
    let temp = TempDir::new().unwrap();
    let names = list_examples(&temp.path().join("examples")).unwrap();
    assert!(names.is_empty());
  }

  #[test]
  fn report_aggregates_failures() {
    let report = BuildReport {
      outcomes: vec![
        ExampleOutcome { name: "ok".into(), executable: Some(PathBuf::from("bin/ok")), error: None },
        ExampleOutcome { name: "bad".into(), executable: None, error: Some("link failed".into()) },
      ],
    };
    assert!(!report.all_succeeded());
    assert!(report.outcomes[0].succeeded());
    assert!(!report.outcomes[1].succeeded());
  }
}
