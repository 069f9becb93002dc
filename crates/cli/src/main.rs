use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use pigmake_lib::{BuildConfig, BuildOptions, Toolchain, example, pipeline};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod args;
mod output;

fn main() -> ExitCode {
  match run() {
    Ok(code) => code,
    Err(err) => {
      output::print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

/// `RUST_LOG` always wins; `--verbose` raises the floor to debug when
/// the environment says nothing.
fn init_logging(verbose: bool) {
  let filter = if verbose && std::env::var("RUST_LOG").is_err() {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };
  tracing_subscriber::fmt().with_env_filter(filter).without_time().init();
}

fn run() -> Result<ExitCode> {
  let argv: Vec<String> = std::env::args().skip(1).collect();
  let root = args::project_root_from(argv.iter().map(String::as_str));

  // Enumerate example names first; the parser is shaped by the listing.
  let names = example::list_examples(&root.join("examples"))?;
  let (flag_names, shadowed) = args::usable_flag_names(&names);
  for name in &shadowed {
    output::print_warning(&format!("example '{name}' shadows a built-in flag and cannot be selected"));
  }

  let matches = args::build_command(&flag_names).get_matches_from(std::env::args());
  init_logging(matches.get_flag("verbose"));

  let options = BuildOptions {
    project_root: root,
    build_root: matches.get_one::<String>("build-dir").map(PathBuf::from),
    target_name: matches.get_one::<String>("target").cloned().unwrap_or_else(|| "pigment".to_string()),
    debug: matches.get_flag("debug"),
    ..Default::default()
  };
  let config = BuildConfig::assemble(options);
  let toolchain = Toolchain::from_env();
  debug!(build_root = %config.build_root.display(), flags = ?config.flags, "configuration assembled");

  output::print_info(&format!(
    "building {} for {} ({})",
    config.target_name,
    config.platform,
    if config.debug { "debug" } else { "release" }
  ));

  let started = Instant::now();
  let artifacts = match pipeline::build_static_lib(&config, &toolchain) {
    Ok(artifacts) => artifacts,
    Err(err) => {
      output::print_error(&format!("library build failed: {err}"));
      return Ok(ExitCode::FAILURE);
    }
  };
  output::print_success(&format!("{}", artifacts.archive.display()));

  let examples = args::selections(&matches, flag_names);
  let report = example::build_selected(&config, &toolchain, &examples, &artifacts.archive);

  if matches.get_flag("json") {
    output::print_json(&report)?;
  } else {
    for outcome in &report.outcomes {
      match &outcome.executable {
        Some(path) => output::print_success(&format!("{} : {}", outcome.name, path.display())),
        None => output::print_error(&format!("{} : {}", outcome.name, outcome.error.as_deref().unwrap_or("failed"))),
      }
    }
    output::print_info(&format!("finished in {}", output::format_duration(started.elapsed())));
  }

  if report.all_succeeded() {
    Ok(ExitCode::SUCCESS)
  } else {
    Ok(ExitCode::FAILURE)
  }
}
