//! Argument surface construction.
//!
//! The per-example switches are not known until the examples directory
//! has been listed, so the parser is built in two steps: enumerate the
//! example names, then add one boolean flag per name to the fixed
//! argument set.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use pigmake_lib::ExampleDescriptor;

/// Flag ids that belong to the fixed surface; an example directory with
/// one of these names cannot become a switch.
const RESERVED: &[&str] = &["root", "build-dir", "target", "debug", "json", "verbose", "help", "version"];

/// Extract `--root` before the real parse, since the example listing
/// that shapes the parser depends on it.
pub fn project_root_from<'a>(mut args: impl Iterator<Item = &'a str>) -> PathBuf {
  while let Some(arg) = args.next() {
    if arg == "--root" {
      if let Some(value) = args.next() {
        return PathBuf::from(value);
      }
    } else if let Some(value) = arg.strip_prefix("--root=") {
      return PathBuf::from(value);
    }
  }
  PathBuf::from(".")
}

/// Partition the example names into usable flag names and names shadowed
/// by the fixed surface.
pub fn usable_flag_names(names: &[String]) -> (Vec<String>, Vec<String>) {
  let (shadowed, usable) = names.iter().cloned().partition(|name| RESERVED.contains(&name.as_str()));
  (usable, shadowed)
}

/// Build the full parser: the fixed flags plus one boolean switch per
/// example name.
pub fn build_command(example_names: &[String]) -> Command {
  let mut cmd = Command::new("pigmake")
    .about("Build the pigment graphics library and link its examples")
    .version(env!("CARGO_PKG_VERSION"))
    .arg(
      Arg::new("root")
        .long("root")
        .value_name("DIR")
        .default_value(".")
        .help("Project root containing src/, shaders/ and examples/"),
    )
    .arg(
      Arg::new("build-dir")
        .long("build-dir")
        .value_name("DIR")
        .help("Build output directory (default: <root>/build)"),
    )
    .arg(
      Arg::new("target")
        .long("target")
        .value_name("NAME")
        .default_value("pigment")
        .help("Library name, used to name the output archive"),
    )
    .arg(
      Arg::new("debug")
        .long("debug")
        .action(ArgAction::SetTrue)
        .help("Debug build (no optimization, debug info)"),
    )
    .arg(
      Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the example build report as JSON"),
    )
    .arg(
      Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue)
        .help("Enable verbose output"),
    );

  for name in example_names {
    cmd = cmd.arg(
      Arg::new(name.clone())
        .long(name.clone())
        .action(ArgAction::SetTrue)
        .help(format!("Build the {name} example")),
    );
  }

  cmd
}

/// Read the selection state of every generated example flag back out of
/// the parsed matches.
pub fn selections(matches: &ArgMatches, names: Vec<String>) -> Vec<ExampleDescriptor> {
  names
    .into_iter()
    .map(|name| {
      let selected = matches.get_flag(&name);
      ExampleDescriptor { name, selected }
    })
    .collect()
}
