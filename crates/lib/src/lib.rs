//! pigmake-lib: build orchestration for the pigment graphics library.
//!
//! This crate provides the pieces the `pigmake` binary wires together:
//! - `discover`: deterministic source/header/shader discovery
//! - `stage`: the public `include/`, `shaders/`, `lib/` staging layout
//! - `platform`: platform detection and link-time dependency resolution
//! - `config`: immutable-after-assembly build configuration
//! - `toolchain`: compiler/archiver/linker invocation
//! - `pipeline`: the static-library build sequence
//! - `example`: the example registry and per-example build loop

pub mod config;
pub mod discover;
pub mod error;
pub mod example;
pub mod pipeline;
pub mod platform;
pub mod stage;
pub mod toolchain;

pub use config::{BuildConfig, BuildOptions};
pub use error::{BuildError, Result};
pub use example::{BuildReport, ExampleDescriptor, ExampleOutcome};
pub use pipeline::{LibraryArtifacts, build_static_lib};
pub use platform::{Platform, PlatformDependencySet};
pub use stage::StagingLayout;
pub use toolchain::Toolchain;
