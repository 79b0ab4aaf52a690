//! Testbench generator library.
//!
//! This crate turns declarative YAML test specifications into simulation testbenches:
//! 1. **Spec loading:** Typed, validated `TestSpec` parsed from YAML.
//! 2. **Assembly:** Builds and drives the external assembler, one hex blob per source file.
//! 3. **Stimulus:** Cycle-stamps assembled words into `from_cpu` bus events for the block loader.
//! 4. **Rendering:** Fills Go-style testbench and run-script templates with the augmented spec.
//! 5. **Generation:** Per-spec pipeline, output naming, and run statistics.

/// Assembler adapter (build, invoke, source discovery).
pub mod asm;
/// Common constants and error types.
pub mod common;
/// Generator configuration (templates, output naming, assembler invocation).
pub mod config;
/// Per-spec generation pipeline.
pub mod generator;
/// Template engine and identifier escaping.
pub mod render;
/// Generation statistics collection and reporting.
pub mod stats;
/// Stimulus timeline synthesis from assembled words.
pub mod stimulus;
/// YAML test specification loader.
pub mod testspec;

/// Library error type; every variant names the offending input.
pub use crate::common::{Error, Result};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Per-spec pipeline driver; construct with `Generator::new`.
pub use crate::generator::Generator;
/// Cycle accumulator that produces stimulus events.
pub use crate::stimulus::Timeline;
/// Validated test specification.
pub use crate::testspec::TestSpec;
