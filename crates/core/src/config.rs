//! Configuration for the testbench generator.
//!
//! This module defines the structures that parameterize generation. It provides:
//! 1. **Defaults:** Template names, output naming, and assembler invocation used by
//!    the stock flow.
//! 2. **Structures:** Template, output, and assembler sections.
//! 3. **Loading:** Optional JSON configuration file; absent keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::{Error, Result};

/// Default configuration constants for the generator.
mod defaults {
    /// Testbench template file, looked up beside the executable.
    pub const TESTBENCH_TEMPLATE: &str = "tmpl_tb";

    /// Run-script template file, looked up beside the executable.
    pub const SCRIPT_TEMPLATE: &str = "tmpl_script";

    /// Appended to the module name to form the testbench file name.
    pub const TESTBENCH_SUFFIX: &str = "_tb.cpp";

    /// Prepended to the module name to form the run-script file name.
    pub const SCRIPT_PREFIX: &str = "test_";

    /// Appended to the module name to form the run-script file name.
    pub const SCRIPT_SUFFIX: &str = ".sh";

    /// Program used to build the assembler.
    pub const BUILD_PROGRAM: &str = "make";

    /// Build target producing the assembler binary.
    pub const BUILD_TARGET: &str = "bin/assembler";

    /// Assembler binary, relative to the assembler directory.
    pub const ASSEMBLER_BINARY: &str = "bin/assembler";

    /// Output format requested from the assembler.
    pub const OUTPUT_FORMAT: &str = "hex";

    /// Extension of assembly source files.
    pub const SOURCE_EXTENSION: &str = "asm";
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use tbgen_core::Config;
///
/// let json = r#"{ "output": { "testbench_suffix": "_tb.sv" } }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.output.testbench_suffix, "_tb.sv");
/// assert_eq!(config.assembler.build_program, "make");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template locations.
    pub templates: TemplateConfig,
    /// Output file naming.
    pub output: OutputConfig,
    /// Assembler build and invocation.
    pub assembler: AssemblerConfig,
}

impl Config {
    /// Loads a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| Error::io("can't read config file", path, e))?;
        serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Template file locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Testbench source template.
    pub testbench: PathBuf,
    /// Run-script template.
    pub script: PathBuf,
}

impl TemplateConfig {
    /// Default templates located in `dir` (normally the executable's directory).
    pub fn beside(dir: &Path) -> Self {
        Self {
            testbench: dir.join(defaults::TESTBENCH_TEMPLATE),
            script: dir.join(defaults::SCRIPT_TEMPLATE),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            testbench: PathBuf::from(defaults::TESTBENCH_TEMPLATE),
            script: PathBuf::from(defaults::SCRIPT_TEMPLATE),
        }
    }
}

/// Output file naming.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Suffix after the module name for the testbench file.
    pub testbench_suffix: String,
    /// Prefix before the module name for the run script.
    pub script_prefix: String,
    /// Suffix after the module name for the run script.
    pub script_suffix: String,
}

impl OutputConfig {
    /// Testbench file name for `module`.
    pub fn testbench_name(&self, module: &str) -> String {
        format!("{module}{}", self.testbench_suffix)
    }

    /// Run-script file name for `module`.
    pub fn script_name(&self, module: &str) -> String {
        format!("{}{module}{}", self.script_prefix, self.script_suffix)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            testbench_suffix: defaults::TESTBENCH_SUFFIX.to_string(),
            script_prefix: defaults::SCRIPT_PREFIX.to_string(),
            script_suffix: defaults::SCRIPT_SUFFIX.to_string(),
        }
    }
}

/// Assembler build and invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Build tool run inside the assembler directory.
    pub build_program: String,
    /// Target passed to the build tool.
    pub build_target: String,
    /// Assembler binary, relative to the assembler directory.
    pub binary: PathBuf,
    /// Value passed with `-f`.
    pub format: String,
    /// Extension of source files, without the dot.
    pub source_extension: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            build_program: defaults::BUILD_PROGRAM.to_string(),
            build_target: defaults::BUILD_TARGET.to_string(),
            binary: PathBuf::from(defaults::ASSEMBLER_BINARY),
            format: defaults::OUTPUT_FORMAT.to_string(),
            source_extension: defaults::SOURCE_EXTENSION.to_string(),
        }
    }
}
