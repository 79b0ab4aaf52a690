//! YAML test specification loading.
//!
//! A test spec names the design under test, says where its programs come from, and
//! carries any further values the templates reference. This module:
//! 1. **Parses:** Reads the YAML document and requires a top-level mapping.
//! 2. **Types:** Deserializes the fields the generator itself consumes.
//! 3. **Validates:** Enforces the field combinations before any work starts.
//!
//! The full mapping is kept in [`TestSpec::fields`] so templates can reach any
//! user-defined key.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::common::{Error, Result};
use crate::stimulus::LoadMode;

/// Sentinel `asm_dir` value that disables assembly.
pub const ASM_DIR_DISABLED: &str = "none";

/// Key under which stimulus inputs are listed.
pub const INPUTS_KEY: &str = "inputs";

/// Raw `asm_dir` value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AsmDir {
    /// `"none"`: no programs are assembled.
    Disabled,
    /// Assembler directory, relative to the spec file.
    Path(PathBuf),
}

impl From<String> for AsmDir {
    fn from(value: String) -> Self {
        if value == ASM_DIR_DISABLED {
            Self::Disabled
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

/// Where a spec's programs come from, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembly {
    /// Nothing is assembled; no stimulus is generated.
    Disabled,
    /// Programs matching `<basename>*.asm` are assembled with the assembler in `dir`.
    Enabled {
        /// Assembler directory, resolved against the spec's directory.
        dir: PathBuf,
        /// Source file prefix, relative to the spec's directory.
        basename: String,
    },
}

#[derive(Debug, Deserialize)]
struct SpecFields {
    module: String,
    #[serde(default)]
    asm_dir: Option<AsmDir>,
    #[serde(default)]
    asm_basename: Option<String>,
    #[serde(default)]
    is_3d: bool,
}

/// A validated test specification.
#[derive(Debug, Clone)]
pub struct TestSpec {
    /// The spec file.
    pub path: PathBuf,
    /// Directory containing the spec file; relative paths resolve against it.
    pub base_dir: PathBuf,
    /// Name of the design under test.
    pub module: String,
    /// Program source.
    pub assembly: Assembly,
    /// Whether headers carry the 3D mode bit.
    pub is_3d: bool,
    /// The complete YAML mapping.
    pub fields: Mapping,
}

impl TestSpec {
    /// Reads and validates the spec file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let source =
            fs::read_to_string(path).map_err(|e| Error::io("can't read YAML file", path, e))?;
        Self::parse(path, &source)
    }

    /// Parses and validates spec `source` as if read from `path`.
    ///
    /// # Returns
    ///
    /// The spec, or the first of: [`Error::Yaml`] for malformed YAML, [`Error::Spec`]
    /// for a non-mapping document or mistyped field, [`Error::MissingField`] for an
    /// absent `asm_dir` or an `asm_basename` missing while assembly is enabled.
    pub fn parse(path: &Path, source: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(source).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        let Value::Mapping(fields) = document else {
            return Err(spec_error(path, "top level must be a mapping"));
        };
        if fields
            .get(INPUTS_KEY)
            .is_some_and(|inputs| !inputs.is_sequence() && !inputs.is_null())
        {
            return Err(spec_error(path, "'inputs' must be a sequence"));
        }

        let typed: SpecFields = serde_yaml::from_value(Value::Mapping(fields.clone()))
            .map_err(|e| spec_error(path, &e.to_string()))?;

        let base_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let assembly = match typed.asm_dir {
            None => {
                return Err(Error::MissingField {
                    path: path.to_path_buf(),
                    field: "asm_dir",
                    hint: Some("if you don't want to assemble anything set asm_dir to \"none\""),
                });
            }
            Some(AsmDir::Disabled) => Assembly::Disabled,
            Some(AsmDir::Path(dir)) => {
                let basename = typed.asm_basename.ok_or_else(|| Error::MissingField {
                    path: path.to_path_buf(),
                    field: "asm_basename",
                    hint: Some("required when asm_dir names an assembler"),
                })?;
                Assembly::Enabled {
                    dir: base_dir.join(dir),
                    basename,
                }
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            module: typed.module,
            assembly,
            is_3d: typed.is_3d,
            fields,
        })
    }

    /// Header encoding mode for this spec's programs.
    pub const fn load_mode(&self) -> LoadMode {
        LoadMode::from_is_3d(self.is_3d)
    }
}

fn spec_error(path: &Path, message: &str) -> Error {
    Error::Spec {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}
