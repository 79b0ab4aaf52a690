//! Subprocess Assembler.
//!
//! Builds the assembler with the configured build tool, then runs
//! `<dir>/<binary> -i <source> -f <format>` for each program. Both steps block until
//! the child exits; only the exit status and captured output are inspected.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::Assembler;
use crate::common::{Error, Result};
use crate::config::AssemblerConfig;

/// Assembler built and run from a directory.
#[derive(Debug, Clone)]
pub struct MakeAssembler {
    dir: PathBuf,
    config: AssemblerConfig,
}

impl MakeAssembler {
    /// Creates an adapter for the assembler in `dir`.
    pub fn new(dir: impl Into<PathBuf>, config: AssemblerConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    /// Assembler directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the assembler binary.
    pub fn binary(&self) -> PathBuf {
        self.dir.join(&self.config.binary)
    }
}

impl Assembler for MakeAssembler {
    fn prepare(&mut self) -> Result<()> {
        info!(
            dir = %self.dir.display(),
            target = %self.config.build_target,
            "building assembler"
        );
        let status = Command::new(&self.config.build_program)
            .arg(&self.config.build_target)
            .current_dir(&self.dir)
            .status()
            .map_err(|e| Error::AssemblerBuild {
                dir: self.dir.clone(),
                reason: format!("can't run '{}': {e}", self.config.build_program),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::AssemblerBuild {
                dir: self.dir.clone(),
                reason: status.to_string(),
            })
        }
    }

    fn assemble(&mut self, source: &Path) -> Result<String> {
        let binary = self.binary();
        debug!(binary = %binary.display(), source = %source.display(), "running assembler");
        let output = Command::new(&binary)
            .arg("-i")
            .arg(source)
            .arg("-f")
            .arg(&self.config.format)
            .output()
            .map_err(|e| Error::io("can't run assembler", &binary, e))?;
        if !output.status.success() {
            return Err(Error::AssemblerRun {
                source_file: source.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|e| {
            Error::io(
                "assembler produced non-UTF-8 output for",
                source,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }
}
