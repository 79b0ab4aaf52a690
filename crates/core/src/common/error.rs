//! Generator error definitions.
//!
//! Every failure in the generator is fatal to the whole run, so a single enum
//! carries them all. Each variant names the input it failed on (file, field,
//! token, or template) so the diagnostic printed by the front end is enough to
//! locate the problem.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, assembling, synthesizing, or rendering.
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be read, created, or written.
    #[error("{action} '{}': {source}", path.display())]
    Io {
        /// What was being attempted (e.g. "can't read YAML file").
        action: &'static str,
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The YAML document is syntactically invalid.
    #[error("can't parse YAML file '{}': {source}", path.display())]
    Yaml {
        /// The spec file.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A spec field is present but has the wrong shape.
    #[error("invalid test spec '{}': {message}", path.display())]
    Spec {
        /// The spec file.
        path: PathBuf,
        /// Description of the mismatch.
        message: String,
    },

    /// A required spec field is absent.
    #[error("missing '{field}' field in '{}'{}", path.display(), hint.map(|h| format!(" ({h})")).unwrap_or_default())]
    MissingField {
        /// The spec file.
        path: PathBuf,
        /// Name of the absent field.
        field: &'static str,
        /// Optional remedy shown to the user.
        hint: Option<&'static str>,
    },

    /// A JSON generator configuration could not be parsed.
    #[error("can't parse config file '{}': {source}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A word in the assembler output is not a base-16 `u32`.
    #[error("invalid hex number '{token}': {reason}")]
    InvalidHexWord {
        /// The offending token, exactly as produced by the assembler.
        token: String,
        /// `invalid syntax` or `value out of range`.
        reason: &'static str,
    },

    /// The assembler produced no header word.
    #[error("assembler output for '{}' has no header word", source_file.display())]
    MissingHeader {
        /// The source file that was assembled.
        source_file: PathBuf,
    },

    /// The assembler could not be built.
    #[error("error compiling assembler in '{}': {reason}", dir.display())]
    AssemblerBuild {
        /// Assembler directory.
        dir: PathBuf,
        /// Spawn error or exit status.
        reason: String,
    },

    /// The assembler failed on a source file.
    #[error("error running assembler on '{}': {status}{}", source_file.display(), stderr_suffix(stderr))]
    AssemblerRun {
        /// The source file being assembled.
        source_file: PathBuf,
        /// Exit status of the assembler.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A template could not be parsed.
    #[error("can't parse template file '{}' (line {line}): {message}", template.display())]
    TemplateParse {
        /// The template file.
        template: PathBuf,
        /// 1-based line of the offending action.
        line: usize,
        /// Description of the syntax error.
        message: String,
    },

    /// A template failed while being filled with spec values.
    #[error("can't fill template file '{}' with values from YAML: {message}", template.display())]
    TemplateRender {
        /// The template file.
        template: PathBuf,
        /// Description of the runtime failure.
        message: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}

impl Error {
    /// Builds an [`Error::Io`] for `path`.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
