//! Assembler adapter.
//!
//! Programs are assembled by an external tool that lives in the spec's `asm_dir`.
//! This module provides:
//! 1. **Trait:** [`Assembler`], the seam between the pipeline and the tool.
//! 2. **Make flow:** [`MakeAssembler`], which builds the tool with `make` and runs it
//!    once per source file.
//! 3. **Discovery:** [`find_sources`], the sorted `<basename>*.asm` file list.

/// `make`-built assembler driven as a subprocess.
pub mod make;
/// Source file discovery.
pub mod sources;

use std::path::Path;

use crate::common::Result;

pub use make::MakeAssembler;
pub use sources::find_sources;

/// Turns assembly source files into hex text.
///
/// Implementations must produce one 32-bit hex word per line with the header word
/// first; a trailing blank line is allowed.
pub trait Assembler {
    /// Makes the assembler ready; called once per spec before any `assemble`.
    fn prepare(&mut self) -> Result<()>;

    /// Assembles `source` and returns its hex output.
    fn assemble(&mut self, source: &Path) -> Result<String>;
}
