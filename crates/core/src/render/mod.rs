//! Testbench rendering.
//!
//! Generated testbenches and run scripts are produced by filling text templates
//! with the test spec's values. This module provides:
//! 1. **Templates:** A Go `text/template` compatible engine over JSON values.
//! 2. **Escaping:** Conversion of dotted signal paths into flattened simulator identifiers.
//! 3. **Render data:** Assembly of the template data from a spec and its stimulus events.

/// Render data construction.
pub mod context;
/// Hierarchical identifier flattening.
pub mod escape;
/// Template parsing and execution.
pub mod template;

pub use context::render_data;
pub use escape::replace_dots;
pub use template::Template;
